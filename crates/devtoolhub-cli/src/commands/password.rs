use devtoolhub_core::tools::password::{self, GeneratorOptions};

use crate::cli::PasswordCommands;
use crate::error::CliError;

pub fn run_password(command: PasswordCommands) -> Result<(), CliError> {
    match command {
        PasswordCommands::Generate {
            length,
            count,
            no_uppercase,
            no_lowercase,
            no_digits,
            no_symbols,
        } => {
            let options = GeneratorOptions {
                uppercase: !no_uppercase,
                lowercase: !no_lowercase,
                digits: !no_digits,
                symbols: !no_symbols,
            };
            for _ in 0..count.max(1) {
                println!("{}", password::generate(length, options)?);
            }
        }
        PasswordCommands::Strength { password: candidate } => {
            let strength = password::strength(&candidate);
            println!("Strength: {}/5 ({})", strength.score, strength.label());
            for hint in strength.feedback {
                println!("  - {hint}");
            }
        }
    }
    Ok(())
}
