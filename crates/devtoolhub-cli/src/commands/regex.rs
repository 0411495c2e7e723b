use devtoolhub_core::tools::regex;

use crate::cli::RegexCommands;
use crate::error::CliError;

pub fn run_regex(command: RegexCommands) -> Result<(), CliError> {
    match command {
        RegexCommands::Test {
            pattern,
            text,
            flags,
        } => {
            let matches = regex::test(&pattern, &flags, &text)?;
            if matches.is_empty() {
                println!("No matches");
            }
            for found in matches {
                println!("[{}] {}", found.index, found.text);
                for (group, value) in found.groups.iter().enumerate() {
                    println!("    ${}: {}", group + 1, value.as_deref().unwrap_or("(none)"));
                }
            }
        }
        RegexCommands::Replace {
            pattern,
            text,
            replacement,
            flags,
        } => println!("{}", regex::replace(&pattern, &flags, &text, &replacement)?),
    }
    Ok(())
}
