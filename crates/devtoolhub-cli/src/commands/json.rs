use devtoolhub_core::tools::json;

use crate::cli::JsonCommands;
use crate::commands::common::read_input;
use crate::error::CliError;

pub fn run_json(command: JsonCommands) -> Result<(), CliError> {
    match command {
        JsonCommands::Format {
            input,
            indent,
            sort_keys,
        } => println!("{}", json::format(&read_input(input.input)?, indent, sort_keys)?),
        JsonCommands::Minify { input } => println!("{}", json::minify(&read_input(input.input)?)?),
        JsonCommands::Validate { input } => {
            let validation = json::validate(&read_input(input.input)?);
            match validation.error {
                None => println!("Valid JSON"),
                Some(error) => println!("Invalid JSON: {error}"),
            }
        }
    }
    Ok(())
}
