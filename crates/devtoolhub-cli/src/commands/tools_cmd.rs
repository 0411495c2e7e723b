use devtoolhub_core::catalog;

use crate::cli::ToolsCommands;
use crate::commands::common::{format_tool_lines, known_tool};
use crate::error::CliError;

pub fn run_tools(command: ToolsCommands) -> Result<(), CliError> {
    match command {
        ToolsCommands::List { category, json } => {
            let tools = match category.as_deref() {
                Some(category) => catalog::by_category(category),
                None => catalog::TOOLS.iter().collect(),
            };
            print_tools(&tools, json)
        }
        ToolsCommands::Search { query, json } => {
            let tools = catalog::search(&query);
            if tools.is_empty() && !json {
                println!("No tools match '{}'", query.trim());
                return Ok(());
            }
            print_tools(&tools, json)
        }
        ToolsCommands::Show { slug } => {
            let tool = known_tool(&slug)?;
            println!("{}", serde_json::to_string_pretty(tool)?);
            Ok(())
        }
    }
}

fn print_tools(tools: &[&devtoolhub_core::Tool], as_json: bool) -> Result<(), CliError> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(tools)?);
    } else {
        for line in format_tool_lines(tools) {
            println!("{line}");
        }
    }
    Ok(())
}
