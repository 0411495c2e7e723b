use devtoolhub_core::tools::url;

use crate::cli::UrlCommands;
use crate::error::CliError;

pub fn run_url(command: UrlCommands) -> Result<(), CliError> {
    match command {
        UrlCommands::Parse { url: input, json } => {
            let parsed = url::parse(&input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&parsed)?);
                return Ok(());
            }
            println!("scheme:   {}", parsed.scheme);
            println!("host:     {}", parsed.host.as_deref().unwrap_or("-"));
            println!(
                "port:     {}",
                parsed.port.map_or_else(|| "-".to_string(), |port| port.to_string())
            );
            println!("path:     {}", parsed.path);
            println!("fragment: {}", parsed.fragment.as_deref().unwrap_or("-"));
            for (key, value) in &parsed.params {
                println!("param:    {key} = {value}");
            }
        }
        UrlCommands::Set {
            url: input,
            key,
            value,
        } => println!("{}", url::set_param(&input, &key, &value)?),
        UrlCommands::Remove { url: input, key } => {
            println!("{}", url::remove_param(&input, &key)?);
        }
    }
    Ok(())
}
