use std::env;

use devtoolhub_core::convert::{ConvertClient, ConvertError, PdfDocument};

use crate::cli::ConvertCommands;
use crate::commands::common::CONVERT_API_KEY_ENV;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub async fn run_convert(command: ConvertCommands, profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConvertCommands::PdfToDocx { path, api_key } => {
            let document = PdfDocument::from_path(&path)?;
            let api_key = api_key
                .or_else(|| env::var(CONVERT_API_KEY_ENV).ok())
                .ok_or(ConvertError::MissingApiKey)?;

            let config = CliProfilesConfig::load().map_err(CliError::Config)?;
            let profile_name = config.resolve_profile_name(profile);
            let bootstrap = config
                .profile(&profile_name)
                .cloned()
                .unwrap_or_default()
                .bootstrap();

            eprintln!(
                "Converting {} ({} bytes), this can take a few minutes...",
                document.file_name(),
                document.len()
            );
            let conversion = ConvertClient::new(bootstrap.convert_api_url(), api_key)?
                .pdf_to_docx(&document)
                .await?;
            println!("{}", conversion.download_url);
            eprintln!("Save it as {}", document.docx_name());
        }
    }
    Ok(())
}
