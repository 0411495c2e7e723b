use chrono::Utc;
use devtoolhub_core::tools::jwt;
use serde_json::json;

use crate::cli::JwtCommands;
use crate::error::CliError;

pub fn run_jwt(command: JwtCommands) -> Result<(), CliError> {
    match command {
        JwtCommands::Decode { token } => {
            let decoded = jwt::decode(&token)?;
            let rendered = json!({
                "header": decoded.header,
                "payload": decoded.payload,
                "signature": decoded.signature,
                "issued_at": decoded.issued_at().map(|instant| instant.to_rfc3339()),
                "expires_at": decoded.expires_at().map(|instant| instant.to_rfc3339()),
                "expired": decoded.is_expired_at(Utc::now()),
            });
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        }
        JwtCommands::Verify { token, secret } => {
            if jwt::verify_hs256(&token, &secret)? {
                println!("Signature valid");
            } else {
                println!("Signature INVALID");
            }
        }
    }
    Ok(())
}
