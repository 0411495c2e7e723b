use devtoolhub_core::tools::encoding::{self, Base64Variant};

use crate::cli::EncodeCommands;
use crate::commands::common::read_input;
use crate::error::CliError;

pub fn run_encode(command: EncodeCommands) -> Result<(), CliError> {
    let output = match command {
        EncodeCommands::Base64 { input, url_safe } => {
            encoding::base64_encode(&read_input(input.input)?, variant(url_safe))
        }
        EncodeCommands::Base64Decode { input, url_safe } => {
            encoding::base64_decode(&read_input(input.input)?, variant(url_safe))?
        }
        EncodeCommands::Hex { input, decode } => {
            let input = read_input(input.input)?;
            if decode {
                encoding::hex_decode(&input)?
            } else {
                encoding::hex_encode(&input)
            }
        }
        EncodeCommands::Sha256 { input } => encoding::sha256_hex(&read_input(input.input)?),
        EncodeCommands::Sha512 { input } => encoding::sha512_hex(&read_input(input.input)?),
        EncodeCommands::Hmac { input, key } => {
            encoding::hmac_sha256_hex(&read_input(input.input)?, &key)?
        }
    };
    println!("{output}");
    Ok(())
}

const fn variant(url_safe: bool) -> Base64Variant {
    if url_safe {
        Base64Variant::UrlSafe
    } else {
        Base64Variant::Standard
    }
}
