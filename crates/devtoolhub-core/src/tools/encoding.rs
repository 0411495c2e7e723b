//! Base64, hex, digests and HMAC.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};

use super::{ToolError, ToolResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Base64Variant {
    #[default]
    Standard,
    /// URL-safe alphabet without padding
    UrlSafe,
}

#[must_use]
pub fn base64_encode(input: &str, variant: Base64Variant) -> String {
    match variant {
        Base64Variant::Standard => STANDARD.encode(input),
        Base64Variant::UrlSafe => URL_SAFE_NO_PAD.encode(input),
    }
}

/// Decode base64 text into UTF-8. Padding is optional for the URL-safe variant.
pub fn base64_decode(input: &str, variant: Base64Variant) -> ToolResult<String> {
    let input = input.trim();
    let bytes = match variant {
        Base64Variant::Standard => STANDARD.decode(input),
        Base64Variant::UrlSafe => URL_SAFE_NO_PAD.decode(input.trim_end_matches('=')),
    }
    .map_err(|error| ToolError::Decode(error.to_string()))?;
    String::from_utf8(bytes).map_err(|_| ToolError::Decode("result is not valid UTF-8".to_string()))
}

#[must_use]
pub fn hex_encode(input: &str) -> String {
    to_hex(input.as_bytes())
}

pub fn hex_decode(input: &str) -> ToolResult<String> {
    let digits: Vec<u8> = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .enumerate()
        .map(|(index, c)| {
            c.to_digit(16)
                .and_then(|digit| u8::try_from(digit).ok())
                .ok_or_else(|| ToolError::Decode(format!("invalid hex digit '{c}' at offset {index}")))
        })
        .collect::<ToolResult<_>>()?;
    if digits.len() % 2 != 0 {
        return Err(ToolError::Decode("hex input has an odd length".to_string()));
    }
    let bytes: Vec<u8> = digits
        .chunks(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect();
    String::from_utf8(bytes).map_err(|_| ToolError::Decode("result is not valid UTF-8".to_string()))
}

#[must_use]
pub fn sha256_hex(input: &str) -> String {
    to_hex(&Sha256::digest(input.as_bytes()))
}

#[must_use]
pub fn sha512_hex(input: &str) -> String {
    to_hex(&Sha512::digest(input.as_bytes()))
}

pub fn hmac_sha256_hex(input: &str, key: &str) -> ToolResult<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key.as_bytes())
        .map_err(|error| ToolError::InvalidOption(error.to_string()))?;
    mac.update(input.as_bytes());
    Ok(to_hex(&mac.finalize().into_bytes()))
}

fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write as _;

    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hex_decode_rejects_non_hex_characters() {
        assert_eq!(hex_decode("68 65 6c 6c 6f").unwrap(), "hello");
        assert!(matches!(hex_decode("aéa"), Err(ToolError::Decode(_))));
        assert!(matches!(hex_decode("éé"), Err(ToolError::Decode(_))));
        assert!(matches!(hex_decode("abc"), Err(ToolError::Decode(_))));
    }

    #[test]
    fn base64_variants() {
        assert_eq!(base64_encode("hello?>", Base64Variant::Standard), "aGVsbG8/Pg==");
        assert_eq!(base64_encode("hello?>", Base64Variant::UrlSafe), "aGVsbG8_Pg");
        assert_eq!(base64_decode("aGVsbG8/Pg==", Base64Variant::Standard).unwrap(), "hello?>");
        assert_eq!(base64_decode("aGVsbG8_Pg==", Base64Variant::UrlSafe).unwrap(), "hello?>");
        assert_eq!(base64_decode("5L2g5aW9", Base64Variant::Standard).unwrap(), "你好");
    }

    #[test]
    fn base64_decode_rejects_garbage() {
        assert!(matches!(
            base64_decode("***", Base64Variant::Standard),
            Err(ToolError::Decode(_))
        ));
        assert!(base64_decode("/w==", Base64Variant::Standard).is_err());
    }

    #[test]
    fn hex_roundtrip_and_errors() {
        assert_eq!(hex_encode("Hi!"), "486921");
        assert_eq!(hex_decode("48 69 21").unwrap(), "Hi!");
        assert!(hex_decode("486").is_err());
        assert!(hex_decode("zz").is_err());
    }

    #[test]
    fn digests_match_known_vectors() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            sha512_hex(""),
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
             47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
        );
    }

    #[test]
    fn hmac_matches_rfc_4231_case_2() {
        assert_eq!(
            hmac_sha256_hex("what do ya want for nothing?", "Jefe").unwrap(),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }
}
