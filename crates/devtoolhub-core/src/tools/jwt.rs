//! JWT decoding and HS256 signature checks. Decoding never verifies.

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::Value;
use sha2::Sha256;

use super::{ToolError, ToolResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedJwt {
    pub header: Value,
    pub payload: Value,
    pub signature: String,
}

impl DecodedJwt {
    /// `exp` claim as a UTC instant.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.numeric_claim("exp")
    }

    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.numeric_claim("iat")
    }

    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> Option<bool> {
        self.expires_at().map(|exp| exp <= now)
    }

    fn numeric_claim(&self, claim: &str) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.payload.get(claim)?.as_i64()?, 0)
    }
}

pub fn decode(token: &str) -> ToolResult<DecodedJwt> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    let [header, payload, signature] = parts.as_slice() else {
        return Err(ToolError::Jwt(format!(
            "expected 3 dot-separated parts, found {}",
            parts.len()
        )));
    };

    Ok(DecodedJwt {
        header: decode_part(header, "header")?,
        payload: decode_part(payload, "payload")?,
        signature: (*signature).to_string(),
    })
}

/// Check an HS256 signature. Tokens with another `alg` never verify.
pub fn verify_hs256(token: &str, secret: &str) -> ToolResult<bool> {
    let decoded = decode(token)?;
    if decoded.header.get("alg").and_then(Value::as_str) != Some("HS256") {
        return Ok(false);
    }

    let token = token.trim();
    let Some((signing_input, _)) = token.rsplit_once('.') else {
        return Ok(false);
    };
    let Ok(signature) = decode_base64url(&decoded.signature) else {
        return Ok(false);
    };

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|error| ToolError::InvalidOption(error.to_string()))?;
    mac.update(signing_input.as_bytes());
    Ok(mac.verify_slice(&signature).is_ok())
}

fn decode_part(part: &str, name: &str) -> ToolResult<Value> {
    let bytes = decode_base64url(part).map_err(|_| ToolError::Jwt(format!("{name} is not base64url")))?;
    serde_json::from_slice(&bytes).map_err(|error| ToolError::Jwt(format!("{name} is not JSON: {error}")))
}

fn decode_base64url(part: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD
        .decode(part)
        .or_else(|_| URL_SAFE.decode(part))
}
