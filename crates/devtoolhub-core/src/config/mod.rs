//! Bootstrap configuration for client apps.
//!
//! Discovers the Supabase project and the document conversion endpoint. Values
//! here are public endpoints/keys; secret credentials never belong in it.

use serde::{Deserialize, Serialize};

use crate::util::{is_http_url, normalize_text_option};

pub const SUPABASE_URL_ENV: &str = "DEVTOOLHUB_SUPABASE_URL";
pub const SUPABASE_ANON_KEY_ENV: &str = "DEVTOOLHUB_SUPABASE_ANON_KEY";
pub const CONVERT_API_URL_ENV: &str = "DEVTOOLHUB_CONVERT_API_URL";

/// Default CloudConvert v2 API base.
pub const DEFAULT_CONVERT_API_URL: &str = "https://api.cloudconvert.com/v2";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_anon_key: Option<String>,
    #[serde(default)]
    pub convert_api_url: Option<String>,
}

impl BootstrapConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            supabase_url: std::env::var(SUPABASE_URL_ENV).ok(),
            supabase_anon_key: std::env::var(SUPABASE_ANON_KEY_ENV).ok(),
            convert_api_url: std::env::var(CONVERT_API_URL_ENV).ok(),
        }
        .normalized()
    }

    /// Trim values, drop empties and trailing slashes.
    #[must_use]
    pub fn normalized(self) -> Self {
        let trim_url =
            |value: Option<String>| normalize_text_option(value).map(|url| url.trim_end_matches('/').to_string());
        Self {
            supabase_url: trim_url(self.supabase_url),
            supabase_anon_key: normalize_text_option(self.supabase_anon_key),
            convert_api_url: trim_url(self.convert_api_url),
        }
    }

    /// Fill unset fields from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            supabase_url: self.supabase_url.or(fallback.supabase_url),
            supabase_anon_key: self.supabase_anon_key.or(fallback.supabase_anon_key),
            convert_api_url: self.convert_api_url.or(fallback.convert_api_url),
        }
    }

    /// Supabase URL and anon key, when both are present.
    #[must_use]
    pub fn supabase(&self) -> Option<(&str, &str)> {
        Some((
            self.supabase_url.as_deref()?,
            self.supabase_anon_key.as_deref()?,
        ))
    }

    #[must_use]
    pub fn convert_api_url(&self) -> &str {
        self.convert_api_url
            .as_deref()
            .unwrap_or(DEFAULT_CONVERT_API_URL)
    }

    /// Reject half-configured Supabase settings and non-HTTP URLs.
    pub fn validate(&self) -> Result<(), String> {
        match (&self.supabase_url, &self.supabase_anon_key) {
            (Some(_), None) => return Err("supabase_anon_key is required with supabase_url".to_string()),
            (None, Some(_)) => return Err("supabase_url is required with supabase_anon_key".to_string()),
            _ => {}
        }
        for (field, value) in [
            ("supabase_url", &self.supabase_url),
            ("convert_api_url", &self.convert_api_url),
        ] {
            if let Some(url) = value {
                if !is_http_url(url) {
                    return Err(format!("{field} must include http:// or https://"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalized_trims_and_drops_empty_values() {
        let config = BootstrapConfig {
            supabase_url: Some(" https://demo.supabase.co/ ".to_string()),
            supabase_anon_key: Some("   ".to_string()),
            convert_api_url: None,
        }
        .normalized();

        assert_eq!(config.supabase_url.as_deref(), Some("https://demo.supabase.co"));
        assert_eq!(config.supabase_anon_key, None);
        assert!(config.supabase().is_none());
    }

    #[test]
    fn convert_url_defaults_to_cloudconvert() {
        assert_eq!(
            BootstrapConfig::default().convert_api_url(),
            DEFAULT_CONVERT_API_URL
        );
    }

    #[test]
    fn or_prefers_own_values() {
        let explicit = BootstrapConfig {
            supabase_url: Some("https://a.example.com".to_string()),
            ..Default::default()
        };
        let fallback = BootstrapConfig {
            supabase_url: Some("https://b.example.com".to_string()),
            supabase_anon_key: Some("anon".to_string()),
            convert_api_url: None,
        };

        let merged = explicit.or(fallback);
        assert_eq!(merged.supabase(), Some(("https://a.example.com", "anon")));
    }

    #[test]
    fn validate_rejects_half_configured_supabase() {
        let config = BootstrapConfig {
            supabase_url: Some("https://demo.supabase.co".to_string()),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("supabase_anon_key"));
    }

    #[test]
    fn validate_rejects_non_http_urls() {
        let config = BootstrapConfig {
            convert_api_url: Some("ftp://convert.example.com".to_string()),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("convert_api_url"));
    }

    #[test]
    fn deserialize_rejects_unknown_fields() {
        let error = serde_json::from_str::<BootstrapConfig>(r#"{"sync_token_endpoint":"x"}"#).unwrap_err();
        assert!(error.to_string().contains("unknown field"));
    }
}
