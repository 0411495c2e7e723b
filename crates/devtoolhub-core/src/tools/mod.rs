//! Stateless developer tools.
//!
//! Every tool is a pure function over its input. Bad input is reported as a
//! [`ToolError`] carrying a readable message; nothing here panics on input.

pub mod cron;
pub mod encoding;
pub mod json;
pub mod jwt;
pub mod mock;
pub mod password;
pub mod regex;
pub mod timestamp;
pub mod url;
pub mod uuid;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Invalid JSON: {0}")]
    Json(String),
    #[error("Invalid regular expression: {0}")]
    Regex(String),
    #[error("Invalid JWT: {0}")]
    Jwt(String),
    #[error("Invalid timestamp: {0}")]
    Timestamp(String),
    #[error("Invalid URL: {0}")]
    Url(String),
    #[error("Invalid cron expression: {0}")]
    Cron(String),
    #[error("Decoding failed: {0}")]
    Decode(String),
    #[error("{0}")]
    InvalidOption(String),
}

pub type ToolResult<T> = Result<T, ToolError>;
