use std::io;

use devtoolhub_core::convert::ConvertError;
use devtoolhub_core::tools::ToolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] devtoolhub_core::Error),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Unknown tool: {0}. Run `devtoolhub tools list` to see available tools.")]
    UnknownTool(String),
    #[error("Invalid vault entry id: {0}")]
    InvalidEntryId(String),
    #[error("No input provided (pass it as an argument or pipe it on stdin)")]
    EmptyInput,
    #[error(
        "Master passphrase required. Pass --passphrase or set DEVTOOLHUB_MASTER_PASSPHRASE."
    )]
    MissingPassphrase,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error(
        "Cloud sync is not configured. Run `devtoolhub config init` + `devtoolhub auth login` first."
    )]
    SyncNotConfigured,
}
