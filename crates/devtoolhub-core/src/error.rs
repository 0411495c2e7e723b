//! Error types for devtoolhub-core

use thiserror::Error;

use crate::remote::RemoteError;
use crate::vault::VaultError;

/// Result type alias using devtoolhub-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in devtoolhub-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Local snapshot storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote table error
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Vault encryption error
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// The vault must be unlocked before this operation
    #[error("Master passphrase required: unlock the vault first")]
    VaultLocked,
}
