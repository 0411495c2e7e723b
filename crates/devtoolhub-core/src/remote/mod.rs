//! Remote tables backing cloud sync.
//!
//! Each store talks to exactly one table. Reads are filtered by user id and
//! ordered newest first; history reads take an optional row limit.

mod memory;
mod supabase;

pub use memory::MemoryTables;
pub use supabase::SupabaseTables;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{EntryId, FavoriteRecord, HistoryRecord, PasswordEntry};

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Remote backend is not configured")]
    NotConfigured,
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote API error: {0}")]
    Api(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

#[async_trait]
pub trait RemoteTables: Send + Sync {
    async fn list_favorites(&self, user_id: &str) -> RemoteResult<Vec<FavoriteRecord>>;
    async fn insert_favorite(&self, record: &FavoriteRecord) -> RemoteResult<()>;
    async fn delete_favorite(&self, user_id: &str, tool_slug: &str) -> RemoteResult<()>;

    async fn list_history(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> RemoteResult<Vec<HistoryRecord>>;
    async fn insert_history(&self, record: &HistoryRecord) -> RemoteResult<()>;

    async fn list_passwords(&self, user_id: &str) -> RemoteResult<Vec<PasswordEntry>>;
    async fn insert_password(&self, entry: &PasswordEntry) -> RemoteResult<()>;
    async fn update_password(&self, entry: &PasswordEntry) -> RemoteResult<()>;
    async fn delete_password(&self, user_id: &str, id: EntryId) -> RemoteResult<()>;
}
