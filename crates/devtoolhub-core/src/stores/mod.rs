//! Local-first stores.
//!
//! Every mutation updates memory, persists the store's snapshot, then pushes
//! the change to the remote table in the background. `sync` reconciles the
//! whole store with its table by set union.

mod favorites;
mod history;
mod passwords;
mod preferences;

pub use favorites::FavoritesStore;
pub use history::HistoryStore;
pub use passwords::PasswordStore;
pub use preferences::PreferencesStore;

use tokio::task::JoinHandle;

use crate::error::Result;

/// Handle of a background push; `None` when nothing was pushed.
pub type PushHandle = Option<JoinHandle<bool>>;

/// Remember the error text of a failed sync and pass the result through.
fn record_outcome<T>(last_error: &mut Option<String>, result: Result<T>) -> Result<T> {
    match &result {
        Ok(_) => *last_error = None,
        Err(error) => {
            tracing::warn!("Sync failed: {}", error);
            *last_error = Some(error.to_string());
        }
    }
    result
}
