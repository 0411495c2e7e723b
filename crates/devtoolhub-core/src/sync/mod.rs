//! Cloud reconciliation shared by the local-first stores.
//!
//! A [`SyncContext`] pairs the remote tables with the signed-in user. Without
//! a user every push and sync is a no-op.

mod merge;

pub use merge::{
    merge_favorites, merge_history, merge_passwords, normalize_history, within_remote_window,
    Merged, HISTORY_LIMIT,
};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::auth::AuthUser;
use crate::remote::{RemoteResult, RemoteTables};

/// Attempts made by a background push before giving up.
pub const PUSH_ATTEMPTS: u32 = 3;

/// Fixed delay between push attempts.
pub const PUSH_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct SyncContext {
    remote: Arc<dyn RemoteTables>,
    user: Option<AuthUser>,
    retry_delay: Duration,
}

impl SyncContext {
    pub fn new(remote: Arc<dyn RemoteTables>, user: Option<AuthUser>) -> Self {
        Self {
            remote,
            user,
            retry_delay: PUSH_RETRY_DELAY,
        }
    }

    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    #[must_use]
    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.id.as_str())
    }

    #[must_use]
    pub fn remote(&self) -> &dyn RemoteTables {
        self.remote.as_ref()
    }

    /// Spawn a background push with bounded retry.
    ///
    /// Returns `None` when signed out or when no tokio runtime is running.
    /// The handle resolves to `true` once the push succeeded; dropping it
    /// detaches the task. Failures are logged and never roll back local state.
    pub fn push<F, Fut>(&self, label: &'static str, operation: F) -> Option<JoinHandle<bool>>
    where
        F: Fn(Arc<dyn RemoteTables>, String) -> Fut + Send + 'static,
        Fut: Future<Output = RemoteResult<()>> + Send + 'static,
    {
        let user_id = self.user_id()?.to_string();
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!("Skipping {} push: no async runtime", label);
                return None;
            }
        };

        let remote = Arc::clone(&self.remote);
        let delay = self.retry_delay;
        Some(runtime.spawn(async move {
            for attempt in 1..=PUSH_ATTEMPTS {
                match operation(Arc::clone(&remote), user_id.clone()).await {
                    Ok(()) => {
                        tracing::debug!("{} push succeeded on attempt {}", label, attempt);
                        return true;
                    }
                    Err(error) if attempt < PUSH_ATTEMPTS => {
                        tracing::debug!("{} push attempt {} failed: {}", label, attempt, error);
                        tokio::time::sleep(delay).await;
                    }
                    Err(error) => {
                        tracing::warn!(
                            "{} push failed after {} attempts: {}",
                            label,
                            PUSH_ATTEMPTS,
                            error
                        );
                    }
                }
            }
            false
        }))
    }
}
