use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{record_outcome, PushHandle};
use crate::catalog;
use crate::error::Result;
use crate::models::{HistoryEntry, HistoryRecord};
use crate::storage::{load_snapshot, save_snapshot, Namespace, SnapshotStorage};
use crate::sync::{
    merge_history, normalize_history, within_remote_window, SyncContext, HISTORY_LIMIT,
};

/// Default number of slugs returned by [`HistoryStore::recent_tools`].
pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistorySnapshot {
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

/// Tool usage history, newest first, one entry per tool.
pub struct HistoryStore {
    storage: Arc<dyn SnapshotStorage>,
    context: SyncContext,
    history: Vec<HistoryEntry>,
    last_error: Option<String>,
}

impl HistoryStore {
    pub fn open(storage: Arc<dyn SnapshotStorage>, context: SyncContext) -> Result<Self> {
        let snapshot: HistorySnapshot = load_snapshot(storage.as_ref(), Namespace::ToolHistory)?;
        Ok(Self {
            storage,
            context,
            history: snapshot.history,
            last_error: None,
        })
    }

    pub fn set_context(&mut self, context: SyncContext) {
        self.context = context;
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.history
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Record a tool visit. An earlier visit of the same tool is replaced.
    pub fn add(&mut self, slug: &str) -> Result<PushHandle> {
        let entry = HistoryEntry::now(slug);
        self.history.retain(|existing| existing.tool_slug != slug);
        self.history.insert(0, entry.clone());
        self.history.truncate(HISTORY_LIMIT);
        self.persist()?;

        Ok(self.context.push("history add", move |remote, user_id| {
            let record = HistoryRecord::from_entry(user_id, &entry);
            async move { remote.insert_history(&record).await }
        }))
    }

    /// Forget local history. Remote rows are kept.
    pub fn clear(&mut self) -> Result<()> {
        self.history.clear();
        self.persist()
    }

    /// Slugs of the most recently used tools.
    #[must_use]
    pub fn recent_tools(&self, limit: usize) -> Vec<&str> {
        self.history
            .iter()
            .take(limit)
            .map(|entry| entry.tool_slug.as_str())
            .collect()
    }

    /// Drop entries for unknown tools or with unparsable timestamps.
    ///
    /// Returns the number of removed entries; nothing is written when none.
    pub fn cleanup(&mut self) -> Result<usize> {
        let before = self.history.len();
        self.history.retain(|entry| {
            !entry.tool_slug.is_empty()
                && catalog::contains(&entry.tool_slug)
                && entry.parsed_timestamp().is_some()
        });

        let removed = before - self.history.len();
        if removed > 0 {
            tracing::debug!("Removed {} invalid history entries", removed);
            self.persist()?;
        }
        Ok(removed)
    }

    pub async fn sync(&mut self) -> Result<()> {
        let result = self.sync_inner().await;
        record_outcome(&mut self.last_error, result)
    }

    /// Replace local history with the latest remote rows.
    pub async fn load_from_cloud(&mut self) -> Result<()> {
        let result = self.load_inner().await;
        record_outcome(&mut self.last_error, result)
    }

    async fn sync_inner(&mut self) -> Result<()> {
        let Some(user_id) = self.context.user_id().map(str::to_string) else {
            return Ok(());
        };

        let remote = self
            .context
            .remote()
            .list_history(&user_id, Some(HISTORY_LIMIT))
            .await?;
        let merged = merge_history(&self.history, &remote);
        let upload = within_remote_window(merged.upload, &remote, HISTORY_LIMIT);
        tracing::debug!(
            "History sync: {} local, {} remote, {} to upload",
            self.history.len(),
            remote.len(),
            upload.len()
        );

        for entry in &upload {
            self.context
                .remote()
                .insert_history(&HistoryRecord::from_entry(user_id.clone(), entry))
                .await?;
        }

        self.history = merged.local;
        self.persist()
    }

    async fn load_inner(&mut self) -> Result<()> {
        let Some(user_id) = self.context.user_id().map(str::to_string) else {
            return Ok(());
        };

        let remote = self
            .context
            .remote()
            .list_history(&user_id, Some(HISTORY_LIMIT))
            .await?;
        self.history = normalize_history(remote.into_iter().map(HistoryEntry::from).collect());
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        save_snapshot(
            self.storage.as_ref(),
            Namespace::ToolHistory,
            &HistorySnapshot {
                history: self.history.clone(),
            },
        )
    }
}
