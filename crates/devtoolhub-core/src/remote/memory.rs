use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{RemoteError, RemoteResult, RemoteTables};
use crate::models::{EntryId, FavoriteRecord, HistoryRecord, PasswordEntry};

#[derive(Debug, Default)]
struct Tables {
    favorites: Vec<FavoriteRecord>,
    history: Vec<HistoryRecord>,
    passwords: Vec<PasswordEntry>,
}

/// In-process remote tables for offline use and tests.
///
/// Clones share the same rows. `fail_next` makes the next N calls fail,
/// which lets callers exercise retry and error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryTables {
    tables: Arc<Mutex<Tables>>,
    failures: Arc<AtomicUsize>,
}

impl MemoryTables {
    pub fn fail_next(&self, calls: usize) {
        self.failures.store(calls, Ordering::SeqCst);
    }

    #[must_use]
    pub fn favorites(&self) -> Vec<FavoriteRecord> {
        self.lock().favorites.clone()
    }

    #[must_use]
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.lock().history.clone()
    }

    #[must_use]
    pub fn passwords(&self) -> Vec<PasswordEntry> {
        self.lock().passwords.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn guard(&self) -> RemoteResult<MutexGuard<'_, Tables>> {
        let injected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1));
        if injected.is_ok() {
            return Err(RemoteError::Api("injected failure".to_string()));
        }
        Ok(self.lock())
    }
}

#[async_trait]
impl RemoteTables for MemoryTables {
    async fn list_favorites(&self, user_id: &str) -> RemoteResult<Vec<FavoriteRecord>> {
        let tables = self.guard()?;
        let mut rows: Vec<_> = tables
            .favorites
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(rows)
    }

    async fn insert_favorite(&self, record: &FavoriteRecord) -> RemoteResult<()> {
        let mut tables = self.guard()?;
        let id = tables.favorites.len() + 1;
        tables.favorites.push(FavoriteRecord {
            id: Some(id.to_string()),
            ..record.clone()
        });
        Ok(())
    }

    async fn delete_favorite(&self, user_id: &str, tool_slug: &str) -> RemoteResult<()> {
        self.guard()?
            .favorites
            .retain(|row| !(row.user_id == user_id && row.tool_slug == tool_slug));
        Ok(())
    }

    async fn list_history(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> RemoteResult<Vec<HistoryRecord>> {
        let tables = self.guard()?;
        let mut rows: Vec<_> = tables
            .history
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert_history(&self, record: &HistoryRecord) -> RemoteResult<()> {
        let mut tables = self.guard()?;
        let id = tables.history.len() + 1;
        tables.history.push(HistoryRecord {
            id: Some(id.to_string()),
            ..record.clone()
        });
        Ok(())
    }

    async fn list_passwords(&self, user_id: &str) -> RemoteResult<Vec<PasswordEntry>> {
        let tables = self.guard()?;
        let mut rows: Vec<_> = tables
            .passwords
            .iter()
            .filter(|row| row.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        rows.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(rows)
    }

    async fn insert_password(&self, entry: &PasswordEntry) -> RemoteResult<()> {
        let mut tables = self.guard()?;
        if tables.passwords.iter().any(|row| row.id == entry.id) {
            return Err(RemoteError::Api(format!(
                "duplicate key value violates unique constraint \"passwords_pkey\" ({})",
                entry.id
            )));
        }
        tables.passwords.push(entry.clone());
        Ok(())
    }

    async fn update_password(&self, entry: &PasswordEntry) -> RemoteResult<()> {
        let mut tables = self.guard()?;
        if let Some(row) = tables
            .passwords
            .iter_mut()
            .find(|row| row.id == entry.id && row.user_id == entry.user_id)
        {
            row.encrypted_data.clone_from(&entry.encrypted_data);
            row.category.clone_from(&entry.category);
            row.updated_at.clone_from(&entry.updated_at);
        }
        Ok(())
    }

    async fn delete_password(&self, user_id: &str, id: EntryId) -> RemoteResult<()> {
        self.guard()?
            .passwords
            .retain(|row| !(row.id == id && row.user_id.as_deref() == Some(user_id)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn rows_are_scoped_per_user() {
        let tables = MemoryTables::default();
        tables
            .insert_favorite(&FavoriteRecord::new("user-1", "json-formatter"))
            .await
            .unwrap();
        tables
            .insert_favorite(&FavoriteRecord::new("user-2", "regex-tester"))
            .await
            .unwrap();

        let rows = tables.list_favorites("user-1").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tool_slug, "json-formatter");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn injected_failures_are_consumed() {
        let tables = MemoryTables::default();
        tables.fail_next(1);
        assert!(tables.list_history("user-1", None).await.is_err());
        assert!(tables.list_history("user-1", None).await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn duplicate_password_ids_are_rejected() {
        let tables = MemoryTables::default();
        let mut entry = PasswordEntry::new("cipher", "web");
        entry.user_id = Some("user-1".to_string());
        tables.insert_password(&entry).await.unwrap();
        assert!(tables.insert_password(&entry).await.is_err());
    }
}
