use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{record_outcome, PushHandle};
use crate::error::{Error, Result};
use crate::models::{EntryId, PasswordEntry, PasswordRecord};
use crate::storage::{load_snapshot, save_snapshot, Namespace, SnapshotStorage};
use crate::sync::{merge_passwords, SyncContext};
use crate::util::iso_timestamp_now;
use crate::vault::{decrypt_entries, DecryptedEntry, MasterPassphrase, VaultError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct VaultSnapshot {
    #[serde(default)]
    entries: Vec<PasswordEntry>,
}

/// Encrypted password entries plus the in-memory master passphrase.
///
/// Only ciphertext reaches the snapshot or the remote table.
pub struct PasswordStore {
    storage: Arc<dyn SnapshotStorage>,
    context: SyncContext,
    entries: Vec<PasswordEntry>,
    passphrase: Option<MasterPassphrase>,
    last_error: Option<String>,
}

impl PasswordStore {
    pub fn open(storage: Arc<dyn SnapshotStorage>, context: SyncContext) -> Result<Self> {
        let snapshot: VaultSnapshot = load_snapshot(storage.as_ref(), Namespace::PasswordVault)?;
        Ok(Self {
            storage,
            context,
            entries: snapshot.entries,
            passphrase: None,
            last_error: None,
        })
    }

    pub fn set_context(&mut self, context: SyncContext) {
        self.context = context;
    }

    /// Hold the master passphrase in memory.
    ///
    /// When entries exist, at least one must decrypt under the passphrase.
    pub fn unlock(&mut self, passphrase: &str) -> Result<()> {
        let passphrase = MasterPassphrase::new(passphrase)?;
        if !self.entries.is_empty()
            && !self
                .entries
                .iter()
                .any(|entry| passphrase.open(&entry.encrypted_data).is_ok())
        {
            return Err(VaultError::Decryption.into());
        }
        self.passphrase = Some(passphrase);
        Ok(())
    }

    /// Drop the passphrase; it is zeroized on drop.
    pub fn lock(&mut self) {
        self.passphrase = None;
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.passphrase.is_some()
    }

    #[must_use]
    pub fn entries(&self) -> &[PasswordEntry] {
        &self.entries
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Decrypt all entries; unreadable ones are marked, not dropped.
    pub fn decrypted(&self) -> Result<Vec<DecryptedEntry>> {
        Ok(decrypt_entries(&self.entries, self.passphrase()?))
    }

    pub fn add_entry(
        &mut self,
        record: &PasswordRecord,
        category: &str,
    ) -> Result<(EntryId, PushHandle)> {
        let sealed = self.passphrase()?.seal(record)?;
        let mut entry = PasswordEntry::new(sealed, category);
        entry.user_id = self.context.user_id().map(str::to_string);
        let id = entry.id;

        self.entries.insert(0, entry.clone());
        self.persist()?;

        let push = self.context.push("password add", move |remote, user_id| {
            let entry = PasswordEntry {
                user_id: Some(user_id),
                ..entry.clone()
            };
            async move { remote.insert_password(&entry).await }
        });
        Ok((id, push))
    }

    pub fn update_entry(
        &mut self,
        id: EntryId,
        record: &PasswordRecord,
        category: &str,
    ) -> Result<PushHandle> {
        let sealed = self.passphrase()?.seal(record)?;
        let owner = self.context.user_id().map(str::to_string);
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| Error::NotFound(format!("password entry {id}")))?;

        entry.encrypted_data = sealed;
        entry.category = category.to_string();
        entry.updated_at = iso_timestamp_now();
        if entry.user_id.is_none() {
            entry.user_id = owner;
        }
        let updated = entry.clone();
        self.persist()?;

        Ok(self.context.push("password update", move |remote, user_id| {
            let entry = PasswordEntry {
                user_id: Some(user_id),
                ..updated.clone()
            };
            async move { remote.update_password(&entry).await }
        }))
    }

    pub fn delete_entry(&mut self, id: EntryId) -> Result<PushHandle> {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        if self.entries.len() == before {
            return Err(Error::NotFound(format!("password entry {id}")));
        }
        self.persist()?;

        Ok(self
            .context
            .push("password delete", move |remote, user_id| async move {
                remote.delete_password(&user_id, id).await
            }))
    }

    /// Union local and remote entries by id. Requires an unlocked vault.
    pub async fn sync(&mut self) -> Result<()> {
        let result = self.sync_inner().await;
        record_outcome(&mut self.last_error, result)
    }

    /// Replace local entries with the remote rows.
    pub async fn load_from_cloud(&mut self) -> Result<()> {
        let result = self.load_inner().await;
        record_outcome(&mut self.last_error, result)
    }

    async fn sync_inner(&mut self) -> Result<()> {
        let Some(user_id) = self.context.user_id().map(str::to_string) else {
            return Ok(());
        };
        self.passphrase()?;

        let remote = self.context.remote().list_passwords(&user_id).await?;
        let merged = merge_passwords(&self.entries, &remote);
        tracing::debug!(
            "Vault sync: {} local, {} remote, {} to upload",
            self.entries.len(),
            remote.len(),
            merged.upload.len()
        );

        for entry in &merged.upload {
            let owned = PasswordEntry {
                user_id: Some(user_id.clone()),
                ..entry.clone()
            };
            self.context.remote().insert_password(&owned).await?;
        }

        self.entries = merged
            .local
            .into_iter()
            .map(|entry| PasswordEntry {
                user_id: entry.user_id.or_else(|| Some(user_id.clone())),
                ..entry
            })
            .collect();
        self.persist()
    }

    async fn load_inner(&mut self) -> Result<()> {
        let Some(user_id) = self.context.user_id().map(str::to_string) else {
            return Ok(());
        };

        self.entries = self.context.remote().list_passwords(&user_id).await?;
        self.persist()
    }

    fn passphrase(&self) -> Result<&MasterPassphrase> {
        self.passphrase.as_ref().ok_or(Error::VaultLocked)
    }

    fn persist(&self) -> Result<()> {
        save_snapshot(
            self.storage.as_ref(),
            Namespace::PasswordVault,
            &VaultSnapshot {
                entries: self.entries.clone(),
            },
        )
    }
}
