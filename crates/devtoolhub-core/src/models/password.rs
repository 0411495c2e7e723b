//! Password vault models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::util::iso_timestamp_now;

/// A unique identifier for a vault entry, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Create a new unique entry ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A stored vault entry. Only ciphertext is ever persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordEntry {
    pub id: EntryId,
    /// Owning user; `None` while the entry only exists locally
    #[serde(default)]
    pub user_id: Option<String>,
    /// Opaque ciphertext produced under the master passphrase
    pub encrypted_data: String,
    #[serde(default)]
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
}

impl PasswordEntry {
    /// Create a new entry around an already-encrypted payload.
    #[must_use]
    pub fn new(encrypted_data: impl Into<String>, category: impl Into<String>) -> Self {
        let now = iso_timestamp_now();
        Self {
            id: EntryId::new(),
            user_id: None,
            encrypted_data: encrypted_data.into(),
            category: category.into(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Decrypted vault record. Never persisted in this form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordRecord {
    pub website: String,
    pub username: String,
    pub password: String,
}

impl PasswordRecord {
    #[must_use]
    pub fn new(
        website: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            website: website.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for PasswordRecord {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PasswordRecord")
            .field("website", &self.website)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Drop for PasswordRecord {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_id_parse_roundtrip() {
        let id = EntryId::new();
        let parsed: EntryId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn new_entry_has_matching_timestamps() {
        let entry = PasswordEntry::new("cipher", "work");
        assert_eq!(entry.created_at, entry.updated_at);
        assert!(entry.user_id.is_none());
    }

    #[test]
    fn record_debug_redacts_password() {
        let record = PasswordRecord::new("example.com", "alice", "hunter22");
        let rendered = format!("{record:?}");
        assert!(!rendered.contains("hunter22"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn entry_serializes_id_as_plain_string() {
        let entry = PasswordEntry::new("cipher", "");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], serde_json::Value::String(entry.id.as_str()));
    }
}
