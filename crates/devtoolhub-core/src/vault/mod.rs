//! Password vault encryption.
//!
//! Records are sealed under a master passphrase that only ever lives in
//! memory. Nothing in this module persists or transmits the passphrase.

mod cipher;

pub use cipher::{decrypt, encrypt};

use std::fmt;

use thiserror::Error;
use zeroize::Zeroizing;

use crate::models::{EntryId, PasswordEntry, PasswordRecord};

/// Minimum accepted master passphrase length, in characters.
pub const MIN_PASSPHRASE_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Nothing to encrypt")]
    EmptyPlaintext,
    #[error("Master passphrase must not be empty")]
    EmptyPassphrase,
    #[error("Master passphrase must be at least {MIN_PASSPHRASE_LEN} characters")]
    PassphraseTooShort,
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
    #[error("Encryption failed: {0}")]
    Encryption(String),
    #[error("Decryption failed: wrong passphrase or corrupted data")]
    Decryption,
    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(&'static str),
    #[error("Unsupported ciphertext version {0}")]
    UnsupportedVersion(u8),
    #[error("Decrypted record is not valid: {0}")]
    InvalidRecord(String),
}

pub type VaultResult<T> = Result<T, VaultError>;

/// Master passphrase held in memory, wiped on drop.
#[derive(Clone)]
pub struct MasterPassphrase(Zeroizing<String>);

impl MasterPassphrase {
    pub fn new(passphrase: impl Into<String>) -> VaultResult<Self> {
        let passphrase = Zeroizing::new(passphrase.into());
        if passphrase.is_empty() {
            return Err(VaultError::EmptyPassphrase);
        }
        if passphrase.chars().count() < MIN_PASSPHRASE_LEN {
            return Err(VaultError::PassphraseTooShort);
        }
        Ok(Self(passphrase))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Seal a record as JSON ciphertext.
    pub fn seal(&self, record: &PasswordRecord) -> VaultResult<String> {
        let plain = Zeroizing::new(
            serde_json::to_string(record)
                .map_err(|error| VaultError::InvalidRecord(error.to_string()))?,
        );
        encrypt(&plain, self.expose())
    }

    /// Open a ciphertext produced by [`Self::seal`].
    pub fn open(&self, ciphertext: &str) -> VaultResult<PasswordRecord> {
        let plain = Zeroizing::new(decrypt(ciphertext, self.expose())?);
        serde_json::from_str(&plain).map_err(|error| VaultError::InvalidRecord(error.to_string()))
    }
}

impl fmt::Debug for MasterPassphrase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("MasterPassphrase([REDACTED])")
    }
}

/// Decrypted view of one stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedEntry {
    pub id: EntryId,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
    pub contents: EntryContents,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContents {
    Readable(PasswordRecord),
    /// Could not be decrypted under the current passphrase.
    Unreadable { reason: String },
}

impl DecryptedEntry {
    #[must_use]
    pub fn record(&self) -> Option<&PasswordRecord> {
        match &self.contents {
            EntryContents::Readable(record) => Some(record),
            EntryContents::Unreadable { .. } => None,
        }
    }
}

/// Decrypt every entry; failures become [`EntryContents::Unreadable`]
/// instead of aborting the list.
#[must_use]
pub fn decrypt_entries(entries: &[PasswordEntry], passphrase: &MasterPassphrase) -> Vec<DecryptedEntry> {
    entries
        .iter()
        .map(|entry| {
            let contents = match passphrase.open(&entry.encrypted_data) {
                Ok(record) => EntryContents::Readable(record),
                Err(error) => {
                    tracing::debug!("Entry {} is unreadable: {}", entry.id, error);
                    EntryContents::Unreadable {
                        reason: error.to_string(),
                    }
                }
            };
            DecryptedEntry {
                id: entry.id,
                category: entry.category.clone(),
                created_at: entry.created_at.clone(),
                updated_at: entry.updated_at.clone(),
                contents,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passphrase_length_is_enforced() {
        assert!(matches!(MasterPassphrase::new(""), Err(VaultError::EmptyPassphrase)));
        assert!(matches!(
            MasterPassphrase::new("short"),
            Err(VaultError::PassphraseTooShort)
        ));
        assert!(MasterPassphrase::new("long enough").is_ok());
    }

    #[test]
    fn passphrase_debug_is_redacted() {
        let passphrase = MasterPassphrase::new("super secret phrase").unwrap();
        assert!(!format!("{passphrase:?}").contains("super secret"));
    }

    #[test]
    fn seal_and_open_record() {
        let passphrase = MasterPassphrase::new("vault passphrase").unwrap();
        let record = PasswordRecord::new("example.com", "alice", "hunter22");
        let sealed = passphrase.seal(&record).unwrap();
        assert!(!sealed.contains("hunter22"));
        assert_eq!(passphrase.open(&sealed).unwrap(), record);
    }

    #[test]
    fn unreadable_entries_do_not_abort_the_list() {
        let right = MasterPassphrase::new("vault passphrase").unwrap();
        let wrong = MasterPassphrase::new("another passphrase").unwrap();

        let good = PasswordEntry::new(
            right
                .seal(&PasswordRecord::new("example.com", "alice", "hunter22"))
                .unwrap(),
            "web",
        );
        let foreign = PasswordEntry::new(
            wrong
                .seal(&PasswordRecord::new("other.com", "bob", "swordfish"))
                .unwrap(),
            "web",
        );

        let views = decrypt_entries(&[good.clone(), foreign.clone()], &right);
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].id, good.id);
        assert_eq!(views[0].record().unwrap().username, "alice");
        assert_eq!(views[1].id, foreign.id);
        assert!(matches!(views[1].contents, EntryContents::Unreadable { .. }));
    }
}
