//! In-memory snapshot storage for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{Namespace, SnapshotStorage};
use crate::error::{Error, Result};

/// Snapshot storage held in memory. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStorage {
    entries: Arc<Mutex<HashMap<Namespace, String>>>,
}

impl MemorySnapshotStorage {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Namespace, String>>> {
        self.entries
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))
    }
}

impl SnapshotStorage for MemorySnapshotStorage {
    fn read(&self, namespace: Namespace) -> Result<Option<String>> {
        Ok(self.lock()?.get(&namespace).cloned())
    }

    fn write(&self, namespace: Namespace, contents: &str) -> Result<()> {
        self.lock()?.insert(namespace, contents.to_string());
        Ok(())
    }

    fn remove(&self, namespace: Namespace) -> Result<()> {
        self.lock()?.remove(&namespace);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let storage = MemorySnapshotStorage::default();
        let other = storage.clone();
        storage.write(Namespace::ToolHistory, "[]").unwrap();
        assert_eq!(
            other.read(Namespace::ToolHistory).unwrap().as_deref(),
            Some("[]")
        );
        other.remove(Namespace::ToolHistory).unwrap();
        assert!(storage.read(Namespace::ToolHistory).unwrap().is_none());
    }
}
