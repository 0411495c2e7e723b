//! Snapshot storage backed by one JSON file per namespace.

use std::io;
use std::path::{Path, PathBuf};

use super::{Namespace, SnapshotStorage};
use crate::error::Result;

/// Writes `<dir>/<namespace>.json`, replacing files atomically via rename.
#[derive(Debug, Clone)]
pub struct FileSnapshotStorage {
    dir: PathBuf,
}

impl FileSnapshotStorage {
    /// Use `dir` for snapshots, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot file for `namespace`.
    pub fn path_for(&self, namespace: Namespace) -> PathBuf {
        self.dir.join(format!("{}.json", namespace.key()))
    }
}

impl SnapshotStorage for FileSnapshotStorage {
    fn read(&self, namespace: Namespace) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(namespace)) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&self, namespace: Namespace, contents: &str) -> Result<()> {
        let path = self.path_for(namespace);
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, contents)?;
        std::fs::rename(&temp_path, &path)?;
        tracing::debug!("Wrote {} snapshot to {}", namespace.key(), path.display());
        Ok(())
    }

    fn remove(&self, namespace: Namespace) -> Result<()> {
        match std::fs::remove_file(self.path_for(namespace)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_then_read_from_disk() {
        let tmp = tempdir().unwrap();
        let storage = FileSnapshotStorage::open(tmp.path().join("nested")).unwrap();

        assert!(storage.read(Namespace::Favorites).unwrap().is_none());
        storage
            .write(Namespace::Favorites, r#"["json-formatter"]"#)
            .unwrap();

        let reopened = FileSnapshotStorage::open(storage.dir()).unwrap();
        assert_eq!(
            reopened.read(Namespace::Favorites).unwrap().as_deref(),
            Some(r#"["json-formatter"]"#)
        );
        assert!(storage.path_for(Namespace::Favorites).ends_with("favorites.json"));
    }

    #[test]
    fn remove_missing_snapshot_is_ok() {
        let tmp = tempdir().unwrap();
        let storage = FileSnapshotStorage::open(tmp.path()).unwrap();
        storage.remove(Namespace::PasswordVault).unwrap();
        storage.write(Namespace::PasswordVault, "{}").unwrap();
        storage.remove(Namespace::PasswordVault).unwrap();
        assert!(storage.read(Namespace::PasswordVault).unwrap().is_none());
    }
}
