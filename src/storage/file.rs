//! Directory-backed storage backend
//!
//! One file per key. Writes go to a `<key>.pending` sibling first and are renamed
//! into place, so a reader never observes a half-written roster.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::kv::KeyValueStore;
use crate::error::{RosterError, Result};

/// Key-value store persisting each key as a file under `root`
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| RosterError::Storage {
            message: format!("Failed to create {}: {}", root.display(), e),
        })?;
        Ok(Self { root })
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.')
            && !key.ends_with(".pending");
        if !valid {
            return Err(RosterError::Storage {
                message: format!("Invalid storage key: {:?}", key),
            });
        }
        Ok(self.root.join(key))
    }

    /// Staging file for `key`, named `<key>.pending`
    fn pending_path_for(&self, key: &str) -> Result<PathBuf> {
        self.path_for(key)?;
        Ok(self.root.join(format!("{key}.pending")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RosterError::Storage {
                message: format!("Read failed for {}: {}", key, e),
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let pending = self.pending_path_for(key)?;

        fs::write(&pending, value).map_err(|e| RosterError::Storage {
            message: format!("Write failed for {}: {}", key, e),
        })?;
        fs::rename(&pending, &path).map_err(|e| RosterError::Storage {
            message: format!("Commit failed for {}: {}", key, e),
        })?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RosterError::Storage {
                message: format!("Delete failed for {}: {}", key, e),
            }),
        }
    }
}
