//! File storage
//!
//! Each key maps to one file in the storage directory. Keys are
//! percent-encoded so that any string (emails included) maps to a distinct,
//! portable file name. Writes go to a uniquely named temporary file in the
//! same directory and are persisted over the target.

use super::KeyValueStorage;
use anyhow::{Context, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Directory-backed storage
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create storage directory {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", escape_key(key)))
    }
}

fn escape_key(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let mut tmp = NamedTempFile::new_in(&self.root)
            .with_context(|| format!("Failed to create temporary file in {}", self.root.display()))?;
        tmp.write_all(value.as_bytes())
            .with_context(|| format!("Failed to write {}", tmp.path().display()))?;
        // A failed persist drops the temporary file, which removes it.
        tmp.persist(&path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}
