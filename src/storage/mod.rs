//! Key-value storage layer
//!
//! Stands in for per-browser local storage: string values under string keys,
//! read and written synchronously. Two drivers:
//! - In-memory storage, for tests and throwaway sessions
//! - File storage, one JSON document per key under a directory
//!
//! Typed access goes through [`read_json`] and [`write_json`]. A value that
//! fails to parse is treated as absent so a corrupted record never takes the
//! store down.

pub mod file;
pub mod memory;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use crate::config::{StorageConfig, StorageDriver};

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage interface shared by every driver
pub trait KeyValueStorage: Send + Sync {
    /// Get the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Read and deserialize a JSON value.
///
/// Missing keys, read failures and unparsable values all yield `None`; the
/// latter two are logged.
pub fn read_json<T: DeserializeOwned>(storage: &dyn KeyValueStorage, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Failed to read '{}' from storage: {:#}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring malformed value stored under '{}': {}", key, e);
            None
        }
    }
}

/// Serialize a value to JSON and store it.
pub fn write_json<T: Serialize + ?Sized>(storage: &dyn KeyValueStorage, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value).context("Failed to serialize storage value")?;
    storage.set(key, &json)
}

/// Create a storage instance based on configuration
pub fn create_storage(config: &StorageConfig) -> Result<Arc<dyn KeyValueStorage>> {
    match config.driver {
        StorageDriver::Memory => {
            tracing::info!("Using in-memory storage");
            Ok(Arc::new(MemoryStorage::new()))
        }
        StorageDriver::File => {
            tracing::info!("Using file storage at {}", config.path.display());
            Ok(Arc::new(FileStorage::open(&config.path)?))
        }
    }
}
