//! Durable string key-value storage.
//!
//! Values are whole serialized documents; every write replaces the previous
//! value for its key.

use crate::config;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for storage operations
#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    Serialize(serde_json::Error),
    NoDataDir,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "IO error: {}", e),
            StorageError::Serialize(e) => write!(f, "Serialization error: {}", e),
            StorageError::NoDataDir => write!(f, "No data directory available"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialize(e)
    }
}

/// Opaque get/set-by-key string store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Read and parse the JSON document under `key`.
/// Unparseable data is treated the same as no data.
pub fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable stored value for '{}': {}", key, e);
            None
        }
    }
}

/// Serialize `value` and overwrite `key` with it
pub fn save_json<T: Serialize + ?Sized>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, raw)
}

/// Store backed by a single JSON object file, rewritten on every set
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing or corrupt file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let entries = if path.exists() {
            let contents = fs::read(&path)?;
            serde_json::from_slice(&contents).unwrap_or_else(|e| {
                log::warn!("Store file {:?} is corrupt, starting empty: {}", path, e);
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };

        log::debug!("Opened store {:?} with {} entries", path, entries.len());
        Ok(Self { path, entries })
    }

    /// Open the store in the XDG data directory
    pub fn open_default() -> Result<Self, StorageError> {
        let dir = data_dir().ok_or(StorageError::NoDataDir)?;
        Self::open(dir.join(config::STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        let contents = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, contents)?;
        log::debug!("Store saved to {:?} ({})", self.path, key);
        Ok(())
    }
}

/// Process-local store, used when no data directory exists
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// XDG data directory for the application
pub fn data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "myyc", config::APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// XDG cache directory for the application
pub fn cache_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "myyc", config::APP_NAME)
        .map(|dirs| dirs.cache_dir().to_path_buf())
}
