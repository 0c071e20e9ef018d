//! Durable client-side storage for the language preference.

use std::collections::{
    BTreeMap,
    HashMap,
};
use std::fmt;
use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to write preferences to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Preference storage is unavailable")]
    Unavailable,
}

/// Key-value storage that outlives a page load.
pub trait PreferenceStore: fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    /// Returns an error when the value could not be made durable.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Storage that lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Stored key/value pairs.
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        Self { entries: HashMap::from([(key.to_string(), value.to_string())]) }
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage backed by a JSON object on disk, rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Backing JSON file.
    path: PathBuf,
    /// Entries as last read or written.
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`.
    ///
    /// A missing or unreadable file starts an empty store; nothing is written
    /// until the first [`PreferenceStore::set`].
    #[must_use]
    pub fn open(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable preferences file {:?}: {}", path, e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read preferences file {:?}: {}", path, e);
                BTreeMap::new()
            }
        };

        Self { path: path.to_path_buf(), entries }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());

        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)
            .map_err(|source| StorageError::Write { path: self.path.clone(), source })
    }
}
