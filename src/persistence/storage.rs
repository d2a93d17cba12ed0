//! Key/value storage capabilities.
//!
//! A `Storage` is constructed once by the entry point and injected into the
//! `StorageManager`; nothing in the crate reaches for a global store.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use crate::core::SessionError;

/// String key/value store.
pub trait Storage {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: String) -> Result<(), SessionError>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), SessionError>;

    /// Delete every value.
    fn clear(&mut self) -> Result<(), SessionError>;
}

/// In-process store; contents vanish with the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    data: FxHashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.data.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.data.clear();
        Ok(())
    }
}

/// Store backed by one JSON file holding an object of string values.
///
/// The file is read once on open and rewritten after every mutation.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
    data: FxHashMap<String, String>,
}

impl FileStorage {
    /// Open `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or is not a JSON object
    /// of strings.
    #[instrument(skip_all)]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let data = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => FxHashMap::default(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => FxHashMap::default(),
            Err(err) => return Err(err.into()),
        };

        debug!(path = %path.display(), keys = data.len(), "storage opened");
        Ok(Self { path, data })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), SessionError> {
        let text = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        self.data.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        if self.data.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.data.clear();
        self.flush()
    }
}
