//! Local key-value storage.
//!
//! The deployed demo kept all state in browser local storage: three JSON
//! documents under fixed string keys, shared by every tab of the origin.
//! This module reproduces that model behind [`StorageBackend`], with a
//! file-per-key store for real persistence and an in-memory store for tests.
//!
//! # Consistency
//!
//! All operations are synchronous and persist immediately; there is no
//! batching and no transaction spanning keys. Concurrent writers (the
//! two-open-tabs case) race on whole-collection writes and the last writer
//! wins with no conflict detection. That is the source system's documented
//! behavior and is preserved here under a single-writer assumption; the
//! lost-update scenario is exercised explicitly in the integration tests
//! rather than silently fixed.

pub mod orders;
pub mod users;

pub use orders::OrderLedger;
pub use users::CredentialStore;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Storage keys, matching the records written by the deployed demo.
pub mod keys {
    /// The registered-users collection.
    pub const USERS: &str = "uwinfly_users";

    /// The current-session slot (sanitized user record).
    pub const CURRENT_USER: &str = "uwinfly_current_user";

    /// The order ledger.
    pub const ORDERS: &str = "uwinfly_orders";
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store cannot be read or written.
    ///
    /// Fatal for the affected operation; callers surface it and abort that
    /// one operation instead of crashing the process.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored record failed to deserialize.
    #[error("stored data is corrupt: {0}")]
    Corrupt(String),
}

/// A synchronous string key-value store.
///
/// The local-storage analog: string keys, string values, no locking, no
/// versioning. Implementations must persist each write before returning.
pub trait StorageBackend {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the store cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing an absent key is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// In-memory store
// =============================================================================

/// In-memory backend for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("poisoned lock".to_owned()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("poisoned lock".to_owned()))?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("poisoned lock".to_owned()))?;
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// File-per-key store
// =============================================================================

/// File-backed store: one `<key>.json` file per key under a data directory.
///
/// Writes go through a temp file and an atomic rename so readers never see a
/// half-written document. I/O failures map to
/// [`StorageError::Unavailable`].
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the directory cannot be
    /// created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| StorageError::Unavailable(format!("{}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        // Keys are fixed identifiers; anything else would escape the data dir.
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(StorageError::Unavailable(format!("invalid key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StorageBackend for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Unavailable(format!(
                "{}: {e}",
                path.display()
            ))),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .map_err(|e| StorageError::Unavailable(format!("{}: {e}", tmp.display())))?;
        fs::rename(&tmp, &path)
            .map_err(|e| StorageError::Unavailable(format!("{}: {e}", path.display())))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Unavailable(format!(
                "{}: {e}",
                path.display()
            ))),
        }
    }
}
