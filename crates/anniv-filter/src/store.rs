//! Key-value storage for saved filters.
//!
//! The engine only needs an opaque string store: [`KeyValueStore::get`] and
//! [`KeyValueStore::set`]. Two implementations are provided:
//!
//! - [`MemoryStore`] - in-process map, for tests and embedding
//! - [`JsonFileStore`] - one JSON object file at an XDG data path
//!   (`~/.local/share/anniv/presets.json` on Linux)
//!
//! File writes are atomic (temp file + rename), so a crash mid-write never
//! leaves a truncated store behind.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

/// Default store filename.
const STORE_FILENAME: &str = "presets.json";

/// Application qualifier (for XDG paths).
const QUALIFIER: &str = "";

/// Application organization (for XDG paths).
const ORGANIZATION: &str = "";

/// Application name (for XDG paths).
const APPLICATION: &str = "anniv";

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to determine the XDG data directory.
    #[error("failed to determine data directory: no valid home directory found")]
    NoDataDir,

    /// I/O error during file read.
    #[error("failed to read store file '{path}': {source}")]
    ReadError {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during file write.
    #[error("failed to write store file '{path}': {source}")]
    WriteError {
        /// The path that failed to write.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during directory creation.
    #[error("failed to create store directory '{path}': {source}")]
    CreateDirError {
        /// The directory path that failed to create.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The store file is not a JSON object.
    #[error("store file '{path}' is not a JSON object")]
    NotAnObject {
        /// The offending file.
        path: PathBuf,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// An opaque string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if unset.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<()>> + Send;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// File-backed store holding every key in one JSON object.
///
/// Values are stored as JSON strings. Writes through one `JsonFileStore` are
/// serialized; separate processes writing the same file race at the level of
/// whole-file replacement.
///
/// # Example
///
/// ```no_run
/// use anniv_filter_rs::store::{JsonFileStore, KeyValueStore};
///
/// # async fn demo() -> anniv_filter_rs::store::Result<()> {
/// let store = JsonFileStore::new()?;
/// store.set("advanced-filters-shirts", "[]".to_string()).await?;
/// assert_eq!(store.get("advanced-filters-shirts").await?.as_deref(), Some("[]"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store at the default XDG data path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoDataDir` if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(Self::default_path()?))
    }

    /// Creates a store at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the default store path.
    ///
    /// On Unix: `~/.local/share/anniv/presets.json`
    /// On macOS: `~/Library/Application Support/anniv/presets.json`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoDataDir` if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(StoreError::NoDataDir)?;
        Ok(project_dirs.data_dir().join(STORE_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every entry; a missing file is an empty store.
    async fn load_entries(&self) -> Result<Map<String, Value>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&contents)? {
            Value::Object(entries) => Ok(entries),
            _ => Err(StoreError::NotAnObject {
                path: self.path.clone(),
            }),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.load_entries().await?;
        Ok(entries.get(key).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load_entries().await?;
        entries.insert(key.to_string(), Value::String(value));

        let json = serde_json::to_string_pretty(&entries)?;
        write_atomic(&self.path, json.as_bytes()).await
    }
}

/// Writes a file atomically: temp file in the same directory, then rename.
///
/// Creates the parent directory if it doesn't exist.
///
/// # Errors
///
/// - Returns `StoreError::CreateDirError` if the directory cannot be created.
/// - Returns `StoreError::WriteError` if the file cannot be written.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::CreateDirError {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }

    let temp_path = path.with_extension("tmp");
    tokio::fs::write(&temp_path, contents)
        .await
        .map_err(|e| StoreError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
    tokio::fs::rename(&temp_path, path)
        .await
        .map_err(|e| StoreError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
