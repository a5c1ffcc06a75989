//! # Key/Value Storage
//!
//! [`KeyValueStore`] implementations.
//!
//! - [`MemoryStore`]: in-process map; can be switched off to model a host
//!   that refuses storage access
//! - [`FileStore`]: one JSON object file, the desktop stand-in for
//!   browser-local storage
//!
//! ## File Format
//! ```json
//! {
//!   "i18nextLng": "ar",
//!   "theme": "dark"
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use directories::ProjectDirs;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};
use crate::lock;
use crate::ports::KeyValueStore;

/// Key holding the theme preference (`light` | `dark` | `system`).
pub const THEME_STORAGE_KEY: &str = "theme";

/// Key holding the language tag, shared with the i18n layer.
pub const LANGUAGE_STORAGE_KEY: &str = "i18nextLng";

/// File name used under the platform data directory.
pub const STORAGE_FILE_NAME: &str = "storage.json";

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory key/value store.
#[derive(Debug)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    available: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty, available store.
    pub fn new() -> Self {
        MemoryStore {
            values: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Creates a store that fails every read and write.
    pub fn unavailable() -> Self {
        let store = MemoryStore::new();
        store.set_available(false);
        store
    }

    /// Creates a store pre-filled with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = MemoryStore::new();
        lock(&store.values).extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        store
    }

    /// Switches access on or off. Stored values survive while off.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> StorageResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::Unavailable("memory store disabled".into()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.check_available()?;
        Ok(lock(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.check_available()?;
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// File Store
// =============================================================================

/// JSON-file backed key/value store.
///
/// Every `get` re-reads the file, so several processes sharing one file
/// see each other's last write. Nothing merges concurrent writers.
///
/// Writes go to a temporary file in the same directory which is then
/// renamed over the target, so a reader sees either the old or the new
/// contents, never a partial file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Uses the file at `path` (created on first write).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Platform default location.
    ///
    /// - **macOS**: `~/Library/Application Support/com.storefront.demo/storage.json`
    /// - **Linux**: `~/.local/share/demo/storage.json`
    /// - **Windows**: `%APPDATA%\storefront\demo\data\storage.json`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "storefront", "demo")
            .map(|dirs| dirs.data_dir().join(STORAGE_FILE_NAME))
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| StorageError::Corrupt(e.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = lock(&self.write_lock);

        let mut values = match self.read_all() {
            Ok(values) => values,
            Err(StorageError::Corrupt(reason)) => {
                warn!(path = ?self.path, %reason, "Replacing corrupt storage file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        values.insert(key.to_string(), value.to_string());

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let contents =
            serde_json::to_string_pretty(&values).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(contents.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = ?self.path, key, "Storage value written");
        Ok(())
    }
}
