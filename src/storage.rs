//! Key-value persistence for user preferences.
//!
//! The console keeps a handful of scalar preferences (currently only the
//! chosen language) in a small durable key-value store, the way a browser
//! front-end would use local storage.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};

/// Key under which the language preference is stored.
pub const LANG_KEY: &str = "lang";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("preference file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("preference file `{path}` is not a JSON object of strings: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Synchronous key-value preference storage.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<P: PreferenceStore + ?Sized> PreferenceStore for std::sync::Arc<P> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

// ==================== Memory ====================

/// In-process preference store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ==================== File ====================

/// Preference store backed by a JSON object file.
///
/// The file is read on every `get` and rewritten on every `set`, so several
/// processes pointed at the same file see each other's last write. A `set`
/// replaces a file that is not valid JSON instead of failing on it.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source: std::io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(entries).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;

        // Replace the file atomically: write a sibling, then rename over it
        let tmp = self.tmp_path();
        let written = std::fs::write(&tmp, json).and_then(|_| std::fs::rename(&tmp, &self.path));
        if let Err(source) = written {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(source));
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "preferences".to_string());
        self.path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(StorageError::Json { path, source }) => {
                warn!(
                    "Discarding unreadable preference file {}: {}",
                    path.display(),
                    source
                );
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)?;

        debug!("Stored preference {}={} in {}", key, value, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ==================== Memory Store Tests ====================

    #[test]
    fn test_memory_store_get_absent() {
        let store = MemoryStore::new();
        assert_eq!(store.get(LANG_KEY).unwrap(), None);
    }

    #[test]
    fn test_memory_store_set_then_get() {
        let store = MemoryStore::new();
        store.set(LANG_KEY, "fr").unwrap();
        assert_eq!(store.get(LANG_KEY).unwrap().as_deref(), Some("fr"));

        store.set(LANG_KEY, "de").unwrap();
        assert_eq!(store.get(LANG_KEY).unwrap().as_deref(), Some("de"));
    }

    #[test]
    fn test_memory_store_with_entry() {
        let store = MemoryStore::with_entry(LANG_KEY, "es");
        assert_eq!(store.get(LANG_KEY).unwrap().as_deref(), Some("es"));
    }

    // ==================== File Store Tests ====================

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.get(LANG_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        FileStore::new(&path).set(LANG_KEY, "zh-cn").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(LANG_KEY).unwrap().as_deref(), Some("zh-cn"));
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let store = FileStore::new(&path);
        store.set(LANG_KEY, "fr").unwrap();

        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get(LANG_KEY).unwrap().as_deref(), Some("fr"));
    }

    #[test]
    fn test_file_store_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let result = FileStore::new(&path).get(LANG_KEY);
        assert!(matches!(result, Err(StorageError::Json { .. })));
    }

    #[test]
    fn test_file_store_set_repairs_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{\"lang\": \"d").unwrap();

        let store = FileStore::new(&path);
        store.set(LANG_KEY, "en").unwrap();

        assert_eq!(store.get(LANG_KEY).unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn test_file_store_set_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"lang": "de"}"#).unwrap();

        FileStore::new(&path).set(LANG_KEY, "fr").unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["prefs.json".to_string()]);

        let contents = std::fs::read_to_string(&path).unwrap();
        let entries: BTreeMap<String, String> = serde_json::from_str(&contents).unwrap();
        assert_eq!(entries.get(LANG_KEY).map(String::as_str), Some("fr"));
    }

    #[test]
    fn test_file_store_failed_write_keeps_original() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be cannot be replaced
        let path = dir.path().join("prefs.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        let result = FileStore::new(&path).set(LANG_KEY, "fr");

        assert!(matches!(result, Err(StorageError::Io { .. })));
        assert!(path.join("keep").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_file_store_empty_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "").unwrap();

        assert_eq!(FileStore::new(&path).get(LANG_KEY).unwrap(), None);
    }
}
