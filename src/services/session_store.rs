//! Key-value session store shared by the start, game and results screens.

use crate::error::StoreError;
use crate::models::RoundRecord;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Key holding the player's name as a plain string
pub const PLAYER_NAME_KEY: &str = "playerName";

/// Key holding the JSON array of finished rounds
pub const GAME_RESULTS_KEY: &str = "gameResults";

/// Trait for string key-value storage
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError>;
}

/// In-memory storage
pub struct InMemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.clear();
        Ok(())
    }
}

/// Storage backed by a JSON object on disk.
///
/// Every mutation rewrites the whole file through a temporary sibling and a
/// rename, so a crash never leaves a half-written store.
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable one is logged and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), %e, "Store file is not a JSON object, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened session store");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.clear();
        self.persist(&entries)
    }
}

/// Stored player name, if any
pub fn read_player_name(store: &dyn SessionStore) -> Result<Option<String>, StoreError> {
    store.get(PLAYER_NAME_KEY)
}

/// Overwrite the stored round history with `history`
pub fn write_history(store: &dyn SessionStore, history: &[RoundRecord]) -> Result<(), StoreError> {
    store.set(GAME_RESULTS_KEY, serde_json::to_string(history)?)
}

/// Stored round history. `Ok(None)` when absent, `Err` when malformed.
pub fn read_history(store: &dyn SessionStore) -> Result<Option<Vec<RoundRecord>>, StoreError> {
    match store.get(GAME_RESULTS_KEY)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let store = InMemoryStore::new();

        store.set("k", "v".to_string()).unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let store = InMemoryStore::new();

        store.set("k", "one".to_string()).unwrap();
        store.set("k", "two".to_string()).unwrap();
        assert_eq!(store.get("k").unwrap(), Some("two".to_string()));
    }

    #[test]
    fn test_remove_and_clear() {
        let store = InMemoryStore::new();
        store.set("a", "1".to_string()).unwrap();
        store.set("b", "2".to_string()).unwrap();

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap(), Some("2".to_string()));

        store.clear().unwrap();
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn test_history_round_trip_uses_persisted_layout() {
        let store = InMemoryStore::new();
        let history = vec![RoundRecord::scored("#000000", "#FFFFFF", 0)];

        write_history(&store, &history).unwrap();
        let raw = store.get(GAME_RESULTS_KEY).unwrap().unwrap();
        assert!(raw.starts_with("[{\"targetColor\":\"#000000\""));

        assert_eq!(read_history(&store).unwrap(), Some(history));
    }

    #[test]
    fn test_read_history_absent_and_malformed() {
        let store = InMemoryStore::new();
        assert_eq!(read_history(&store).unwrap(), None);

        store.set(GAME_RESULTS_KEY, "{not json".to_string()).unwrap();
        assert!(matches!(read_history(&store), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.set(PLAYER_NAME_KEY, "Ada".to_string()).unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(read_player_name(&reopened).unwrap(), Some("Ada".to_string()));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("nope.json")).unwrap();
        assert_eq!(store.get(PLAYER_NAME_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get(PLAYER_NAME_KEY).unwrap(), None);

        store.set("k", "v".to_string()).unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn test_file_store_remove_and_clear_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.set("a", "1".to_string()).unwrap();
        store.set("b", "2".to_string()).unwrap();
        store.remove("a").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("a").unwrap(), None);
        assert_eq!(reopened.get("b").unwrap(), Some("2".to_string()));

        reopened.clear().unwrap();
        let cleared = JsonFileStore::open(&path).unwrap();
        assert_eq!(cleared.get("b").unwrap(), None);
    }
}
