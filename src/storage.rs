//! Namespaced key-value persistence.
//!
//! Every value is stored as JSON in its own file under the data directory,
//! with keys prefixed `groovezilla_`. All failures are caught, logged and
//! reported as `false`/`None`/default; nothing here ever propagates an error
//! to a caller.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const STORE_PREFIX: &str = "groovezilla_";

/// File-backed key-value store scoped to a single directory.
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: PathBuf) -> Self {
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "could not create data directory");
        }
        Self { dir }
    }

    /// Open the store at the default data path (see [`resolve_data_path`]).
    pub fn open_default() -> Self {
        Self::open(resolve_data_path())
    }

    fn file_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{STORE_PREFIX}{key}.json"))
    }

    /// Serialize `value` under `key`. Returns `false` on any failure.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let path = self.file_for(key);
        let json = match serde_json::to_string_pretty(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage set: serialize failed");
                return false;
            }
        };
        match fs::write(&path, json) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage set: write failed");
                false
            }
        }
    }

    /// Read and deserialize the value under `key`, or `None` if absent or unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.file_for(key);
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(_) => return None,
        };
        match serde_json::from_str(&text) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(key, error = %e, "storage get: parse failed");
                None
            }
        }
    }

    /// Like [`Store::get`], but substituting `default` when the key is missing or broken.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Delete the value under `key`. Removing an absent key succeeds.
    pub fn remove(&self, key: &str) -> bool {
        let path = self.file_for(key);
        if !path.exists() {
            return true;
        }
        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage remove failed");
                false
            }
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.file_for(key).exists()
    }

    /// Remove every key in the namespace. Returns `false` if any removal failed.
    pub fn clear(&self) -> bool {
        let mut ok = true;
        for key in self.keys() {
            ok &= self.remove(&key);
        }
        ok
    }

    /// All keys currently present, without the namespace prefix.
    pub fn keys(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "storage keys: read_dir failed");
                return Vec::new();
            }
        };
        let mut keys: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|e| e.file_name().into_string().ok())
            .filter_map(|name| {
                name.strip_prefix(STORE_PREFIX)
                    .and_then(|rest| rest.strip_suffix(".json"))
                    .map(str::to_string)
            })
            .collect();
        keys.sort();
        keys
    }

    /// Snapshot the whole namespace as a key → JSON value map.
    pub fn export_data(&self) -> serde_json::Map<String, Value> {
        let mut data = serde_json::Map::new();
        for key in self.keys() {
            if let Some(value) = self.get::<Value>(&key) {
                data.insert(key, value);
            }
        }
        data
    }

    /// Write every entry of `data` into the store. Returns `false` if any write failed.
    pub fn import_data(&self, data: &serde_json::Map<String, Value>) -> bool {
        let mut ok = true;
        for (key, value) in data {
            ok &= self.set(key, value);
        }
        ok
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Resolve the data path from `GROOVEZILLA_DATA_PATH` or XDG defaults.
pub fn resolve_data_path() -> PathBuf {
    if let Some(p) = env::var_os("GROOVEZILLA_DATA_PATH") {
        return PathBuf::from(p);
    }
    default_data_path()
}

/// Compute the default data path under `$XDG_DATA_HOME/groovezilla` or
/// `~/.local/share/groovezilla` when `XDG_DATA_HOME` is not set.
pub fn default_data_path() -> PathBuf {
    if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("groovezilla");
    }
    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".local").join("share").join("groovezilla");
    }
    PathBuf::from(".groovezilla")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store() -> (tempfile::TempDir, Store) {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn set_get_round_trip() {
        let (_dir, store) = store();
        assert!(store.set("likes", &vec![4u32, 7, 9]));
        assert_eq!(store.get::<Vec<u32>>("likes"), Some(vec![4, 7, 9]));
    }

    #[test]
    fn get_missing_key_returns_none_and_default() {
        let (_dir, store) = store();
        assert_eq!(store.get::<Vec<u32>>("nope"), None);
        assert_eq!(store.get_or::<Vec<u32>>("nope", vec![1]), vec![1]);
    }

    #[test]
    fn corrupt_value_reports_default_not_error() {
        let (_dir, store) = store();
        let path = store.dir().join(format!("{STORE_PREFIX}history.json"));
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(store.get::<Vec<u32>>("history"), None);
        assert_eq!(store.get_or::<Vec<u32>>("history", Vec::new()), Vec::<u32>::new());
    }

    #[test]
    fn keys_are_unprefixed_and_sorted() {
        let (_dir, store) = store();
        store.set("playlists", &1);
        store.set("favorites", &2);
        assert_eq!(store.keys(), vec!["favorites".to_string(), "playlists".to_string()]);
    }

    #[test]
    fn has_remove_and_clear() {
        let (_dir, store) = store();
        store.set("theme", &"dark");
        assert!(store.has("theme"));
        assert!(store.remove("theme"));
        assert!(!store.has("theme"));
        // removing an absent key still succeeds
        assert!(store.remove("theme"));

        store.set("a", &1);
        store.set("b", &2);
        assert!(store.clear());
        assert!(store.keys().is_empty());
    }

    #[test]
    fn export_import_round_trips_namespace() {
        let (_dir, store) = store();
        store.set("likes", &vec![4u32]);
        store.set("theme", &"dark");
        let data = store.export_data();

        let (_dir2, other) = self::store();
        assert!(other.import_data(&data));
        assert_eq!(other.get::<Vec<u32>>("likes"), Some(vec![4]));
        assert_eq!(other.get::<String>("theme"), Some("dark".to_string()));
    }
}
