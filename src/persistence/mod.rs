//! Local key-value persistence for user preferences.
//!
//! Keys map to JSON documents. The production store keeps one
//! `<key>.json` file per key under the platform app-data dir; tests use
//! the in-memory store. Writes are synchronous and last-write-wins; a
//! single active app instance is assumed.

pub mod prefs;

use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
};

use serde::{
    de::DeserializeOwned,
    Serialize,
};
use serde_json::Value;

const APP_NAME: &str = "tangocho";

pub fn app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        let _ = fs::create_dir_all(&app_dir);
        app_dir
    } else {
        PathBuf::from(".")
    }
}

/// Storage capability for user preferences. Call sites only ever see
/// JSON values keyed by string; the medium behind it is swappable.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
    fn remove(&mut self, key: &str);
}

pub fn load_json_or_default<T: DeserializeOwned + Default>(
    store: &dyn PreferenceStore,
    key: &str,
) -> T {
    match store.get(key) {
        Some(value) => match serde_json::from_value(value) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("[Prefs] Failed to decode {}: {}. Using defaults.", key, e);
                T::default()
            }
        },
        None => T::default(),
    }
}

pub fn save_json<T: Serialize>(store: &mut dyn PreferenceStore, key: &str, data: &T) {
    match serde_json::to_value(data) {
        Ok(value) => store.set(key, value),
        Err(e) => eprintln!("[Prefs] Failed to encode {}: {}", key, e),
    }
}

/// One JSON file per key under the app-data dir.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new() -> Self {
        Self { dir: app_data_dir() }
    }

    pub fn at(dir: PathBuf) -> Self {
        let _ = fs::create_dir_all(&dir);
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        let path = self.path_for(key);
        if !path.exists() {
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(value) => Some(value),
                Err(e) => {
                    eprintln!("[Prefs] Corrupt preference file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                eprintln!("[Prefs] Failed to read {:?}: {}", path, e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: Value) {
        let path = self.path_for(key);
        match serde_json::to_string_pretty(&value) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, json) {
                    eprintln!("[Prefs] Failed to write {:?}: {}", path, e);
                }
            }
            Err(e) => eprintln!("[Prefs] Failed to serialize {}: {}", key, e),
        }
    }

    fn remove(&mut self, key: &str) {
        let path = self.path_for(key);
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                eprintln!("[Prefs] Failed to delete {:?}: {}", path, e);
            }
        }
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_typed_values() {
        let mut store = MemoryStore::new();
        let names: HashMap<String, String> =
            [("1".to_string(), "Phrasal verbs".to_string())].into_iter().collect();

        save_json(&mut store, "wordbook_names_3", &names);
        let loaded: HashMap<String, String> = load_json_or_default(&store, "wordbook_names_3");
        assert_eq!(loaded.get("1").map(String::as_str), Some("Phrasal verbs"));
    }

    #[test]
    fn missing_key_yields_default() {
        let store = MemoryStore::new();
        let loaded: HashMap<String, String> = load_json_or_default(&store, "nothing_here");
        assert!(loaded.is_empty());
    }

    #[test]
    fn remove_clears_the_key() {
        let mut store = MemoryStore::new();
        store.set("k", serde_json::json!(1));
        store.remove("k");
        assert!(store.get("k").is_none());
    }
}
