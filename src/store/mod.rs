//! State persistence
//!
//! The whole `AppState` is stored as one JSON blob under a fixed namespace key in a
//! `KvStore`. Loading never fails: missing or corrupt data degrades to defaults
//! (see `migrate`). Saving reports errors but callers keep their in-memory state.
//!
//! # Usage
//!
//! ```ignore
//! let store = StateStore::new(FileStore::new(data_dir));
//! let state = store.load(SystemClock.today());
//! // ... apply an action ...
//! store.save_or_warn(&transition.state);
//! ```

mod error;
mod file;
mod memory;
pub mod migrate;
mod snapshot;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use snapshot::{ImportPatch, export_state, import_state};

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::domain::AppState;

/// Key the state blob is stored under
pub const STORAGE_KEY: &str = "personal-growth-rpg-v1";

/// Loose keys written by the pre-namespace version of the app
pub const LEGACY_KEYS: &[&str] = &["progress", "checkboxes", "schedule", "xp", "streak"];

/// Minimal scoped key-value storage
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Loads and saves `AppState` through a `KvStore`
pub struct StateStore<S: KvStore> {
    kv: S,
}

impl<S: KvStore> StateStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.kv.get(key) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to read '{}': {}", key, e);
                None
            }
        }
    }

    /// Fields recovered from the pre-namespace loose keys, if any exist
    fn legacy_seed(&self) -> Option<Map<String, Value>> {
        let xp = self.read("xp");
        let progress = self.read("progress");
        let checkboxes = self.read("checkboxes");
        if xp.is_none() && progress.is_none() && checkboxes.is_none() {
            return None;
        }

        let mut seed = Map::new();
        let total_xp = xp
            .and_then(|raw| serde_json::from_str::<Value>(&raw).ok())
            .and_then(|v| match v {
                Value::String(s) => s.trim().parse::<f64>().ok(),
                other => other.as_f64(),
            })
            .filter(|n| n.is_finite())
            .map(|n| n.max(0.0).round() as u64)
            .unwrap_or(0);
        seed.insert("totalXp".to_string(), Value::from(total_xp));

        if let Some(streak) = self
            .read("streak")
            .and_then(|raw| serde_json::from_str::<Value>(&raw).ok())
        {
            let count = streak.get("count").and_then(Value::as_u64).unwrap_or(0);
            let last = streak
                .get("lastDate")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            seed.insert(
                "streak".to_string(),
                serde_json::json!({ "count": count, "lastDate": last }),
            );
        }

        debug!("Found legacy progress keys (xp = {})", total_xp);
        Some(seed)
    }

    /// Load the state, migrating older shapes. Never fails.
    ///
    /// `today` is used for dailies that lack a rollover date.
    pub fn load(&self, today: NaiveDate) -> AppState {
        let stored = self.read(STORAGE_KEY).and_then(|raw| {
            match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(obj)) => Some(obj),
                Ok(_) => {
                    warn!("Stored state is not a JSON object, ignoring it");
                    None
                }
                Err(e) => {
                    warn!("Stored state is not valid JSON ({}), ignoring it", e);
                    None
                }
            }
        });
        let legacy = self.legacy_seed();

        if stored.is_none() && legacy.is_none() {
            return AppState::default();
        }

        let mut root = legacy.unwrap_or_default();
        if let Some(stored) = stored {
            root.extend(stored);
        }
        let mut value = Value::Object(root);

        let applied = migrate::migrate(&mut value, today);
        if !applied.is_empty() {
            info!("Migrated stored state: {}", applied.join(", "));
        }
        migrate::merge_onto_defaults(&value)
    }

    /// Write the state as a single value, then drop any legacy keys
    pub fn save(&self, state: &AppState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state)?;
        self.kv.set(STORAGE_KEY, &json)?;
        self.clear_legacy_keys();
        Ok(())
    }

    /// Save, logging failures instead of returning them
    pub fn save_or_warn(&self, state: &AppState) -> bool {
        match self.save(state) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save state: {}", e);
                false
            }
        }
    }

    fn clear_legacy_keys(&self) {
        for key in LEGACY_KEYS {
            if let Err(e) = self.kv.remove(key) {
                debug!("Failed to remove legacy key '{}': {}", key, e);
            }
        }
    }

    /// Delete everything stored and return a fresh state
    pub fn reset(&self) -> AppState {
        self.clear_legacy_keys();
        if let Err(e) = self.kv.remove(STORAGE_KEY) {
            warn!("Failed to remove stored state: {}", e);
        }
        AppState::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let store = StateStore::new(MemoryStore::new());
        assert_eq!(store.load(today()), AppState::default());
    }

    #[test]
    fn test_save_then_load() {
        let store = StateStore::new(MemoryStore::new());
        let mut state = AppState::default();
        state.total_xp = 450;
        state.level = 3;
        state.character_name = "Jormundan".to_string();
        store.save(&state).unwrap();
        assert_eq!(store.load(today()), state);
    }

    #[test]
    fn test_garbage_blob_loads_defaults() {
        let store = StateStore::new(MemoryStore::new().with_entry(STORAGE_KEY, "not json"));
        assert_eq!(store.load(today()), AppState::default());
    }

    #[test]
    fn test_legacy_keys_seed_state() {
        let kv = MemoryStore::new()
            .with_entry("xp", "420")
            .with_entry("streak", r#"{"count":4,"lastDate":"Sat Oct 17 2026"}"#);
        let store = StateStore::new(kv);
        let state = store.load(today());
        assert_eq!(state.total_xp, 420);
        assert_eq!(state.level, 3);
        assert_eq!(state.streak.count, 4);
        assert_eq!(state.streak.last_date, today().pred_opt());
    }

    #[test]
    fn test_stored_blob_wins_over_legacy() {
        let kv = MemoryStore::new()
            .with_entry("xp", "420")
            .with_entry(STORAGE_KEY, r#"{"totalXp": 50}"#);
        let store = StateStore::new(kv);
        assert_eq!(store.load(today()).total_xp, 50);
    }

    #[test]
    fn test_save_clears_legacy_keys() {
        let store = StateStore::new(MemoryStore::new().with_entry("xp", "10"));
        store.save(&AppState::default()).unwrap();
        assert!(!store.kv().contains("xp"));
        assert!(store.kv().contains(STORAGE_KEY));
    }

    #[test]
    fn test_reset_removes_everything() {
        let store = StateStore::new(MemoryStore::new().with_entry("progress", "{}"));
        let mut state = AppState::default();
        state.total_xp = 999;
        store.save(&state).unwrap();

        let fresh = store.reset();
        assert_eq!(fresh, AppState::default());
        assert!(!store.kv().contains(STORAGE_KEY));
        assert_eq!(store.load(today()), AppState::default());
    }
}
