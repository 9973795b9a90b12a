//! Key/value persistence for the form snapshot.
//!
//! The form keeps a single serialized [`FormState`] under [`STATE_KEY`].
//! Storage is a capability ([`StateStore`]) so the generator and reducer can
//! be exercised without a backend.

use crate::error::CamekoError;
use crate::state::FormState;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Key under which the form snapshot is stored.
pub const STATE_KEY: &str = "idolPostGenerator";

/// Minimal string key/value storage.
pub trait StateStore {
    /// Read the raw value for `key`, or `None` when nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns [`CamekoError::StateRead`] when the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, CamekoError>;

    /// Replace the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CamekoError::StateWrite`] when the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), CamekoError>;

    /// Drop the value for `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CamekoError::StateWrite`] when the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), CamekoError>;
}

/// One JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The platform data directory (`~/.local/share/cameko` on Linux).
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("cameko"))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>, CamekoError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(CamekoError::StateRead(err)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CamekoError> {
        std::fs::create_dir_all(&self.dir).map_err(CamekoError::StateWrite)?;

        // Temp file + rename: readers never observe a partial snapshot.
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        let mut file = std::fs::File::create(&tmp).map_err(CamekoError::StateWrite)?;
        file.write_all(value.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(CamekoError::StateWrite)?;
        std::fs::rename(&tmp, &path).map_err(CamekoError::StateWrite)
    }

    fn remove(&self, key: &str) -> Result<(), CamekoError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(CamekoError::StateWrite(err)),
        }
    }
}

/// In-process store, mostly for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with one raw entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, CamekoError> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CamekoError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CamekoError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Read and decode the saved snapshot.
///
/// # Errors
///
/// Returns an error when the backend fails or the saved JSON is malformed.
pub fn try_load_state(store: &dyn StateStore) -> Result<Option<FormState>, CamekoError> {
    let Some(raw) = store.read(STATE_KEY)? else {
        return Ok(None);
    };
    let state = serde_json::from_str(&raw)?;
    Ok(Some(state))
}

/// Load the saved snapshot, falling back to defaults on any failure.
#[must_use]
pub fn load_state(store: &dyn StateStore) -> FormState {
    match try_load_state(store) {
        Ok(Some(state)) => state,
        Ok(None) => {
            tracing::debug!("no saved form state; using defaults");
            FormState::default()
        }
        Err(err) => {
            tracing::error!(
                error = %err,
                code = %err.error_code(),
                "error parsing saved form state; using defaults"
            );
            FormState::default()
        }
    }
}

/// Serialize and write the full snapshot.
///
/// # Errors
///
/// Returns an error when serialization or the backend write fails.
pub fn save_state(store: &dyn StateStore, state: &FormState) -> Result<(), CamekoError> {
    let raw = serde_json::to_string(state)?;
    store.write(STATE_KEY, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("nested"));

        let mut state = FormState::default();
        state.event_title = "定期公演".into();
        state.selected_members = vec!["大谷 映美里".into()];
        save_state(&store, &state).expect("save");

        assert!(store.path_for(STATE_KEY).is_file());
        assert_eq!(load_state(&store), state);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path());
        assert!(store.read(STATE_KEY).expect("read").is_none());
        assert_eq!(load_state(&store), FormState::default());
        store.remove(STATE_KEY).expect("remove missing");
    }

    #[test]
    fn malformed_snapshot_falls_back_to_defaults() {
        let store = MemoryStore::with_entry(STATE_KEY, "{not json");
        assert!(try_load_state(&store).is_err());
        assert_eq!(load_state(&store), FormState::default());
    }

    #[test]
    fn wrong_shape_snapshot_falls_back_to_defaults() {
        let store = MemoryStore::with_entry(STATE_KEY, r#"{"selectedMembers": "oops"}"#);
        assert_eq!(load_state(&store), FormState::default());
    }

    #[test]
    fn partial_snapshot_fills_defaults() {
        let store = MemoryStore::with_entry(STATE_KEY, r#"{"venueName":"武道館"}"#);
        let state = load_state(&store);
        assert_eq!(state.venue_name, "武道館");
        assert_eq!(state.honorific, "さん");
    }

    #[test]
    fn saved_json_uses_camel_case_keys() {
        let store = MemoryStore::new();
        save_state(&store, &FormState::default()).expect("save");
        let raw = store.get(STATE_KEY).expect("saved");
        assert!(raw.contains("\"useParenthesesForAccount\":true"));
        assert!(raw.contains("\"selectedGroup\":\"イコラブ\""));
    }

    #[test]
    fn remove_clears_entry() {
        let store = MemoryStore::with_entry(STATE_KEY, "{}");
        store.remove(STATE_KEY).expect("remove");
        assert!(store.get(STATE_KEY).is_none());
    }
}
