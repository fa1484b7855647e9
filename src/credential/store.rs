//! [`CredentialStore`] trait and its file / in-memory implementations.
//!
//! The on-disk layout is a flat JSON object with one well-known key:
//!
//! ```json
//! { "geminiApiKey": "AIza..." }
//! ```
//!
//! Unknown keys already present in the file are carried over on write.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::AppPaths;

/// Key under which the API credential is stored.
pub const CREDENTIAL_KEY: &str = "geminiApiKey";

// ---------------------------------------------------------------------------
// CredentialError
// ---------------------------------------------------------------------------

/// Errors that can occur while persisting a credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The credential file or its directory could not be written.
    #[error("cannot write credential file: {0}")]
    Io(#[from] std::io::Error),

    /// The record could not be serialised.
    #[error("cannot serialise credential record: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// CredentialStore trait
// ---------------------------------------------------------------------------

/// Read/write access to the single stored credential.
///
/// `get` never fails: anything that prevents reading a value (missing file,
/// unreadable or malformed JSON, missing key, empty string) reads as `None`.
pub trait CredentialStore: Send + Sync {
    /// The stored credential, or `None` when not configured.
    fn get(&self) -> Option<String>;

    /// Persist `value`, replacing any previous one. Returns once the value is
    /// durable on disk.
    fn set(&self, value: &str) -> Result<(), CredentialError>;
}

// ---------------------------------------------------------------------------
// FileCredentialStore
// ---------------------------------------------------------------------------

/// JSON-file backed store, by default at
/// [`AppPaths::credential_file`](crate::config::AppPaths).
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store at the platform-appropriate location.
    pub fn new() -> Self {
        Self::at(AppPaths::new().credential_file)
    }

    /// Store at an explicit path (useful for tests).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_record(&self) -> Option<Map<String, Value>> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) => {
                log::warn!(
                    "credential: {} is not a JSON object, ignoring",
                    self.path.display()
                );
                None
            }
            Err(e) => {
                log::warn!("credential: cannot parse {}: {e}", self.path.display());
                None
            }
        }
    }
}

impl Default for FileCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<String> {
        self.read_record()?
            .get(CREDENTIAL_KEY)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn set(&self, value: &str) -> Result<(), CredentialError> {
        let mut record = self.read_record().unwrap_or_default();
        record.insert(CREDENTIAL_KEY.to_string(), Value::String(value.to_string()));
        let data = serde_json::to_string_pretty(&Value::Object(record))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Write-then-rename so a crash mid-write never leaves a truncated record.
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = std::fs::File::create(&tmp)?;
            file.write_all(data.as_bytes())?;
            file.sync_all()?;
        }
        std::fs::rename(&tmp, &self.path)?;

        log::info!("credential: stored (len={})", value.len());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryCredentialStore
// ---------------------------------------------------------------------------

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    value: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store.
    pub fn with(value: &str) -> Self {
        Self {
            value: Mutex::new(Some(value.to_string())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<String> {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|s| !s.is_empty())
    }

    fn set(&self, value: &str) -> Result<(), CredentialError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in_temp() -> (FileCredentialStore, tempfile::TempDir) {
        let dir = tempdir().expect("temp dir");
        let store = FileCredentialStore::at(dir.path().join("writeRight-config.json"));
        (store, dir)
    }

    #[test]
    fn missing_file_reads_as_absent() {
        let (store, _dir) = store_in_temp();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn set_then_get() {
        let (store, _dir) = store_in_temp();
        store.set("AIza-first").expect("set");
        assert_eq!(store.get().as_deref(), Some("AIza-first"));
    }

    #[test]
    fn set_overwrites_previous_value() {
        let (store, _dir) = store_in_temp();
        store.set("AIza-first").expect("set");
        store.set("AIza-second").expect("set");
        assert_eq!(store.get().as_deref(), Some("AIza-second"));
    }

    #[test]
    fn value_survives_a_new_handle() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("writeRight-config.json");

        FileCredentialStore::at(&path).set("AIza-durable").expect("set");

        let reopened = FileCredentialStore::at(&path);
        assert_eq!(reopened.get().as_deref(), Some("AIza-durable"));
    }

    #[test]
    fn record_uses_the_fixed_key() {
        let (store, _dir) = store_in_temp();
        store.set("AIza-k").expect("set");

        let raw = std::fs::read_to_string(store.path()).expect("read");
        let json: Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(json[CREDENTIAL_KEY], "AIza-k");
    }

    #[test]
    fn foreign_keys_are_preserved() {
        let (store, _dir) = store_in_temp();
        std::fs::write(store.path(), r#"{"windowBounds": {"w": 500}}"#).expect("write");

        store.set("AIza-k").expect("set");

        let raw = std::fs::read_to_string(store.path()).expect("read");
        let json: Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(json["windowBounds"]["w"], 500);
        assert_eq!(json[CREDENTIAL_KEY], "AIza-k");
    }

    #[test]
    fn corrupt_file_reads_as_absent_and_is_repaired_on_set() {
        let (store, _dir) = store_in_temp();
        std::fs::write(store.path(), "{not json").expect("write");
        assert_eq!(store.get(), None);

        store.set("AIza-fixed").expect("set");
        assert_eq!(store.get().as_deref(), Some("AIza-fixed"));
    }

    #[test]
    fn empty_value_reads_as_absent() {
        let (store, _dir) = store_in_temp();
        store.set("").expect("set");
        assert_eq!(store.get(), None);
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get(), None);
        store.set("k").unwrap();
        assert_eq!(store.get().as_deref(), Some("k"));
        assert_eq!(MemoryCredentialStore::with("x").get().as_deref(), Some("x"));
    }

    #[test]
    fn store_is_object_safe() {
        let _: Box<dyn CredentialStore> = Box::new(MemoryCredentialStore::new());
    }
}
