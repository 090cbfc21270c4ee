//! Key-value preference store.
//!
//! # Responsibility
//! - Hold flat string/bool preferences and JSON collection mirrors.
//! - Persist the whole map as one JSON document with atomic replace.
//!
//! # Invariants
//! - A failed commit leaves both the in-memory map and the file unchanged.
//! - A missing file is an empty store; a corrupt file is logged and treated
//!   as empty so startup never fails on a stale mirror.

use log::{error, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Boolean key gating first-launch seeding.
pub const KEY_IS_FIRST_LAUNCH: &str = "is_first_launch";

pub type PrefsResult<T> = Result<T, PrefsError>;

#[derive(Debug)]
pub enum PrefsError {
    Io { path: PathBuf, source: std::io::Error },
    Encode(serde_json::Error),
}

impl Display for PrefsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "preference store io failed at `{}`: {source}", path.display())
            }
            Self::Encode(err) => write!(f, "failed to encode preferences: {err}"),
        }
    }
}

impl Error for PrefsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

/// Flat preference map, optionally file-backed.
#[derive(Debug, Default)]
pub struct PreferenceStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, Value>,
}

impl PreferenceStore {
    /// Opens a file-backed store, creating nothing until the first commit.
    pub fn open(path: impl Into<PathBuf>) -> PrefsResult<Self> {
        let path = path.into();
        let values = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, Value>>(&bytes) {
                Ok(values) => values,
                Err(err) => {
                    warn!(
                        "event=prefs_open module=prefs status=degraded error_code=prefs_corrupt error={}",
                        err
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(PrefsError::Io { path, source }),
        };

        Ok(Self {
            path: Some(path),
            values,
        })
    }

    /// Memory-only store; commits never touch disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    /// Starts a batch of writes applied together by `commit`.
    pub fn edit(&mut self) -> PrefsEditor<'_> {
        PrefsEditor {
            store: self,
            pending: Vec::new(),
        }
    }

    fn apply(&mut self, pending: Vec<(String, Option<Value>)>) -> PrefsResult<()> {
        let mut next = self.values.clone();
        for (key, value) in pending {
            match value {
                Some(value) => {
                    next.insert(key, value);
                }
                None => {
                    next.remove(&key);
                }
            }
        }

        if let Some(path) = self.path.as_deref() {
            let bytes = serde_json::to_vec_pretty(&next).map_err(PrefsError::Encode)?;
            if let Err(err) = write_atomic(path, &bytes) {
                error!(
                    "event=prefs_commit module=prefs status=error error_code=prefs_write_failed error={}",
                    err
                );
                return Err(err);
            }
        }

        self.values = next;
        Ok(())
    }
}

/// Pending preference writes; dropped without `commit` they are discarded.
pub struct PrefsEditor<'a> {
    store: &'a mut PreferenceStore,
    pending: Vec<(String, Option<Value>)>,
}

impl PrefsEditor<'_> {
    pub fn put_string(mut self, key: &str, value: impl Into<String>) -> Self {
        self.pending
            .push((key.to_string(), Some(Value::String(value.into()))));
        self
    }

    pub fn put_bool(mut self, key: &str, value: bool) -> Self {
        self.pending.push((key.to_string(), Some(Value::Bool(value))));
        self
    }

    pub fn remove(mut self, key: &str) -> Self {
        self.pending.push((key.to_string(), None));
        self
    }

    /// Applies all pending writes and persists them in one atomic replace.
    pub fn commit(self) -> PrefsResult<()> {
        self.store.apply(self.pending)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> PrefsResult<()> {
    let io_err = |source| PrefsError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(io_err)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("prefs.json");
    let tmp = parent.join(format!(".{file_name}.tmp.{}", std::process::id()));
    {
        let mut file = std::fs::File::create(&tmp).map_err(io_err)?;
        file.write_all(bytes).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
    }
    std::fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{PreferenceStore, KEY_IS_FIRST_LAUNCH};

    #[test]
    fn missing_file_opens_empty_and_bool_defaults_apply() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(dir.path().join("prefs.json")).unwrap();
        assert!(store.get_bool(KEY_IS_FIRST_LAUNCH, true));
        assert_eq!(store.get_string("tasks"), None);
    }

    #[test]
    fn commit_persists_and_reopen_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut store = PreferenceStore::open(&path).unwrap();
        store
            .edit()
            .put_string("tasks", "[]")
            .put_bool(KEY_IS_FIRST_LAUNCH, false)
            .commit()
            .unwrap();

        let reopened = PreferenceStore::open(&path).unwrap();
        assert_eq!(reopened.get_string("tasks"), Some("[]"));
        assert!(!reopened.get_bool(KEY_IS_FIRST_LAUNCH, true));
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = PreferenceStore::open(&path).unwrap();
        assert!(!store.contains("tasks"));
    }

    #[test]
    fn dropped_editor_discards_pending_writes() {
        let mut store = PreferenceStore::in_memory();
        let _ = store.edit().put_string("books", "[1]");
        assert!(!store.contains("books"));

        store.edit().put_string("books", "[]").commit().unwrap();
        store.edit().remove("books").commit().unwrap();
        assert!(!store.contains("books"));
    }

    #[test]
    fn failed_commit_keeps_previous_values() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("sub");
        let mut store = PreferenceStore::open(parent.join("prefs.json")).unwrap();

        std::fs::write(&parent, b"not a directory").unwrap();
        let result = store.edit().put_string("tasks", "[9]").commit();
        assert!(result.is_err());
        assert!(!store.contains("tasks"));
    }
}
