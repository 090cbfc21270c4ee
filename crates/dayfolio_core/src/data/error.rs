use crate::db::DbError;
use crate::model::{EntityKind, ValidationError};
use crate::prefs::PrefsError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type DataResult<T> = Result<T, DataError>;

/// Failure surfaced by `DataManager` operations.
#[derive(Debug)]
pub enum DataError {
    /// Manager runs on in-memory defaults; nothing can be persisted.
    StorageUnavailable,
    /// Data directory could not be created.
    DataDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Relational store could not be opened or migrated.
    Db(DbError),
    /// Relational read/write failed.
    Repo(RepoError),
    /// Key-value store could not be opened or committed.
    Prefs(PrefsError),
    /// Collection mirror could not be encoded or decoded.
    Snapshot {
        kind: EntityKind,
        source: serde_json::Error,
    },
    /// Collection mirror decoded but holds an entity that fails validation.
    InvalidSnapshot {
        kind: EntityKind,
        source: ValidationError,
    },
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable => write!(f, "storage unavailable; running on in-memory data"),
            Self::DataDir { path, source } => write!(
                f,
                "failed to create data directory `{}`: {source}",
                path.display()
            ),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Prefs(err) => write!(f, "{err}"),
            Self::Snapshot { kind, source } => {
                write!(f, "invalid {kind} snapshot in key-value store: {source}")
            }
            Self::InvalidSnapshot { kind, source } => {
                write!(f, "rejected {kind} snapshot in key-value store: {source}")
            }
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable => None,
            Self::DataDir { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Prefs(err) => Some(err),
            Self::Snapshot { source, .. } => Some(source),
            Self::InvalidSnapshot { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for DataError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for DataError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for DataError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

impl From<PrefsError> for DataError {
    fn from(value: PrefsError) -> Self {
        Self::Prefs(value)
    }
}
