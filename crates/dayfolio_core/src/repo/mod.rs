//! Repository layer: one CRUD repository per entity collection.
//!
//! # Responsibility
//! - Define the `EntityRepository` contract used by the data manager.
//! - Isolate SQLite row mapping and JSON-column encoding from callers.
//!
//! # Invariants
//! - Write paths call `Entity::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `get_all` is ordered by `id ASC`.

use crate::db::DbError;
use crate::model::{EntityId, EntityKind, ValidationError};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod book_repo;
pub mod project_repo;
pub mod task_repo;
pub mod writing_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entity persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(EntityKind, EntityId),
    /// Embedded list could not be encoded for storage.
    Encode(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(kind, id) => write!(f, "{kind} not found: {id}"),
            Self::Encode(err) => write!(f, "failed to encode embedded column: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::NotFound(..) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// CRUD contract shared by the four entity repositories.
pub trait EntityRepository<T> {
    /// Inserts one entity. Id `0` lets the store assign one; returns the id.
    fn insert(&self, entity: &T) -> RepoResult<EntityId>;
    /// Replaces every column of an existing row.
    fn update(&self, entity: &T) -> RepoResult<()>;
    /// Deletes one row. Missing rows are not an error.
    fn delete_by_id(&self, id: EntityId) -> RepoResult<()>;
    fn get_all(&self) -> RepoResult<Vec<T>>;
}

/// Deletes one row by id from the table backing `kind`.
pub(crate) fn delete_row(conn: &Connection, kind: EntityKind, id: EntityId) -> RepoResult<()> {
    conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1;", kind.table()),
        [id],
    )?;
    Ok(())
}

/// Maps the placeholder id to `NULL` so SQLite assigns the rowid.
pub(crate) fn id_param(id: EntityId) -> Option<EntityId> {
    if id == 0 {
        None
    } else {
        Some(id)
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn encode_json<T: Serialize + ?Sized>(value: &T) -> RepoResult<String> {
    serde_json::to_string(value).map_err(RepoError::Encode)
}

pub(crate) fn decode_json<T: DeserializeOwned>(text: &str, column: &str) -> RepoResult<T> {
    serde_json::from_str(text)
        .map_err(|err| RepoError::InvalidData(format!("invalid json in {column}: {err}")))
}
