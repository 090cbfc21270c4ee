//! Domain model for the four productivity collections.
//!
//! # Responsibility
//! - Define the canonical records shared by storage, cache and UI callers.
//! - Provide validation and small projection helpers per entity type.
//!
//! # Invariants
//! - Every entity is identified by an `EntityId`; `0` means "not persisted yet".
//! - `is_example` marks seed data that may be purged without touching user data.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod book;
pub mod project;
pub mod task;
pub mod writing;

/// Integer identity assigned by the relational store (or by the caller).
pub type EntityId = i64;

/// Placeholder identity for entities that were never persisted.
pub const UNSAVED_ID: EntityId = 0;

/// The four entity collections managed by core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Task,
    Project,
    WritingEntry,
    Book,
}

impl EntityKind {
    /// All kinds in load/flush order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::WritingEntry,
        EntityKind::Book,
        EntityKind::Task,
        EntityKind::Project,
    ];

    /// Key-value store key holding the JSON mirror of this collection.
    pub fn prefs_key(self) -> &'static str {
        match self {
            Self::Task => "tasks",
            Self::Project => "projects",
            Self::WritingEntry => "writing_entries",
            Self::Book => "books",
        }
    }

    /// Relational table backing this collection.
    pub fn table(self) -> &'static str {
        match self {
            Self::Task => "tasks",
            Self::Project => "projects",
            Self::WritingEntry => "writing_entries",
            Self::Book => "books",
        }
    }

    /// Stable label used in log events.
    pub fn label(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Project => "project",
            Self::WritingEntry => "writing_entry",
            Self::Book => "book",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation failure for a domain record about to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty after trimming.
    EmptyTitle(EntityKind),
    /// `pages_read` exceeds `total_pages`.
    PagesReadExceedTotal { pages_read: u32, total_pages: u32 },
    /// Rating outside `1..=5`.
    RatingOutOfRange(u8),
    /// Negative identity.
    NegativeId(EntityId),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle(kind) => write!(f, "{kind} title must not be empty"),
            Self::PagesReadExceedTotal {
                pages_read,
                total_pages,
            } => write!(
                f,
                "pages_read ({pages_read}) must not exceed total_pages ({total_pages})"
            ),
            Self::RatingOutOfRange(value) => write!(f, "rating must be within 1..=5, got {value}"),
            Self::NegativeId(id) => write!(f, "entity id must not be negative, got {id}"),
        }
    }
}

impl Error for ValidationError {}

/// Common surface of every cached/persisted entity.
pub trait Entity: Clone + Serialize + for<'de> Deserialize<'de> {
    const KIND: EntityKind;

    fn id(&self) -> EntityId;
    fn set_id(&mut self, id: EntityId);
    fn is_example(&self) -> bool;
    fn set_example(&mut self, is_example: bool);
    fn validate(&self) -> Result<(), ValidationError>;
}

pub(crate) fn validate_common(
    kind: EntityKind,
    id: EntityId,
    title: &str,
) -> Result<(), ValidationError> {
    if id < 0 {
        return Err(ValidationError::NegativeId(id));
    }
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle(kind));
    }
    Ok(())
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
