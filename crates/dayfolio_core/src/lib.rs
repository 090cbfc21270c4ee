//! Core data layer for Dayfolio.
//! This crate is the single source of truth for business invariants.

pub mod data;
pub mod db;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod repo;
pub mod seed;

pub use data::{
    DataError, DataEvent, DataManager, DataManagerConfig, DataResult, DataSummary,
    DEFAULT_AUTOSAVE_INTERVAL, MIN_AUTOSAVE_INTERVAL,
};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::book::{Book, BookStatus};
pub use model::project::{Project, TodoItem};
pub use model::task::{Priority, Subtask, Task};
pub use model::writing::{Attachment, ChecklistItem, WritingEntry, WritingType};
pub use model::{Entity, EntityId, EntityKind, ValidationError, UNSAVED_ID};
pub use prefs::{PreferenceStore, PrefsError, KEY_IS_FIRST_LAUNCH};
pub use repo::book_repo::SqliteBookRepository;
pub use repo::project_repo::SqliteProjectRepository;
pub use repo::task_repo::SqliteTaskRepository;
pub use repo::writing_repo::SqliteWritingRepository;
pub use repo::{EntityRepository, RepoError, RepoResult};
pub use seed::ExampleData;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
