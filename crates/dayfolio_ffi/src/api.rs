//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the process-wide `DataManager` to Dart via FRB.
//! - Flatten core types into plain DTOs and action envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - The manager is created once per process; later calls reuse it.
//! - Failures are reported in the envelope, never thrown.

use dayfolio_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    DataManager, DataManagerConfig, DataSummary, Priority, Task,
};
use log::info;
use once_cell::sync::OnceCell;
use std::path::PathBuf;

const DATA_DIR_ENV: &str = "DAYFOLIO_DATA_DIR";
const DEFAULT_DATA_DIR_NAME: &str = "dayfolio";
static MANAGER: OnceCell<DataManager> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Task row rendered by list screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    /// `LOW|MEDIUM|HIGH|URGENT`.
    pub priority: String,
    /// ISO-8601 local date-time.
    pub due_date: Option<String>,
    pub is_completed: bool,
    pub subtask_count: u32,
    pub is_example: bool,
}

/// Dashboard counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResponse {
    pub tasks: u32,
    pub open_tasks: u32,
    pub projects: u32,
    pub writing_entries: u32,
    pub books: u32,
    pub books_reading: u32,
    pub example_entities: u32,
    pub save_pulse: u64,
    /// `true` when persistence failed at startup and data lives in memory only.
    pub degraded: bool,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected entity id, when the action targets one.
    pub id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<i64>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Opens the stores under `DAYFOLIO_DATA_DIR` (or a temp directory) and
/// loads persisted data.
///
/// # FFI contract
/// - Sync call; performs file-system and DB work on first call only.
/// - Degraded startup still reports `ok=true` with a diagnostic message.
#[flutter_rust_bridge::frb(sync)]
pub fn app_initialize() -> ActionResponse {
    let manager = manager();
    if manager.is_degraded() {
        ActionResponse::success("Storage unavailable; running on example data.", None)
    } else {
        ActionResponse::success("Data loaded.", None)
    }
}

/// Lists cached tasks ordered by id.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list() -> Vec<TaskItem> {
    manager().tasks().into_iter().map(to_task_item).collect()
}

/// Creates a task.
///
/// `priority` is case-insensitive; unknown values are rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(
    title: String,
    category: String,
    priority: String,
    due_date: Option<String>,
) -> ActionResponse {
    let Some(priority) = Priority::parse(&priority) else {
        return ActionResponse::failure(format!("task_add failed: unknown priority `{priority}`"));
    };
    let mut task = Task::new(title.trim())
        .with_category(category.trim())
        .with_priority(priority);
    task.due_date = due_date.filter(|value| !value.trim().is_empty());

    match manager().add_task(&task) {
        Ok(id) => ActionResponse::success("Task created.", Some(id)),
        Err(err) => ActionResponse::failure(format!("task_add failed: {err}")),
    }
}

/// Flips completion of one task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: i64) -> ActionResponse {
    match manager().toggle_task_completion(id) {
        Ok(Some(task)) if task.is_completed => {
            ActionResponse::success("Task completed.", Some(id))
        }
        Ok(Some(_)) => ActionResponse::success("Task reopened.", Some(id)),
        Ok(None) => ActionResponse::failure(format!("task_toggle failed: task not found: {id}")),
        Err(err) => ActionResponse::failure(format!("task_toggle failed: {err}")),
    }
}

/// Deletes one task; deleting a missing id succeeds.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: i64) -> ActionResponse {
    match manager().delete_task(id) {
        Ok(()) => ActionResponse::success("Task deleted.", Some(id)),
        Err(err) => ActionResponse::failure(format!("task_delete failed: {err}")),
    }
}

/// Inserts a fresh copy of the example data.
#[flutter_rust_bridge::frb(sync)]
pub fn examples_load() -> ActionResponse {
    match manager().load_example_data() {
        Ok(added) => ActionResponse::success(format!("Loaded {added} example item(s)."), None),
        Err(err) => ActionResponse::failure(format!("examples_load failed: {err}")),
    }
}

/// Removes example data, keeping user-created entities.
#[flutter_rust_bridge::frb(sync)]
pub fn examples_clear() -> ActionResponse {
    match manager().clear_example_data() {
        Ok(0) => ActionResponse::success("No example data to remove.", None),
        Ok(removed) => ActionResponse::success(format!("Removed {removed} example item(s)."), None),
        Err(err) => ActionResponse::failure(format!("examples_clear failed: {err}")),
    }
}

/// Deletes every entity from both stores.
#[flutter_rust_bridge::frb(sync)]
pub fn data_clear_all() -> ActionResponse {
    match manager().clear_all_data() {
        Ok(()) => ActionResponse::success("All data cleared.", None),
        Err(err) => ActionResponse::failure(format!("data_clear_all failed: {err}")),
    }
}

/// Reloads every collection from storage.
#[flutter_rust_bridge::frb(sync)]
pub fn history_load() -> ActionResponse {
    match manager().load_history() {
        Ok(true) => ActionResponse::success("History loaded.", None),
        Ok(false) => ActionResponse::success("No saved data.", None),
        Err(err) => ActionResponse::failure(format!("history_load failed: {err}")),
    }
}

/// Writes the whole cache to the key-value store now.
#[flutter_rust_bridge::frb(sync)]
pub fn data_flush() -> ActionResponse {
    match manager().flush() {
        Ok(pulse) => ActionResponse::success(format!("Saved (pulse {pulse})."), None),
        Err(err) => ActionResponse::failure(format!("data_flush failed: {err}")),
    }
}

/// Monotonic counter of confirmed saves; UI polls it to show "saved" state.
#[flutter_rust_bridge::frb(sync)]
pub fn data_save_pulse() -> u64 {
    manager().save_pulse()
}

#[flutter_rust_bridge::frb(sync)]
pub fn data_summary() -> SummaryResponse {
    to_summary_response(manager().summary())
}

fn manager() -> &'static DataManager {
    MANAGER.get_or_init(|| {
        let dir = resolve_data_dir();
        info!(
            "event=ffi_init module=ffi status=start data_dir={}",
            dir.display()
        );
        DataManager::initialize(DataManagerConfig::for_data_dir(dir))
    })
}

fn resolve_data_dir() -> PathBuf {
    if let Ok(raw) = std::env::var(DATA_DIR_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DEFAULT_DATA_DIR_NAME)
}

fn to_task_item(task: Task) -> TaskItem {
    TaskItem {
        id: task.id,
        subtask_count: u32::try_from(task.subtasks.len()).unwrap_or(u32::MAX),
        priority: task.priority.as_str().to_string(),
        title: task.title,
        description: task.description,
        category: task.category,
        due_date: task.due_date,
        is_completed: task.is_completed,
        is_example: task.is_example,
    }
}

fn to_summary_response(summary: DataSummary) -> SummaryResponse {
    let count = |value: usize| u32::try_from(value).unwrap_or(u32::MAX);
    SummaryResponse {
        tasks: count(summary.tasks),
        open_tasks: count(summary.open_tasks),
        projects: count(summary.projects),
        writing_entries: count(summary.writing_entries),
        books: count(summary.books),
        books_reading: count(summary.books_reading),
        example_entities: count(summary.example_entities),
        save_pulse: summary.save_pulse,
        degraded: summary.degraded,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        app_initialize, core_version, data_flush, data_save_pulse, data_summary, examples_clear,
        examples_load, init_logging, ping, task_add, task_delete, task_list, task_toggle,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn app_initialize_is_repeatable() {
        assert!(app_initialize().ok);
        assert!(app_initialize().ok);
    }

    #[test]
    fn task_add_toggle_delete_flow() {
        let title = unique_token("ffi-task");
        let created = task_add(title.clone(), "Work".to_string(), "high".to_string(), None);
        assert!(created.ok, "{}", created.message);
        let id = created.id.expect("task add should return id");

        let listed = task_list();
        let item = listed.iter().find(|item| item.id == id).expect("listed");
        assert_eq!(item.title, title);
        assert_eq!(item.priority, "HIGH");
        assert!(!item.is_example);

        let toggled = task_toggle(id);
        assert!(toggled.ok, "{}", toggled.message);
        assert_eq!(toggled.message, "Task completed.");

        assert!(task_delete(id).ok);
        assert!(task_list().iter().all(|item| item.id != id));
        assert!(!task_toggle(id).ok);
    }

    #[test]
    fn task_add_rejects_unknown_priority_and_blank_title() {
        let bad_priority = task_add("x".to_string(), String::new(), "someday".to_string(), None);
        assert!(!bad_priority.ok);
        assert!(bad_priority.message.contains("unknown priority"));

        let blank = task_add("   ".to_string(), String::new(), "low".to_string(), None);
        assert!(!blank.ok);
    }

    #[test]
    fn examples_load_then_clear_leaves_no_examples() {
        assert!(examples_load().ok);
        assert!(data_summary().example_entities > 0);
        assert!(examples_clear().ok);
        assert_eq!(data_summary().example_entities, 0);
    }

    #[test]
    fn flush_advances_save_pulse() {
        let before = data_save_pulse();
        assert!(data_flush().ok);
        assert!(data_save_pulse() > before);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
