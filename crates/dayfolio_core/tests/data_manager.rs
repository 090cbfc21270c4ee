use dayfolio_core::{
    Book, BookStatus, DataError, DataEvent, DataManager, DataManagerConfig, EntityKind, Priority,
    Project, RepoError, Task, TodoItem, WritingEntry, WritingType, MIN_AUTOSAVE_INTERVAL,
};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const EXAMPLE_TOTAL: usize = 6 + 3 + 3 + 4;

fn open_manager(dir: &Path) -> DataManager {
    DataManager::try_initialize(DataManagerConfig::for_data_dir(dir)).unwrap()
}

fn count_rows(dir: &Path, table: &str) -> i64 {
    let conn = Connection::open(dir.join("dayfolio.sqlite3")).unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn first_launch_seeds_example_data() {
    let dir = tempfile::tempdir().unwrap();
    let manager = open_manager(dir.path());

    let ids: Vec<i64> = manager.tasks().iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(manager.projects().len(), 3);
    assert_eq!(manager.writing_entries().len(), 3);
    assert_eq!(manager.books().len(), 4);
    assert_eq!(manager.example_ids(EntityKind::Task), vec![1, 2, 3, 4, 5, 6]);
    assert!(!manager.is_first_launch());
    assert!(!manager.is_degraded());
    assert!(manager.is_auto_save_running());
    assert!(manager.save_pulse() >= 1);
    assert_eq!(count_rows(dir.path(), "books"), 4);
}

#[test]
fn add_and_toggle_task_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let manager = open_manager(dir.path());

    let id = manager
        .add_task(&Task::new("X").with_priority(Priority::High))
        .unwrap();
    assert_eq!(id, 7);
    let added = manager.task(id).unwrap();
    assert_eq!(added.title, "X");
    assert_eq!(added.priority, Priority::High);
    assert!(!added.is_completed);
    assert!(!added.is_example);

    let toggled = manager.toggle_task_completion(id).unwrap().unwrap();
    assert!(toggled.is_completed);
    let toggled_back = manager.toggle_task_completion(id).unwrap().unwrap();
    assert!(!toggled_back.is_completed);

    assert!(manager.toggle_task_completion(999).unwrap().is_none());
}

#[test]
fn invalid_entity_is_rejected_and_cache_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let manager = open_manager(dir.path());
    let before = manager.tasks();

    let err = manager.add_task(&Task::new("   ")).unwrap_err();
    assert!(matches!(err, DataError::Repo(RepoError::Validation(_))));
    assert_eq!(manager.tasks(), before);
}

#[test]
fn update_and_delete_reach_relational_store() {
    let dir = tempfile::tempdir().unwrap();
    let manager = open_manager(dir.path());

    let mut book = manager.books()[0].clone();
    book.status = BookStatus::Completed;
    book.pages_read = book.total_pages;
    manager.update_book(&book).unwrap();
    assert_eq!(manager.books()[0], book);

    manager.delete_task(1).unwrap();
    assert!(manager.task(1).is_none());
    assert_eq!(count_rows(dir.path(), "tasks"), 5);

    let missing = Book {
        id: 404,
        ..Book::new("Missing", "Nobody", 1)
    };
    let err = manager.update_book(&missing).unwrap_err();
    assert!(matches!(
        err,
        DataError::Repo(RepoError::NotFound(EntityKind::Book, 404))
    ));
}

#[test]
fn clear_example_data_is_idempotent_and_keeps_user_entities() {
    let dir = tempfile::tempdir().unwrap();
    let manager = open_manager(dir.path());
    let user_id = manager.add_task(&Task::new("mine")).unwrap();

    assert_eq!(manager.clear_example_data().unwrap(), EXAMPLE_TOTAL);
    assert_eq!(manager.clear_example_data().unwrap(), 0);

    let ids: Vec<i64> = manager.tasks().iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![user_id]);
    assert!(manager.projects().is_empty());
    assert_eq!(count_rows(dir.path(), "tasks"), 1);
    assert_eq!(count_rows(dir.path(), "writing_entries"), 0);
}

#[test]
fn load_example_data_then_clear_restores_user_state() {
    let dir = tempfile::tempdir().unwrap();
    let manager = open_manager(dir.path());
    manager.clear_example_data().unwrap();
    let user_id = manager.add_task(&Task::new("mine")).unwrap();

    assert_eq!(manager.load_example_data().unwrap(), EXAMPLE_TOTAL);
    assert_eq!(manager.tasks().len(), 7);
    let examples = manager.example_ids(EntityKind::Task);
    assert_eq!(examples.len(), 6);
    assert!(!examples.contains(&user_id));

    assert_eq!(manager.clear_example_data().unwrap(), EXAMPLE_TOTAL);
    let remaining = manager.tasks();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, user_id);
}

#[test]
fn clear_all_data_empties_every_store() {
    let dir = tempfile::tempdir().unwrap();
    let manager = open_manager(dir.path());
    manager.add_task(&Task::new("mine")).unwrap();

    manager.clear_all_data().unwrap();

    assert!(manager.tasks().is_empty());
    assert!(manager.books().is_empty());
    assert_eq!(manager.summary().example_entities, 0);
    for table in ["tasks", "projects", "writing_entries", "books"] {
        assert_eq!(count_rows(dir.path(), table), 0, "{table} not empty");
    }
    assert!(!manager.load_history().unwrap());
}

#[test]
fn load_history_falls_back_to_mirror_when_table_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let manager = open_manager(dir.path());
    manager.add_task(&Task::new("mine")).unwrap();
    let before = manager.tasks();

    let other = Connection::open(dir.path().join("dayfolio.sqlite3")).unwrap();
    other.execute_batch("DROP TABLE tasks;").unwrap();
    drop(other);

    assert!(manager.load_history().unwrap());
    assert_eq!(manager.tasks(), before);
    assert_eq!(manager.example_ids(EntityKind::Task).len(), 6);
}

#[test]
fn data_survives_restart_without_reseeding() {
    let dir = tempfile::tempdir().unwrap();
    {
        let manager = open_manager(dir.path());
        manager.add_task(&Task::new("persisted")).unwrap();
    }

    let reopened = open_manager(dir.path());
    assert!(!reopened.is_first_launch());
    assert_eq!(reopened.tasks().len(), 7);
    assert!(reopened.tasks().iter().any(|task| task.title == "persisted"));
}

#[test]
fn lost_preferences_do_not_duplicate_seed() {
    let dir = tempfile::tempdir().unwrap();
    drop(open_manager(dir.path()));
    std::fs::remove_file(dir.path().join("dayfolio_prefs.json")).unwrap();

    let reopened = open_manager(dir.path());
    assert_eq!(reopened.tasks().len(), 6);
    assert!(!reopened.is_first_launch());
    assert_eq!(count_rows(dir.path(), "tasks"), 6);
}

#[test]
fn mutations_publish_change_and_save_events() {
    let dir = tempfile::tempdir().unwrap();
    let manager = open_manager(dir.path());
    let events = manager.subscribe();
    let pulse_before = manager.save_pulse();

    manager.add_task(&Task::new("observed")).unwrap();

    assert_eq!(events.try_recv().unwrap(), DataEvent::Changed(EntityKind::Task));
    let pulse = pulse_before + 1;
    assert_eq!(events.try_recv().unwrap(), DataEvent::Saved { pulse });
    assert_eq!(manager.save_pulse(), pulse);

    let flushed = manager.flush().unwrap();
    assert_eq!(flushed, pulse + 1);
}

#[test]
fn auto_save_bumps_pulse_until_stopped() {
    let dir = tempfile::tempdir().unwrap();
    let config =
        DataManagerConfig::for_data_dir(dir.path()).with_autosave_interval(Duration::from_millis(20));
    let manager = DataManager::try_initialize(config).unwrap();
    let start = manager.save_pulse();

    let deadline = Instant::now() + Duration::from_secs(5);
    while manager.save_pulse() <= start && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(manager.save_pulse() > start);

    manager.stop_auto_save();
    assert!(!manager.is_auto_save_running());
    let stopped_at = manager.save_pulse();
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(manager.save_pulse(), stopped_at);

    assert!(manager.start_auto_save());
    assert!(manager.is_auto_save_running());
}

#[test]
fn failed_storage_falls_back_to_in_memory_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, b"file").unwrap();
    let config = DataManagerConfig {
        db_path: Some(blocker.join("dayfolio.sqlite3")),
        prefs_path: Some(dir.path().join("prefs.json")),
        ..DataManagerConfig::default()
    };

    let manager = DataManager::initialize(config);

    assert!(manager.is_degraded());
    assert_eq!(manager.tasks().len(), 6);
    assert!(!manager.is_auto_save_running());
    assert!(!manager.start_auto_save());
    assert!(matches!(
        manager.add_task(&Task::new("lost")).unwrap_err(),
        DataError::StorageUnavailable
    ));
    assert!(matches!(manager.flush().unwrap_err(), DataError::StorageUnavailable));
    assert!(manager.summary().degraded);
}

#[test]
fn in_memory_config_runs_without_files() {
    let manager = DataManager::try_initialize(DataManagerConfig::default()).unwrap();
    assert_eq!(manager.summary().tasks, 6);
    assert_eq!(manager.summary().books_reading, 1);
    assert_eq!(manager.summary().completed_tasks, 1);
}

#[test]
fn add_and_delete_cover_every_collection() {
    let dir = tempfile::tempdir().unwrap();
    let manager = open_manager(dir.path());

    let mut project = Project::new("Garage cleanup", 1_000);
    project.todos = vec![TodoItem::new("sort tools")];
    let project_id = manager.add_project(&project).unwrap();
    project.id = project_id;
    assert!(manager.projects().contains(&project));

    let mut entry = WritingEntry::new(WritingType::Note, "Idea", "short body", 2_000);
    entry.tags = vec!["idea".to_string()];
    let entry_id = manager.add_writing_entry(&entry).unwrap();
    entry.id = entry_id;
    assert!(manager.writing_entries().contains(&entry));

    let mut book = Book::new("Middlemarch", "George Eliot", 880);
    book.status = BookStatus::Reading;
    book.pages_read = 40;
    let book_id = manager.add_book(&book).unwrap();
    book.id = book_id;
    assert!(manager.books().contains(&book));

    entry.mood = Some("curious".to_string());
    manager.update_writing_entry(&entry).unwrap();
    assert!(manager.writing_entries().contains(&entry));

    manager.delete_project(project_id).unwrap();
    manager.delete_writing_entry(entry_id).unwrap();
    manager.delete_book(book_id).unwrap();

    assert!(manager.projects().iter().all(|item| item.id != project_id));
    assert!(manager.writing_entries().iter().all(|item| item.id != entry_id));
    assert!(manager.books().iter().all(|item| item.id != book_id));
    assert_eq!(count_rows(dir.path(), "projects"), 3);
    assert_eq!(count_rows(dir.path(), "writing_entries"), 3);
    assert_eq!(count_rows(dir.path(), "books"), 4);
}

#[test]
fn load_history_restores_every_collection_from_mirror() {
    let dir = tempfile::tempdir().unwrap();
    let manager = open_manager(dir.path());
    manager.add_book(&Book::new("Own copy", "Me", 12)).unwrap();
    let tasks = manager.tasks();
    let projects = manager.projects();
    let entries = manager.writing_entries();
    let books = manager.books();
    let example_books = manager.example_ids(EntityKind::Book);

    let other = Connection::open(dir.path().join("dayfolio.sqlite3")).unwrap();
    other
        .execute_batch(
            "DROP TABLE tasks; DROP TABLE projects; DROP TABLE writing_entries; DROP TABLE books;",
        )
        .unwrap();
    drop(other);

    assert!(manager.load_history().unwrap());
    assert_eq!(manager.tasks(), tasks);
    assert_eq!(manager.projects(), projects);
    assert_eq!(manager.writing_entries(), entries);
    assert_eq!(manager.books(), books);
    assert_eq!(manager.example_ids(EntityKind::Book), example_books);
}

#[test]
fn mirror_with_invalid_entity_is_not_restored() {
    let dir = tempfile::tempdir().unwrap();
    let projects = {
        let manager = open_manager(dir.path());
        manager.projects()
    };

    let prefs_path = dir.path().join("dayfolio_prefs.json");
    let mut prefs: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&prefs_path).unwrap()).unwrap();
    let mut books: serde_json::Value =
        serde_json::from_str(prefs["books"].as_str().unwrap()).unwrap();
    books[0]["rating"] = serde_json::json!(9);
    prefs["books"] = serde_json::Value::String(books.to_string());
    std::fs::write(&prefs_path, serde_json::to_vec(&prefs).unwrap()).unwrap();

    let other = Connection::open(dir.path().join("dayfolio.sqlite3")).unwrap();
    other.execute_batch("DROP TABLE books;").unwrap();
    drop(other);

    let reopened = open_manager(dir.path());
    assert!(reopened.books().is_empty());
    assert_eq!(reopened.projects(), projects);
}

#[test]
fn zero_autosave_interval_is_clamped() {
    let config = DataManagerConfig::default().with_autosave_interval(Duration::ZERO);
    assert_eq!(config.autosave_interval, MIN_AUTOSAVE_INTERVAL);

    let unclamped = DataManagerConfig {
        autosave_interval: Duration::ZERO,
        ..DataManagerConfig::default()
    };
    let manager = DataManager::try_initialize(unclamped).unwrap();
    assert_eq!(manager.autosave_interval(), MIN_AUTOSAVE_INTERVAL);

    let start = manager.save_pulse();
    std::thread::sleep(Duration::from_millis(250));
    assert!(manager.save_pulse() - start <= 3);
}
