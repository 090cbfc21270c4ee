//! Dual-store cache synchronizer for the four productivity collections.
//!
//! # Responsibility
//! - Own the in-memory collections the UI renders from.
//! - Route every mutation through the relational store, refresh the cache from
//!   it, then mirror the cache into the key-value store.
//! - Seed example data on first launch and flush periodically.
//!
//! # Invariants
//! - The relational store is authoritative; the key-value mirror is only a
//!   cold-start hint and is read solely when a relational refresh fails.
//! - All state sits behind one mutex, so mutations are serialized: the cache
//!   after a call reflects every write that completed before it.
//! - The save pulse increases only after a confirmed key-value commit.

mod autosave;
mod collections;
mod error;
mod events;

pub use error::{DataError, DataResult};
pub use events::DataEvent;

use crate::db::{open_db, open_db_in_memory};
use crate::model::book::{Book, BookStatus};
use crate::model::project::Project;
use crate::model::task::Task;
use crate::model::writing::WritingEntry;
use crate::model::{now_epoch_ms, EntityId, EntityKind};
use crate::prefs::{PreferenceStore, KEY_IS_FIRST_LAUNCH};
use crate::repo::{EntityRepository, RepoResult};
use crate::seed::ExampleData;
use autosave::AutoSaveHandle;
use collections::{delete_all, insert_all, refresh, Collections, Managed};
use events::Subscribers;
use log::{error, info, warn};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Default period between automatic full flushes.
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Shortest accepted auto-save period; smaller values are clamped up.
pub const MIN_AUTOSAVE_INTERVAL: Duration = Duration::from_millis(100);

const DB_FILE_NAME: &str = "dayfolio.sqlite3";
const PREFS_FILE_NAME: &str = "dayfolio_prefs.json";

/// Storage locations and timing for a `DataManager`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataManagerConfig {
    /// SQLite file; `None` opens an in-memory database.
    pub db_path: Option<PathBuf>,
    /// Preference JSON file; `None` keeps preferences in memory.
    pub prefs_path: Option<PathBuf>,
    pub autosave_interval: Duration,
}

impl Default for DataManagerConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            prefs_path: None,
            autosave_interval: DEFAULT_AUTOSAVE_INTERVAL,
        }
    }
}

impl DataManagerConfig {
    /// File-backed stores inside `dir`.
    pub fn for_data_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            db_path: Some(dir.join(DB_FILE_NAME)),
            prefs_path: Some(dir.join(PREFS_FILE_NAME)),
            autosave_interval: DEFAULT_AUTOSAVE_INTERVAL,
        }
    }

    /// Sets the auto-save period, clamped to `MIN_AUTOSAVE_INTERVAL`.
    pub fn with_autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval = interval.max(MIN_AUTOSAVE_INTERVAL);
        self
    }
}

/// Counts shown on dashboards and by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataSummary {
    pub tasks: usize,
    pub open_tasks: usize,
    pub completed_tasks: usize,
    pub projects: usize,
    pub writing_entries: usize,
    pub books: usize,
    pub books_reading: usize,
    pub example_entities: usize,
    pub save_pulse: u64,
    pub degraded: bool,
}

struct Storage {
    conn: Connection,
    prefs: PreferenceStore,
}

struct State {
    /// `None` when initialization failed and the manager runs on defaults.
    storage: Option<Storage>,
    cache: Collections,
}

pub(crate) struct Shared {
    state: Mutex<State>,
    save_pulse: AtomicU64,
    subscribers: Subscribers,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        // Poisoned state is at worst stale; the next refresh repairs it.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish_changed(&self, kinds: &[EntityKind]) {
        for kind in kinds {
            self.subscribers.publish(DataEvent::Changed(*kind));
        }
    }

    fn bump_pulse(&self) -> u64 {
        let pulse = self.save_pulse.fetch_add(1, Ordering::SeqCst) + 1;
        self.subscribers.publish(DataEvent::Saved { pulse });
        pulse
    }

    /// Mirrors `kinds` into the key-value store in one commit.
    ///
    /// Failures are logged and returned; the cache is left untouched.
    fn mirror(&self, state: &mut State, kinds: &[EntityKind]) -> DataResult<u64> {
        let storage = state.storage.as_mut().ok_or(DataError::StorageUnavailable)?;
        let mut editor = storage.prefs.edit();
        for kind in kinds {
            let json = match kind {
                EntityKind::Task => snapshot::<Task>(&state.cache),
                EntityKind::Project => snapshot::<Project>(&state.cache),
                EntityKind::WritingEntry => snapshot::<WritingEntry>(&state.cache),
                EntityKind::Book => snapshot::<Book>(&state.cache),
            }?;
            editor = editor.put_string(kind.prefs_key(), json);
        }

        if let Err(err) = editor.commit() {
            warn!(
                "event=mirror module=data status=error error_code=prefs_commit_failed error={}",
                err
            );
            return Err(err.into());
        }
        Ok(self.bump_pulse())
    }

    /// Writes the whole cache to the key-value store.
    pub(crate) fn flush(&self) -> DataResult<u64> {
        let started_at = Instant::now();
        let mut state = self.lock();
        let pulse = self.mirror(&mut state, &EntityKind::ALL)?;
        info!(
            "event=flush module=data status=ok pulse={} duration_ms={}",
            pulse,
            started_at.elapsed().as_millis()
        );
        Ok(pulse)
    }
}

/// Single source of truth for tasks, projects, writing entries and books.
///
/// Cloning is not supported; share it behind an `Arc`. Dropping the manager
/// stops the auto-save worker.
pub struct DataManager {
    shared: Arc<Shared>,
    autosave: Mutex<Option<AutoSaveHandle>>,
    autosave_interval: Duration,
}

impl DataManager {
    /// Opens both stores, loads persisted data and starts auto-save.
    ///
    /// Any failure is logged and the manager falls back to in-memory example
    /// data with persistence disabled (`is_degraded() == true`).
    pub fn initialize(config: DataManagerConfig) -> Self {
        let interval = config.autosave_interval.max(MIN_AUTOSAVE_INTERVAL);
        match Self::try_initialize(config) {
            Ok(manager) => manager,
            Err(err) => {
                error!(
                    "event=data_init module=data status=degraded error_code=init_failed error={}",
                    err
                );
                Self::in_memory_defaults(interval)
            }
        }
    }

    /// Strict variant of `initialize` that reports the failure instead.
    pub fn try_initialize(config: DataManagerConfig) -> DataResult<Self> {
        let started_at = Instant::now();
        info!("event=data_init module=data status=start");

        let prefs = match config.prefs_path.as_deref() {
            Some(path) => PreferenceStore::open(path)?,
            None => PreferenceStore::in_memory(),
        };
        let conn = match config.db_path.as_deref() {
            Some(path) => {
                ensure_parent_dir(path)?;
                open_db(path)?
            }
            None => open_db_in_memory()?,
        };

        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                storage: Some(Storage { conn, prefs }),
                cache: Collections::default(),
            }),
            save_pulse: AtomicU64::new(0),
            subscribers: Subscribers::default(),
        });
        {
            let mut state = shared.lock();
            load_persisted_data(&shared, &mut state)?;
        }

        let manager = Self {
            shared,
            autosave: Mutex::new(None),
            autosave_interval: config.autosave_interval.max(MIN_AUTOSAVE_INTERVAL),
        };
        manager.start_auto_save();

        info!(
            "event=data_init module=data status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(manager)
    }

    fn in_memory_defaults(interval: Duration) -> Self {
        let seed = ExampleData::build(now_epoch_ms());
        let mut cache = Collections::default();
        cache.replace(seed.tasks);
        cache.replace(seed.projects);
        cache.replace(seed.writing_entries);
        cache.replace(seed.books);

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    storage: None,
                    cache,
                }),
                save_pulse: AtomicU64::new(0),
                subscribers: Subscribers::default(),
            }),
            autosave: Mutex::new(None),
            autosave_interval: interval,
        }
    }

    /// Whether the manager runs without persistence.
    pub fn is_degraded(&self) -> bool {
        self.shared.lock().storage.is_none()
    }

    /// Starts the periodic flush worker if it is not running already.
    ///
    /// Returns `false` when the manager is degraded or the worker cannot be
    /// spawned.
    pub fn start_auto_save(&self) -> bool {
        if self.is_degraded() {
            return false;
        }
        let mut slot = self
            .autosave
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.is_some() {
            return true;
        }
        match AutoSaveHandle::spawn(Arc::downgrade(&self.shared), self.autosave_interval) {
            Ok(handle) => {
                *slot = Some(handle);
                true
            }
            Err(err) => {
                warn!(
                    "event=autosave_start module=data status=error error_code=spawn_failed error={}",
                    err
                );
                false
            }
        }
    }

    /// Cancels the periodic flush worker and waits for it to exit.
    pub fn stop_auto_save(&self) {
        let handle = self
            .autosave
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.stop();
        }
    }

    /// Effective auto-save period after clamping.
    pub fn autosave_interval(&self) -> Duration {
        self.autosave_interval
    }

    pub fn is_auto_save_running(&self) -> bool {
        self.autosave
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    /// Number of confirmed key-value commits since startup.
    pub fn save_pulse(&self) -> u64 {
        self.shared.save_pulse.load(Ordering::SeqCst)
    }

    /// Receives `DataEvent`s until the receiver is dropped.
    pub fn subscribe(&self) -> Receiver<DataEvent> {
        self.shared.subscribers.subscribe()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.shared.lock().cache.tasks.clone()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.shared.lock().cache.projects.clone()
    }

    pub fn writing_entries(&self) -> Vec<WritingEntry> {
        self.shared.lock().cache.writing_entries.clone()
    }

    pub fn books(&self) -> Vec<Book> {
        self.shared.lock().cache.books.clone()
    }

    pub fn task(&self, id: EntityId) -> Option<Task> {
        self.shared
            .lock()
            .cache
            .tasks
            .iter()
            .find(|task| task.id == id)
            .cloned()
    }

    /// Ids currently tracked as example data for `kind`, ascending.
    pub fn example_ids(&self, kind: EntityKind) -> Vec<EntityId> {
        self.shared
            .lock()
            .cache
            .example_ids(kind)
            .iter()
            .copied()
            .collect()
    }

    /// Reads the first-launch flag from the key-value store.
    ///
    /// Degraded managers report `true`; nothing was ever persisted.
    pub fn is_first_launch(&self) -> bool {
        match self.shared.lock().storage.as_ref() {
            Some(storage) => storage.prefs.get_bool(KEY_IS_FIRST_LAUNCH, true),
            None => true,
        }
    }

    pub fn summary(&self) -> DataSummary {
        let degraded = self.is_degraded();
        let state = self.shared.lock();
        let cache = &state.cache;
        let completed_tasks = cache.tasks.iter().filter(|task| task.is_completed).count();
        DataSummary {
            tasks: cache.tasks.len(),
            open_tasks: cache.tasks.len() - completed_tasks,
            completed_tasks,
            projects: cache.projects.len(),
            writing_entries: cache.writing_entries.len(),
            books: cache.books.len(),
            books_reading: cache
                .books
                .iter()
                .filter(|book| book.status == BookStatus::Reading)
                .count(),
            example_entities: EntityKind::ALL
                .iter()
                .map(|kind| cache.example_ids(*kind).len())
                .sum(),
            save_pulse: self.save_pulse(),
            degraded,
        }
    }

    pub fn add_task(&self, task: &Task) -> DataResult<EntityId> {
        self.insert(task)
    }

    pub fn update_task(&self, task: &Task) -> DataResult<()> {
        self.update(task)
    }

    pub fn delete_task(&self, id: EntityId) -> DataResult<()> {
        self.delete::<Task>(id)
    }

    pub fn add_project(&self, project: &Project) -> DataResult<EntityId> {
        self.insert(project)
    }

    pub fn update_project(&self, project: &Project) -> DataResult<()> {
        self.update(project)
    }

    pub fn delete_project(&self, id: EntityId) -> DataResult<()> {
        self.delete::<Project>(id)
    }

    pub fn add_writing_entry(&self, entry: &WritingEntry) -> DataResult<EntityId> {
        self.insert(entry)
    }

    pub fn update_writing_entry(&self, entry: &WritingEntry) -> DataResult<()> {
        self.update(entry)
    }

    pub fn delete_writing_entry(&self, id: EntityId) -> DataResult<()> {
        self.delete::<WritingEntry>(id)
    }

    pub fn add_book(&self, book: &Book) -> DataResult<EntityId> {
        self.insert(book)
    }

    pub fn update_book(&self, book: &Book) -> DataResult<()> {
        self.update(book)
    }

    pub fn delete_book(&self, id: EntityId) -> DataResult<()> {
        self.delete::<Book>(id)
    }

    /// Flips completion of a cached task and persists it.
    ///
    /// Returns `Ok(None)` when no task with `id` is cached.
    pub fn toggle_task_completion(&self, id: EntityId) -> DataResult<Option<Task>> {
        let mut state = self.shared.lock();
        let Some(current) = state.cache.tasks.iter().find(|task| task.id == id) else {
            return Ok(None);
        };
        let toggled = current.toggled();
        self.mutate_locked::<Task, _, _>(&mut state, "task_toggle", id, |repo| {
            repo.update(&toggled)
        })?;
        Ok(state.cache.tasks.iter().find(|task| task.id == id).cloned())
    }

    /// Writes the whole cache to the key-value store and returns the new pulse.
    pub fn flush(&self) -> DataResult<u64> {
        self.shared.flush()
    }

    /// Removes every entity from the cache, the mirror and the relational store,
    /// in that order.
    pub fn clear_all_data(&self) -> DataResult<()> {
        let started_at = Instant::now();
        let mut state = self.shared.lock();
        if state.storage.is_none() {
            return Err(DataError::StorageUnavailable);
        }

        let task_ids = state.cache.ids(EntityKind::Task);
        let project_ids = state.cache.ids(EntityKind::Project);
        let writing_ids = state.cache.ids(EntityKind::WritingEntry);
        let book_ids = state.cache.ids(EntityKind::Book);

        state.cache = Collections::default();
        self.shared.publish_changed(&EntityKind::ALL);
        // Mirror failure is already logged; relational deletes still run.
        let _ = self.shared.mirror(&mut state, &EntityKind::ALL);

        let result = with_transaction(&mut state, |conn| {
            delete_all::<Task>(conn, &task_ids)?;
            delete_all::<Project>(conn, &project_ids)?;
            delete_all::<WritingEntry>(conn, &writing_ids)?;
            delete_all::<Book>(conn, &book_ids)?;
            Ok(())
        });
        log_outcome("clear_all", &result, started_at);
        result
    }

    /// Removes only entities tracked as example data. Returns how many.
    ///
    /// Calling it again without new example data is a no-op.
    pub fn clear_example_data(&self) -> DataResult<usize> {
        let started_at = Instant::now();
        let mut state = self.shared.lock();
        if state.storage.is_none() {
            return Err(DataError::StorageUnavailable);
        }
        if !state.cache.has_examples() {
            return Ok(0);
        }

        let task_ids = state.cache.purge_examples::<Task>();
        let project_ids = state.cache.purge_examples::<Project>();
        let writing_ids = state.cache.purge_examples::<WritingEntry>();
        let book_ids = state.cache.purge_examples::<Book>();
        let removed = task_ids.len() + project_ids.len() + writing_ids.len() + book_ids.len();

        self.shared.publish_changed(&EntityKind::ALL);
        let _ = self.shared.mirror(&mut state, &EntityKind::ALL);

        let result = with_transaction(&mut state, |conn| {
            delete_all::<Task>(conn, &task_ids)?;
            delete_all::<Project>(conn, &project_ids)?;
            delete_all::<WritingEntry>(conn, &writing_ids)?;
            delete_all::<Book>(conn, &book_ids)?;
            Ok(())
        });
        log_outcome("clear_examples", &result, started_at);
        result.map(|()| removed)
    }

    /// Inserts a fresh copy of the example data with store-assigned ids.
    ///
    /// Returns how many entities were added.
    pub fn load_example_data(&self) -> DataResult<usize> {
        let started_at = Instant::now();
        let mut state = self.shared.lock();
        let data = ExampleData::unsaved(now_epoch_ms());
        let added =
            data.tasks.len() + data.projects.len() + data.writing_entries.len() + data.books.len();

        let result = with_transaction(&mut state, |conn| insert_example_data(conn, &data))
            .and_then(|()| refresh_all(&mut state));
        log_outcome("load_examples", &result, started_at);
        result?;

        self.shared.publish_changed(&EntityKind::ALL);
        let _ = self.shared.mirror(&mut state, &EntityKind::ALL);
        Ok(added)
    }

    /// Reloads every collection: relational store first, key-value mirror as
    /// fallback per kind. Returns whether any collection holds data.
    pub fn load_history(&self) -> DataResult<bool> {
        let mut state = self.shared.lock();
        if state.storage.is_none() {
            return Err(DataError::StorageUnavailable);
        }
        let found = reload_with_fallback(&mut state);
        self.shared.publish_changed(&EntityKind::ALL);
        info!(
            "event=load_history module=data status=ok found={}",
            found
        );
        Ok(found)
    }

    fn insert<T: Managed>(&self, entity: &T) -> DataResult<EntityId> {
        let mut state = self.shared.lock();
        self.mutate_locked::<T, _, _>(&mut state, "add", entity.id(), |repo| repo.insert(entity))
    }

    fn update<T: Managed>(&self, entity: &T) -> DataResult<()> {
        let mut state = self.shared.lock();
        self.mutate_locked::<T, _, _>(&mut state, "update", entity.id(), |repo| repo.update(entity))
    }

    fn delete<T: Managed>(&self, id: EntityId) -> DataResult<()> {
        let mut state = self.shared.lock();
        self.mutate_locked::<T, _, _>(&mut state, "delete", id, |repo| repo.delete_by_id(id))
    }

    /// Write → refresh → mirror, in that order, under the state lock.
    fn mutate_locked<T, R, W>(
        &self,
        state: &mut State,
        action: &'static str,
        id: EntityId,
        write: W,
    ) -> DataResult<R>
    where
        T: Managed,
        W: FnOnce(&dyn EntityRepository<T>) -> RepoResult<R>,
    {
        let started_at = Instant::now();
        let kind = T::KIND;

        let result = (|| -> DataResult<R> {
            let storage = state.storage.as_ref().ok_or(DataError::StorageUnavailable)?;
            let value = write(T::repo(&storage.conn).as_ref())?;
            refresh::<T>(&storage.conn, &mut state.cache)?;
            Ok(value)
        })();

        match &result {
            Ok(_) => info!(
                "event={}_{} module=data status=ok id={} duration_ms={}",
                kind.label(),
                action,
                id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event={}_{} module=data status=error id={} duration_ms={} error={}",
                kind.label(),
                action,
                id,
                started_at.elapsed().as_millis(),
                err
            ),
        }

        let value = result?;
        self.shared.publish_changed(&[kind]);
        // Mirror failure is logged; the next flush repairs it.
        let _ = self.shared.mirror(state, &[kind]);
        Ok(value)
    }
}

impl Drop for DataManager {
    fn drop(&mut self) {
        self.stop_auto_save();
    }
}

fn snapshot<T: Managed>(cache: &Collections) -> DataResult<String> {
    serde_json::to_string(T::items(cache)).map_err(|source| DataError::Snapshot {
        kind: T::KIND,
        source,
    })
}

/// Decodes one collection from its key-value mirror.
///
/// Returns `Ok(false)` when the mirror has no entry for the kind.
fn restore_from_mirror<T: Managed>(state: &mut State) -> DataResult<bool> {
    let storage = state.storage.as_ref().ok_or(DataError::StorageUnavailable)?;
    let Some(json) = storage.prefs.get_string(T::KIND.prefs_key()) else {
        return Ok(false);
    };
    let items: Vec<T> = serde_json::from_str(json).map_err(|source| DataError::Snapshot {
        kind: T::KIND,
        source,
    })?;
    for item in &items {
        item.validate().map_err(|source| DataError::InvalidSnapshot {
            kind: T::KIND,
            source,
        })?;
    }
    state.cache.replace(items);
    Ok(true)
}

/// Relational refresh for one kind, falling back to the mirror on failure.
fn reload_kind<T: Managed>(state: &mut State) -> bool {
    let refreshed = match state.storage.as_ref() {
        Some(storage) => refresh::<T>(&storage.conn, &mut state.cache),
        None => return false,
    };

    if let Err(err) = refreshed {
        warn!(
            "event=reload module=data status=fallback kind={} error={}",
            T::KIND,
            err
        );
        if let Err(err) = restore_from_mirror::<T>(state) {
            error!(
                "event=reload module=data status=error kind={} error={}",
                T::KIND,
                err
            );
        }
    }
    !T::items(&state.cache).is_empty()
}

fn reload_with_fallback(state: &mut State) -> bool {
    let mut found = false;
    for kind in EntityKind::ALL {
        found |= match kind {
            EntityKind::WritingEntry => reload_kind::<WritingEntry>(state),
            EntityKind::Book => reload_kind::<Book>(state),
            EntityKind::Task => reload_kind::<Task>(state),
            EntityKind::Project => reload_kind::<Project>(state),
        };
    }
    found
}

fn refresh_all(state: &mut State) -> DataResult<()> {
    let storage = state.storage.as_ref().ok_or(DataError::StorageUnavailable)?;
    refresh::<Task>(&storage.conn, &mut state.cache)?;
    refresh::<Project>(&storage.conn, &mut state.cache)?;
    refresh::<WritingEntry>(&storage.conn, &mut state.cache)?;
    refresh::<Book>(&storage.conn, &mut state.cache)?;
    Ok(())
}

fn insert_example_data(conn: &Connection, data: &ExampleData) -> RepoResult<()> {
    insert_all(conn, &data.tasks)?;
    insert_all(conn, &data.projects)?;
    insert_all(conn, &data.writing_entries)?;
    insert_all(conn, &data.books)?;
    Ok(())
}

fn with_transaction(
    state: &mut State,
    work: impl FnOnce(&Connection) -> RepoResult<()>,
) -> DataResult<()> {
    let storage = state.storage.as_mut().ok_or(DataError::StorageUnavailable)?;
    let tx = storage.conn.transaction()?;
    work(&tx)?;
    tx.commit()?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> DataResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| DataError::DataDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

fn store_is_empty(conn: &Connection) -> DataResult<bool> {
    for kind in EntityKind::ALL {
        let rows: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {};", kind.table()),
            [],
            |row| row.get(0),
        )?;
        if rows > 0 {
            return Ok(false);
        }
    }
    Ok(true)
}

/// First launch seeds both stores; later launches reload with fallback.
fn load_persisted_data(shared: &Shared, state: &mut State) -> DataResult<()> {
    let storage = state.storage.as_ref().ok_or(DataError::StorageUnavailable)?;
    if !storage.prefs.get_bool(KEY_IS_FIRST_LAUNCH, true) {
        let found = reload_with_fallback(state);
        info!(
            "event=bootstrap module=data status=ok mode=reload found={}",
            found
        );
        return Ok(());
    }

    if store_is_empty(&storage.conn)? {
        let seed = ExampleData::build(now_epoch_ms());
        with_transaction(state, |conn| insert_example_data(conn, &seed))?;
        info!("event=bootstrap module=data status=ok mode=seed");
    } else {
        info!("event=bootstrap module=data status=skipped mode=seed reason=store_not_empty");
    }
    refresh_all(state)?;

    shared.mirror(state, &EntityKind::ALL)?;
    let storage = state.storage.as_mut().ok_or(DataError::StorageUnavailable)?;
    storage
        .prefs
        .edit()
        .put_bool(KEY_IS_FIRST_LAUNCH, false)
        .commit()?;
    Ok(())
}

fn log_outcome(event: &str, result: &DataResult<()>, started_at: Instant) {
    match result {
        Ok(()) => info!(
            "event={} module=data status=ok duration_ms={}",
            event,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event={} module=data status=error duration_ms={} error={}",
            event,
            started_at.elapsed().as_millis(),
            err
        ),
    }
}
