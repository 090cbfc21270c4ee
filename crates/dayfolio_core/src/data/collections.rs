//! In-memory collections and the per-kind plumbing between cache and stores.
//!
//! # Invariants
//! - A refresh replaces a whole collection; it never patches rows in place.
//! - The example-id set of a kind is rebuilt from `is_example` on every
//!   refresh or mirror restore.

use crate::model::book::Book;
use crate::model::project::Project;
use crate::model::task::Task;
use crate::model::writing::WritingEntry;
use crate::model::{Entity, EntityId, EntityKind};
use crate::repo::book_repo::SqliteBookRepository;
use crate::repo::project_repo::SqliteProjectRepository;
use crate::repo::task_repo::SqliteTaskRepository;
use crate::repo::writing_repo::SqliteWritingRepository;
use crate::repo::{EntityRepository, RepoResult};
use rusqlite::Connection;
use std::collections::BTreeSet;

/// The four cached collections plus their example-id sets.
#[derive(Debug, Default, Clone)]
pub(crate) struct Collections {
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub writing_entries: Vec<WritingEntry>,
    pub books: Vec<Book>,
    pub example_tasks: BTreeSet<EntityId>,
    pub example_projects: BTreeSet<EntityId>,
    pub example_writing_entries: BTreeSet<EntityId>,
    pub example_books: BTreeSet<EntityId>,
}

impl Collections {
    pub fn example_ids(&self, kind: EntityKind) -> &BTreeSet<EntityId> {
        match kind {
            EntityKind::Task => &self.example_tasks,
            EntityKind::Project => &self.example_projects,
            EntityKind::WritingEntry => &self.example_writing_entries,
            EntityKind::Book => &self.example_books,
        }
    }

    pub fn ids(&self, kind: EntityKind) -> Vec<EntityId> {
        match kind {
            EntityKind::Task => ids_of(&self.tasks),
            EntityKind::Project => ids_of(&self.projects),
            EntityKind::WritingEntry => ids_of(&self.writing_entries),
            EntityKind::Book => ids_of(&self.books),
        }
    }

    pub fn has_examples(&self) -> bool {
        EntityKind::ALL
            .iter()
            .any(|kind| !self.example_ids(*kind).is_empty())
    }

    /// Replaces one collection and rebuilds its example set.
    pub fn replace<T: Managed>(&mut self, items: Vec<T>) {
        *T::examples_mut(self) = items
            .iter()
            .filter(|item| item.is_example())
            .map(Entity::id)
            .collect();
        *T::items_mut(self) = items;
    }

    /// Drops every item of `T` whose id is in its example set.
    pub fn purge_examples<T: Managed>(&mut self) -> Vec<EntityId> {
        let examples = std::mem::take(T::examples_mut(self));
        T::items_mut(self).retain(|item| !examples.contains(&item.id()));
        examples.into_iter().collect()
    }
}

fn ids_of<T: Entity>(items: &[T]) -> Vec<EntityId> {
    items.iter().map(Entity::id).collect()
}

/// Binds an entity type to its cache slot and repository.
pub(crate) trait Managed: Entity + Send + 'static {
    fn items(cache: &Collections) -> &Vec<Self>;
    fn items_mut(cache: &mut Collections) -> &mut Vec<Self>;
    fn examples_mut(cache: &mut Collections) -> &mut BTreeSet<EntityId>;
    fn repo<'conn>(conn: &'conn Connection) -> Box<dyn EntityRepository<Self> + 'conn>;
}

impl Managed for Task {
    fn items(cache: &Collections) -> &Vec<Self> {
        &cache.tasks
    }

    fn items_mut(cache: &mut Collections) -> &mut Vec<Self> {
        &mut cache.tasks
    }

    fn examples_mut(cache: &mut Collections) -> &mut BTreeSet<EntityId> {
        &mut cache.example_tasks
    }

    fn repo<'conn>(conn: &'conn Connection) -> Box<dyn EntityRepository<Self> + 'conn> {
        Box::new(SqliteTaskRepository::new(conn))
    }
}

impl Managed for Project {
    fn items(cache: &Collections) -> &Vec<Self> {
        &cache.projects
    }

    fn items_mut(cache: &mut Collections) -> &mut Vec<Self> {
        &mut cache.projects
    }

    fn examples_mut(cache: &mut Collections) -> &mut BTreeSet<EntityId> {
        &mut cache.example_projects
    }

    fn repo<'conn>(conn: &'conn Connection) -> Box<dyn EntityRepository<Self> + 'conn> {
        Box::new(SqliteProjectRepository::new(conn))
    }
}

impl Managed for WritingEntry {
    fn items(cache: &Collections) -> &Vec<Self> {
        &cache.writing_entries
    }

    fn items_mut(cache: &mut Collections) -> &mut Vec<Self> {
        &mut cache.writing_entries
    }

    fn examples_mut(cache: &mut Collections) -> &mut BTreeSet<EntityId> {
        &mut cache.example_writing_entries
    }

    fn repo<'conn>(conn: &'conn Connection) -> Box<dyn EntityRepository<Self> + 'conn> {
        Box::new(SqliteWritingRepository::new(conn))
    }
}

impl Managed for Book {
    fn items(cache: &Collections) -> &Vec<Self> {
        &cache.books
    }

    fn items_mut(cache: &mut Collections) -> &mut Vec<Self> {
        &mut cache.books
    }

    fn examples_mut(cache: &mut Collections) -> &mut BTreeSet<EntityId> {
        &mut cache.example_books
    }

    fn repo<'conn>(conn: &'conn Connection) -> Box<dyn EntityRepository<Self> + 'conn> {
        Box::new(SqliteBookRepository::new(conn))
    }
}

/// Inserts every item through the repository of `T`.
pub(crate) fn insert_all<T: Managed>(conn: &Connection, items: &[T]) -> RepoResult<()> {
    let repo = T::repo(conn);
    for item in items {
        repo.insert(item)?;
    }
    Ok(())
}

/// Deletes every id through the repository of `T`.
pub(crate) fn delete_all<T: Managed>(conn: &Connection, ids: &[EntityId]) -> RepoResult<()> {
    let repo = T::repo(conn);
    for id in ids {
        repo.delete_by_id(*id)?;
    }
    Ok(())
}

/// Re-reads one whole collection from the relational store into the cache.
pub(crate) fn refresh<T: Managed>(conn: &Connection, cache: &mut Collections) -> RepoResult<usize> {
    let items = T::repo(conn).get_all()?;
    let count = items.len();
    cache.replace(items);
    Ok(count)
}
