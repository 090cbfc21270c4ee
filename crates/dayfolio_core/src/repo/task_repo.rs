//! Task repository over the `tasks` table.
//!
//! Subtasks are stored as one JSON array in `subtasks_json`; an empty list is
//! written as `NULL`.

use super::{
    bool_to_int, decode_json, delete_row, encode_json, id_param, int_to_bool, EntityRepository,
    RepoError, RepoResult,
};
use crate::model::task::{Priority, Subtask, Task};
use crate::model::{Entity, EntityId, EntityKind};
use rusqlite::{params, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    category,
    priority,
    due_date,
    is_completed,
    subtasks_json,
    is_example
FROM tasks";

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntityRepository<Task> for SqliteTaskRepository<'_> {
    fn insert(&self, task: &Task) -> RepoResult<EntityId> {
        task.validate()?;
        let subtasks = encode_subtasks(&task.subtasks)?;

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                title,
                description,
                category,
                priority,
                due_date,
                is_completed,
                subtasks_json,
                is_example
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                id_param(task.id),
                task.title.as_str(),
                task.description.as_deref(),
                task.category.as_str(),
                task.priority.as_str(),
                task.due_date.as_deref(),
                bool_to_int(task.is_completed),
                subtasks,
                bool_to_int(task.is_example),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;
        let subtasks = encode_subtasks(&task.subtasks)?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                category = ?3,
                priority = ?4,
                due_date = ?5,
                is_completed = ?6,
                subtasks_json = ?7,
                is_example = ?8
             WHERE id = ?9;",
            params![
                task.title.as_str(),
                task.description.as_deref(),
                task.category.as_str(),
                task.priority.as_str(),
                task.due_date.as_deref(),
                bool_to_int(task.is_completed),
                subtasks,
                bool_to_int(task.is_example),
                task.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Task, task.id));
        }
        Ok(())
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<()> {
        delete_row(self.conn, EntityKind::Task, id)
    }

    fn get_all(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }
}

fn encode_subtasks(subtasks: &[Subtask]) -> RepoResult<Option<String>> {
    if subtasks.is_empty() {
        return Ok(None);
    }
    encode_json(subtasks).map(Some)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let priority_text: String = row.get("priority")?;
    let priority = Priority::parse(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid priority `{priority_text}` in tasks.priority"))
    })?;

    let subtasks = match row.get::<_, Option<String>>("subtasks_json")? {
        Some(text) => decode_json(&text, "tasks.subtasks_json")?,
        None => Vec::new(),
    };

    let task = Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        category: row.get("category")?,
        priority,
        due_date: row.get("due_date")?,
        is_completed: int_to_bool(row.get("is_completed")?, "tasks.is_completed")?,
        subtasks,
        is_example: int_to_bool(row.get("is_example")?, "tasks.is_example")?,
    };
    task.validate()?;
    Ok(task)
}
