//! Project repository over the `projects` table.

use super::{
    bool_to_int, decode_json, delete_row, encode_json, id_param, int_to_bool, EntityRepository,
    RepoError, RepoResult,
};
use crate::model::project::Project;
use crate::model::{Entity, EntityId, EntityKind};
use rusqlite::{params, Connection, Row};

/// SQLite-backed project repository. Todos live in `todos_json`.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntityRepository<Project> for SqliteProjectRepository<'_> {
    fn insert(&self, project: &Project) -> RepoResult<EntityId> {
        project.validate()?;
        self.conn.execute(
            "INSERT INTO projects (id, title, description, created_at, todos_json, is_example)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                id_param(project.id),
                project.title.as_str(),
                project.description.as_str(),
                project.created_at,
                encode_json(&project.todos)?,
                bool_to_int(project.is_example),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, project: &Project) -> RepoResult<()> {
        project.validate()?;
        let changed = self.conn.execute(
            "UPDATE projects
             SET
                title = ?1,
                description = ?2,
                created_at = ?3,
                todos_json = ?4,
                is_example = ?5
             WHERE id = ?6;",
            params![
                project.title.as_str(),
                project.description.as_str(),
                project.created_at,
                encode_json(&project.todos)?,
                bool_to_int(project.is_example),
                project.id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Project, project.id));
        }
        Ok(())
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<()> {
        delete_row(self.conn, EntityKind::Project, id)
    }

    fn get_all(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, created_at, todos_json, is_example
             FROM projects
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let todos_text: String = row.get("todos_json")?;
    let project = Project {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        todos: decode_json(&todos_text, "projects.todos_json")?,
        is_example: int_to_bool(row.get("is_example")?, "projects.is_example")?,
    };
    project.validate()?;
    Ok(project)
}
