//! Writing entry repository over the `writing_entries` table.
//!
//! Tags, attachments and checklist items are stored as JSON arrays, one
//! column each.

use super::{
    bool_to_int, decode_json, delete_row, encode_json, id_param, int_to_bool, EntityRepository,
    RepoError, RepoResult,
};
use crate::model::writing::{WritingEntry, WritingType};
use crate::model::{Entity, EntityId, EntityKind};
use rusqlite::{params, Connection, Row};

const WRITING_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    entry_type,
    mood,
    tags_json,
    attachments_json,
    checklist_json,
    created_at,
    is_example
FROM writing_entries";

pub struct SqliteWritingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWritingRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntityRepository<WritingEntry> for SqliteWritingRepository<'_> {
    fn insert(&self, entry: &WritingEntry) -> RepoResult<EntityId> {
        entry.validate()?;
        self.conn.execute(
            "INSERT INTO writing_entries (
                id,
                title,
                content,
                entry_type,
                mood,
                tags_json,
                attachments_json,
                checklist_json,
                created_at,
                is_example
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                id_param(entry.id),
                entry.title.as_str(),
                entry.content.as_str(),
                entry.entry_type.as_str(),
                entry.mood.as_deref(),
                encode_json(&entry.tags)?,
                encode_json(&entry.attachments)?,
                encode_json(&entry.checklist)?,
                entry.created_at,
                bool_to_int(entry.is_example),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, entry: &WritingEntry) -> RepoResult<()> {
        entry.validate()?;
        let changed = self.conn.execute(
            "UPDATE writing_entries
             SET
                title = ?1,
                content = ?2,
                entry_type = ?3,
                mood = ?4,
                tags_json = ?5,
                attachments_json = ?6,
                checklist_json = ?7,
                created_at = ?8,
                is_example = ?9
             WHERE id = ?10;",
            params![
                entry.title.as_str(),
                entry.content.as_str(),
                entry.entry_type.as_str(),
                entry.mood.as_deref(),
                encode_json(&entry.tags)?,
                encode_json(&entry.attachments)?,
                encode_json(&entry.checklist)?,
                entry.created_at,
                bool_to_int(entry.is_example),
                entry.id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::WritingEntry, entry.id));
        }
        Ok(())
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<()> {
        delete_row(self.conn, EntityKind::WritingEntry, id)
    }

    fn get_all(&self) -> RepoResult<Vec<WritingEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WRITING_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_writing_row(row)?);
        }
        Ok(entries)
    }
}

fn parse_writing_row(row: &Row<'_>) -> RepoResult<WritingEntry> {
    let type_text: String = row.get("entry_type")?;
    let entry_type = WritingType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid entry type `{type_text}` in writing_entries.entry_type"
        ))
    })?;

    let tags_text: String = row.get("tags_json")?;
    let attachments_text: String = row.get("attachments_json")?;
    let checklist_text: String = row.get("checklist_json")?;

    let entry = WritingEntry {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        entry_type,
        mood: row.get("mood")?,
        tags: decode_json(&tags_text, "writing_entries.tags_json")?,
        attachments: decode_json(&attachments_text, "writing_entries.attachments_json")?,
        checklist: decode_json(&checklist_text, "writing_entries.checklist_json")?,
        created_at: row.get("created_at")?,
        is_example: int_to_bool(row.get("is_example")?, "writing_entries.is_example")?,
    };
    entry.validate()?;
    Ok(entry)
}
