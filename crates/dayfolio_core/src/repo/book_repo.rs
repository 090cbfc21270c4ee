//! Book repository over the `books` table.

use super::{
    bool_to_int, delete_row, id_param, int_to_bool, EntityRepository, RepoError, RepoResult,
};
use crate::model::book::{Book, BookStatus};
use crate::model::{Entity, EntityId, EntityKind};
use rusqlite::{params, Connection, Row};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author,
    status,
    total_pages,
    pages_read,
    rating,
    started_at,
    completed_at,
    is_example
FROM books";

pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntityRepository<Book> for SqliteBookRepository<'_> {
    fn insert(&self, book: &Book) -> RepoResult<EntityId> {
        book.validate()?;
        self.conn.execute(
            "INSERT INTO books (
                id,
                title,
                author,
                status,
                total_pages,
                pages_read,
                rating,
                started_at,
                completed_at,
                is_example
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                id_param(book.id),
                book.title.as_str(),
                book.author.as_str(),
                book.status.as_str(),
                book.total_pages,
                book.pages_read,
                book.rating,
                book.started_at,
                book.completed_at,
                bool_to_int(book.is_example),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, book: &Book) -> RepoResult<()> {
        book.validate()?;
        let changed = self.conn.execute(
            "UPDATE books
             SET
                title = ?1,
                author = ?2,
                status = ?3,
                total_pages = ?4,
                pages_read = ?5,
                rating = ?6,
                started_at = ?7,
                completed_at = ?8,
                is_example = ?9
             WHERE id = ?10;",
            params![
                book.title.as_str(),
                book.author.as_str(),
                book.status.as_str(),
                book.total_pages,
                book.pages_read,
                book.rating,
                book.started_at,
                book.completed_at,
                bool_to_int(book.is_example),
                book.id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Book, book.id));
        }
        Ok(())
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<()> {
        delete_row(self.conn, EntityKind::Book, id)
    }

    fn get_all(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let status_text: String = row.get("status")?;
    let status = BookStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid book status `{status_text}` in books.status"))
    })?;

    let book = Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        status,
        total_pages: row.get("total_pages")?,
        pages_read: row.get("pages_read")?,
        rating: row.get("rating")?,
        started_at: row.get("started_at")?,
        completed_at: row.get("completed_at")?,
        is_example: int_to_bool(row.get("is_example")?, "books.is_example")?,
    };
    book.validate()?;
    Ok(book)
}
