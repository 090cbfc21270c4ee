//! Reading log model.

use super::{validate_common, Entity, EntityId, EntityKind, ValidationError, UNSAVED_ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookStatus {
    #[default]
    ToRead,
    Reading,
    Completed,
}

impl BookStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToRead => "TO_READ",
            Self::Reading => "READING",
            Self::Completed => "COMPLETED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "TO_READ" => Some(Self::ToRead),
            "READING" => Some(Self::Reading),
            "COMPLETED" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default)]
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub status: BookStatus,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub pages_read: u32,
    /// 1..=5 when present.
    #[serde(default)]
    pub rating: Option<u8>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub started_at: Option<i64>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub completed_at: Option<i64>,
    #[serde(default)]
    pub is_example: bool,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>, total_pages: u32) -> Self {
        Self {
            id: UNSAVED_ID,
            title: title.into(),
            author: author.into(),
            status: BookStatus::default(),
            total_pages,
            pages_read: 0,
            rating: None,
            started_at: None,
            completed_at: None,
            is_example: false,
        }
    }

    /// Reading progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        (f64::from(self.pages_read) / f64::from(self.total_pages)).clamp(0.0, 1.0)
    }
}

impl Entity for Book {
    const KIND: EntityKind = EntityKind::Book;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn is_example(&self) -> bool {
        self.is_example
    }

    fn set_example(&mut self, is_example: bool) {
        self.is_example = is_example;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_common(Self::KIND, self.id, &self.title)?;
        if self.pages_read > self.total_pages {
            return Err(ValidationError::PagesReadExceedTotal {
                pages_read: self.pages_read,
                total_pages: self.total_pages,
            });
        }
        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err(ValidationError::RatingOutOfRange(rating));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Book, BookStatus};
    use crate::model::{Entity, ValidationError};

    #[test]
    fn progress_is_zero_without_pages() {
        assert_eq!(Book::new("b", "a", 0).progress(), 0.0);
    }

    #[test]
    fn progress_is_ratio_of_pages() {
        let mut book = Book::new("b", "a", 200);
        book.pages_read = 50;
        assert!((book.progress() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_rejects_overread_and_bad_rating() {
        let mut book = Book::new("b", "a", 10);
        book.pages_read = 11;
        assert!(matches!(
            book.validate(),
            Err(ValidationError::PagesReadExceedTotal { .. })
        ));

        book.pages_read = 10;
        book.rating = Some(6);
        assert_eq!(book.validate(), Err(ValidationError::RatingOutOfRange(6)));
    }

    #[test]
    fn status_names_match_storage_encoding() {
        for status in [BookStatus::ToRead, BookStatus::Reading, BookStatus::Completed] {
            assert_eq!(BookStatus::parse(status.as_str()), Some(status));
        }
    }
}
