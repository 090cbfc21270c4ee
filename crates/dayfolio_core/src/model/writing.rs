//! Journal and note entries.
//!
//! # Invariants
//! - `tags`, `attachments` and `checklist` keep caller order.
//! - Attachment paths are opaque to core; files are never touched here.

use super::{validate_common, Entity, EntityId, EntityKind, ValidationError, UNSAVED_ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WritingType {
    #[default]
    Journal,
    Note,
}

impl WritingType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Journal => "JOURNAL",
            Self::Note => "NOTE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "JOURNAL" => Some(Self::Journal),
            "NOTE" => Some(Self::Note),
            _ => None,
        }
    }
}

/// File reference attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Free-form media kind, e.g. `image` or `audio`.
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub text: String,
    #[serde(default)]
    pub is_checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingEntry {
    #[serde(default)]
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default)]
    pub entry_type: WritingType,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub is_example: bool,
}

impl WritingEntry {
    pub fn new(
        entry_type: WritingType,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: UNSAVED_ID,
            title: title.into(),
            content: content.into(),
            entry_type,
            mood: None,
            tags: Vec::new(),
            attachments: Vec::new(),
            checklist: Vec::new(),
            created_at,
            is_example: false,
        }
    }
}

impl Entity for WritingEntry {
    const KIND: EntityKind = EntityKind::WritingEntry;

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
        validate_common(Self::KIND, self.id, &self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::{Attachment, WritingEntry, WritingType};

    #[test]
    fn entry_type_and_attachment_kind_serialize_as_type() {
        let mut entry = WritingEntry::new(WritingType::Note, "n", "body", 1);
        entry.attachments.push(Attachment {
            kind: "image".to_string(),
            path: "/tmp/a.png".to_string(),
            name: "a.png".to_string(),
        });
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "NOTE");
        assert_eq!(json["attachments"][0]["type"], "image");
    }
}
