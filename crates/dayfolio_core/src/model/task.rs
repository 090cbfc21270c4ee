//! Task domain model.
//!
//! # Invariants
//! - `title` is non-blank for persisted tasks.
//! - `due_date` is kept as the caller's string encoding; core never parses it.

use super::{validate_common, Entity, EntityId, EntityKind, ValidationError, UNSAVED_ID};
use serde::{Deserialize, Serialize};

/// Task urgency bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            "URGENT" => Some(Self::Urgent),
            _ => None,
        }
    }
}

/// Checklist step nested inside a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
}

/// Actionable item with priority and optional due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    /// Stored serialized; empty list is persisted as `NULL`.
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub is_example: bool,
}

impl Task {
    /// Creates an unsaved task with default category and `MEDIUM` priority.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            title: title.into(),
            description: None,
            category: String::new(),
            priority: Priority::default(),
            due_date: None,
            is_completed: false,
            subtasks: Vec::new(),
            is_example: false,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Returns a copy with the completion flag flipped.
    pub fn toggled(&self) -> Self {
        let mut next = self.clone();
        next.is_completed = !next.is_completed;
        next
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;

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
    use super::{Priority, Task};
    use crate::model::{Entity, ValidationError};

    #[test]
    fn json_uses_camel_case_and_upper_enum_names() {
        let task = Task::new("Write report").with_priority(Priority::High);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["isCompleted"], false);
        assert_eq!(json["priority"], "HIGH");
        assert_eq!(json["dueDate"], serde_json::Value::Null);
    }

    #[test]
    fn missing_optional_fields_decode_to_defaults() {
        let task: Task = serde_json::from_str(r#"{"id":4,"title":"legacy"}"#).unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.subtasks.is_empty());
        assert!(!task.is_example);
    }

    #[test]
    fn toggled_flips_completion_only() {
        let task = Task::new("flip");
        let toggled = task.toggled();
        assert!(toggled.is_completed);
        assert_eq!(toggled.title, task.title);
        assert!(!toggled.toggled().is_completed);
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = Task::new("   ").validate().unwrap_err();
        assert!(matches!(err, ValidationError::EmptyTitle(_)));
    }

    #[test]
    fn priority_parse_is_case_insensitive() {
        assert_eq!(Priority::parse("urgent"), Some(Priority::Urgent));
        assert_eq!(Priority::parse("nope"), None);
    }
}
