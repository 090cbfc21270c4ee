//! Project domain model with embedded todo items.

use super::{validate_common, Entity, EntityId, EntityKind, ValidationError, UNSAVED_ID};
use serde::{Deserialize, Serialize};

/// Ordered todo line embedded in a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub text: String,
    #[serde(default)]
    pub is_completed: bool,
}

impl TodoItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Epoch milliseconds.
    #[serde(default)]
    pub created_at: i64,
    /// Todos are not a separate entity; order is significant.
    #[serde(default)]
    pub todos: Vec<TodoItem>,
    #[serde(default)]
    pub is_example: bool,
}

impl Project {
    pub fn new(title: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: UNSAVED_ID,
            title: title.into(),
            description: String::new(),
            created_at,
            todos: Vec::new(),
            is_example: false,
        }
    }

    /// Share of completed todos in `[0, 1]`; `0` for a project without todos.
    pub fn completion_ratio(&self) -> f64 {
        if self.todos.is_empty() {
            return 0.0;
        }
        let done = self.todos.iter().filter(|todo| todo.is_completed).count();
        done as f64 / self.todos.len() as f64
    }
}

impl Entity for Project {
    const KIND: EntityKind = EntityKind::Project;

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
    use super::{Project, TodoItem};

    #[test]
    fn completion_ratio_counts_done_todos() {
        let mut project = Project::new("garden", 0);
        assert_eq!(project.completion_ratio(), 0.0);

        project.todos = vec![TodoItem::new("dig"), TodoItem::new("plant")];
        project.todos[0].is_completed = true;
        assert!((project.completion_ratio() - 0.5).abs() < f64::EPSILON);
    }
}
