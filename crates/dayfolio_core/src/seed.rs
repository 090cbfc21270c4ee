//! Fixed example data shown on first launch.
//!
//! Every record is flagged `is_example = true` and carries a fixed id starting
//! at 1 per collection. `load_example_data` resets ids to the placeholder so
//! the relational store assigns fresh ones.

use crate::model::book::{Book, BookStatus};
use crate::model::project::{Project, TodoItem};
use crate::model::task::{Priority, Subtask, Task};
use crate::model::writing::{ChecklistItem, WritingEntry, WritingType};
use crate::model::{Entity, UNSAVED_ID};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Complete seed set for all four collections.
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleData {
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub writing_entries: Vec<WritingEntry>,
    pub books: Vec<Book>,
}

impl ExampleData {
    /// Builds the seed set with timestamps relative to `now_ms`.
    pub fn build(now_ms: i64) -> Self {
        Self {
            tasks: numbered(example_tasks()),
            projects: numbered(example_projects(now_ms)),
            writing_entries: numbered(example_writing_entries(now_ms)),
            books: numbered(example_books(now_ms)),
        }
    }

    /// Same records with placeholder ids, ready for store-assigned inserts.
    pub fn unsaved(now_ms: i64) -> Self {
        let mut data = Self::build(now_ms);
        reset_ids(&mut data.tasks);
        reset_ids(&mut data.projects);
        reset_ids(&mut data.writing_entries);
        reset_ids(&mut data.books);
        data
    }
}

fn numbered<T: Entity>(mut items: Vec<T>) -> Vec<T> {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_id(index as i64 + 1);
        item.set_example(true);
    }
    items
}

fn reset_ids<T: Entity>(items: &mut [T]) {
    for item in items {
        item.set_id(UNSAVED_ID);
    }
}

fn example_tasks() -> Vec<Task> {
    let mut review = Task::new("Review weekly goals")
        .with_category("Personal")
        .with_priority(Priority::High);
    review.description = Some("Look back at last week and pick three focus areas".to_string());
    review.subtasks = vec![
        Subtask {
            title: "Check calendar".to_string(),
            is_completed: true,
        },
        Subtask {
            title: "Write focus list".to_string(),
            is_completed: false,
        },
    ];

    let mut groceries = Task::new("Buy groceries").with_category("Errands");
    groceries.due_date = Some("2024-01-06T10:00:00".to_string());

    let mut workout = Task::new("Morning workout")
        .with_category("Health")
        .with_priority(Priority::Low);
    workout.is_completed = true;

    let mut tax = Task::new("File tax documents")
        .with_category("Finance")
        .with_priority(Priority::Urgent);
    tax.due_date = Some("2024-04-15T17:00:00".to_string());

    let call = Task::new("Call the dentist").with_category("Health");

    let mut read = Task::new("Read for 30 minutes").with_category("Learning");
    read.description = Some("Keep the reading streak going".to_string());

    vec![review, groceries, workout, tax, call, read]
}

fn example_projects(now_ms: i64) -> Vec<Project> {
    let mut garden = Project::new("Balcony garden", now_ms - 10 * DAY_MS);
    garden.description = "Herbs and tomatoes for the summer".to_string();
    garden.todos = vec![
        TodoItem {
            text: "Buy planters".to_string(),
            is_completed: true,
        },
        TodoItem::new("Choose seeds"),
        TodoItem::new("Set up watering schedule"),
    ];

    let mut portfolio = Project::new("Personal website", now_ms - 3 * DAY_MS);
    portfolio.description = "Rebuild the portfolio site".to_string();
    portfolio.todos = vec![TodoItem::new("Pick a theme"), TodoItem::new("Write about page")];

    let mut trip = Project::new("Weekend trip", now_ms - DAY_MS);
    trip.description = "Plan a short hiking trip".to_string();
    trip.todos = vec![TodoItem::new("Book cabin"), TodoItem::new("Pack gear")];

    vec![garden, portfolio, trip]
}

fn example_writing_entries(now_ms: i64) -> Vec<WritingEntry> {
    let mut first = WritingEntry::new(
        WritingType::Journal,
        "A calm morning",
        "Started the day with coffee and a short walk.",
        now_ms - 2 * DAY_MS,
    );
    first.mood = Some("calm".to_string());
    first.tags = vec!["morning".to_string(), "walk".to_string()];

    let mut ideas = WritingEntry::new(
        WritingType::Note,
        "Project ideas",
        "Small tools worth building this year.",
        now_ms - DAY_MS,
    );
    ideas.tags = vec!["ideas".to_string()];
    ideas.checklist = vec![
        ChecklistItem {
            text: "Habit tracker".to_string(),
            is_checked: false,
        },
        ChecklistItem {
            text: "Recipe box".to_string(),
            is_checked: true,
        },
    ];

    let mut reflection = WritingEntry::new(
        WritingType::Journal,
        "Weekly reflection",
        "Good progress on the garden, less on reading.",
        now_ms,
    );
    reflection.mood = Some("hopeful".to_string());

    vec![first, ideas, reflection]
}

fn example_books(now_ms: i64) -> Vec<Book> {
    let mut reading = Book::new("The Pragmatic Programmer", "Andrew Hunt, David Thomas", 352);
    reading.status = BookStatus::Reading;
    reading.pages_read = 120;
    reading.started_at = Some(now_ms - 14 * DAY_MS);

    let mut finished = Book::new("Deep Work", "Cal Newport", 296);
    finished.status = BookStatus::Completed;
    finished.pages_read = 296;
    finished.rating = Some(5);
    finished.started_at = Some(now_ms - 60 * DAY_MS);
    finished.completed_at = Some(now_ms - 30 * DAY_MS);

    let queued = Book::new("Atomic Habits", "James Clear", 320);
    let dune = Book::new("Dune", "Frank Herbert", 688);

    vec![reading, finished, queued, dune]
}

#[cfg(test)]
mod tests {
    use super::ExampleData;
    use crate::model::Entity;

    #[test]
    fn seed_tasks_have_ids_one_to_six() {
        let data = ExampleData::build(0);
        let ids: Vec<i64> = data.tasks.iter().map(|task| task.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert!(data.tasks.iter().all(|task| task.is_example));
    }

    #[test]
    fn seed_records_validate() {
        let data = ExampleData::build(1_700_000_000_000);
        assert!(data.tasks.iter().all(|item| item.validate().is_ok()));
        assert!(data.projects.iter().all(|item| item.validate().is_ok()));
        assert!(data.writing_entries.iter().all(|item| item.validate().is_ok()));
        assert!(data.books.iter().all(|item| item.validate().is_ok()));
    }

    #[test]
    fn unsaved_seed_uses_placeholder_ids() {
        let data = ExampleData::unsaved(0);
        assert!(data.books.iter().all(|book| book.id == 0 && book.is_example));
    }
}
