//! Command-line front end for the Dayfolio data layer.
//!
//! # Responsibility
//! - Drive `DataManager` operations against a data directory.
//! - Keep output plain and line-oriented for scripting.

use clap::{Parser, Subcommand};
use dayfolio_core::{
    default_log_level, init_logging, DataError, DataManager, DataManagerConfig, Priority, Task,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

const DATA_DIR_ENV: &str = "DAYFOLIO_DATA_DIR";
const DEFAULT_DATA_DIR: &str = ".dayfolio";

#[derive(Parser)]
#[command(name = "dayfolio", version, about = "Tasks, projects, writing and books")]
struct Cli {
    /// Data directory holding the SQLite store and preferences file.
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Level for the rotating logs in `<data-dir>/logs`; defaults to `debug`
    /// for debug builds and `info` otherwise.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the stores (seeding on first launch) and print counters.
    Summary,

    /// List tasks.
    List {
        /// Only tasks not yet completed.
        #[arg(long)]
        open: bool,
    },

    /// Create a task.
    AddTask {
        title: String,

        #[arg(long, default_value = "")]
        category: String,

        /// low|medium|high|urgent
        #[arg(long, default_value = "medium")]
        priority: String,

        /// ISO-8601 local date-time, e.g. 2024-05-01T09:00:00.
        #[arg(long)]
        due: Option<String>,
    },

    /// Flip completion of a task.
    Toggle { id: i64 },

    /// Delete a task.
    DeleteTask { id: i64 },

    /// Insert a fresh copy of the example data.
    LoadExamples,

    /// Remove example data, keeping your own entries.
    ClearExamples,

    /// Delete everything.
    ClearAll {
        /// Required; the operation cannot be undone.
        #[arg(long)]
        yes: bool,
    },

    /// Reload every collection, falling back to the preferences mirror.
    History,

    /// Mirror the cache into the preferences file now.
    Flush,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let data_dir = absolute(cli.data_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)))?;
    let level = resolve_log_level(cli.log_level);
    init_logging(&level, data_dir.join("logs")).map_err(|err| err.to_string())?;

    let manager = DataManager::try_initialize(DataManagerConfig::for_data_dir(&data_dir))
        .map_err(|err| format!("cannot open data in `{}`: {err}", data_dir.display()))?;
    // One-shot process; the final flush below replaces periodic saves.
    manager.stop_auto_save();

    execute(&manager, cli.command).map_err(|err| err.to_string())?;
    let pulse = manager.flush().map_err(|err| err.to_string())?;
    info!("event=cli_run module=cli status=ok pulse={pulse}");
    Ok(())
}

fn execute(manager: &DataManager, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Summary => {
            let summary = manager.summary();
            println!(
                "tasks={} open={} completed={}",
                summary.tasks, summary.open_tasks, summary.completed_tasks
            );
            println!("projects={}", summary.projects);
            println!("writing_entries={}", summary.writing_entries);
            println!("books={} reading={}", summary.books, summary.books_reading);
            println!("example_entities={}", summary.example_entities);
        }
        Commands::List { open } => {
            for task in manager.tasks().iter().filter(|task| !open || !task.is_completed) {
                println!("{}", format_task(task));
            }
        }
        Commands::AddTask {
            title,
            category,
            priority,
            due,
        } => {
            let priority = Priority::parse(&priority)
                .ok_or_else(|| CliError::Usage(format!("unknown priority `{priority}`")))?;
            let mut task = Task::new(title)
                .with_category(category)
                .with_priority(priority);
            task.due_date = due;
            let id = manager.add_task(&task)?;
            println!("created task {id}");
        }
        Commands::Toggle { id } => match manager.toggle_task_completion(id)? {
            Some(task) => println!("{}", format_task(&task)),
            None => return Err(CliError::Usage(format!("task not found: {id}"))),
        },
        Commands::DeleteTask { id } => {
            manager.delete_task(id)?;
            println!("deleted task {id}");
        }
        Commands::LoadExamples => {
            let added = manager.load_example_data()?;
            println!("loaded {added} example item(s)");
        }
        Commands::ClearExamples => {
            let removed = manager.clear_example_data()?;
            println!("removed {removed} example item(s)");
        }
        Commands::ClearAll { yes } => {
            if !yes {
                return Err(CliError::Usage(
                    "clear-all deletes every entry; pass --yes to confirm".to_string(),
                ));
            }
            manager.clear_all_data()?;
            println!("all data cleared");
        }
        Commands::History => {
            if manager.load_history()? {
                println!("history loaded");
            } else {
                println!("no saved data");
            }
        }
        Commands::Flush => {
            let pulse = manager.flush()?;
            println!("saved pulse={pulse}");
        }
    }
    Ok(())
}

fn resolve_log_level(requested: Option<String>) -> String {
    requested.unwrap_or_else(|| default_log_level().as_str().to_string())
}

fn format_task(task: &Task) -> String {
    let mark = if task.is_completed { 'x' } else { ' ' };
    let mut line = format!(
        "[{mark}] {:>4} {:<6} {}",
        task.id,
        task.priority.as_str(),
        task.title
    );
    if !task.category.is_empty() {
        line.push_str(&format!(" #{}", task.category));
    }
    if let Some(due) = task.due_date.as_deref() {
        line.push_str(&format!(" due={due}"));
    }
    if task.is_example {
        line.push_str(" (example)");
    }
    line
}

fn absolute(path: PathBuf) -> Result<PathBuf, String> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir()
        .map_err(|err| format!("cannot resolve `{}`: {err}", path.display()))?;
    Ok(cwd.join(path))
}

#[derive(Debug)]
enum CliError {
    Usage(String),
    Data(DataError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(message) => write!(f, "{message}"),
            Self::Data(err) => write!(f, "{err}"),
        }
    }
}

impl From<DataError> for CliError {
    fn from(value: DataError) -> Self {
        Self::Data(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{execute, format_task, resolve_log_level, Cli, CliError, Commands};
    use clap::Parser;
    use dayfolio_core::{default_log_level, DataManager, DataManagerConfig, Task};

    #[test]
    fn log_level_falls_back_to_build_default() {
        assert_eq!(resolve_log_level(None), default_log_level().as_str());
        assert_eq!(resolve_log_level(Some("warn".to_string())), "warn");
    }

    #[test]
    fn parses_add_task_with_options() {
        let cli = Cli::try_parse_from([
            "dayfolio",
            "--data-dir",
            "/tmp/d",
            "add-task",
            "Write report",
            "--priority",
            "urgent",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::AddTask { ref title, ref priority, .. } if title == "Write report" && priority == "urgent"
        ));
    }

    #[test]
    fn format_task_marks_completion_and_examples() {
        let mut task = Task::new("Stretch").with_category("Health");
        task.id = 3;
        task.is_completed = true;
        task.is_example = true;
        let line = format_task(&task);
        assert!(line.starts_with("[x]"));
        assert!(line.contains("#Health"));
        assert!(line.ends_with("(example)"));
    }

    #[test]
    fn clear_all_requires_confirmation() {
        let manager = DataManager::try_initialize(DataManagerConfig::default()).unwrap();
        let err = execute(&manager, Commands::ClearAll { yes: false }).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
        assert_eq!(manager.tasks().len(), 6);
    }

    #[test]
    fn unknown_priority_is_usage_error() {
        let manager = DataManager::try_initialize(DataManagerConfig::default()).unwrap();
        let err = execute(
            &manager,
            Commands::AddTask {
                title: "x".to_string(),
                category: String::new(),
                priority: "someday".to_string(),
                due: None,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("someday"));
    }
}
