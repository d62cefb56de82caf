//! Command-line front end for the kanban board.
//!
//! # Responsibility
//! - Drive the board state container from a terminal.
//! - Validate user input the way the UI shell does before calling core.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use kanban_core::db::open_db;
use kanban_core::{
    default_log_level, init_logging, BoardState, BoardStore, ColumnType, KanbanConfig, NewTask,
    SqliteSlotRepository, Task,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kanban")]
#[command(version, about = "Single-user kanban board")]
struct Cli {
    /// SQLite database file. Defaults to $KANBAN_DB_PATH or a temp-dir file.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Slot key holding the board. Defaults to $KANBAN_SLOT_KEY or `kanban-data`.
    #[arg(long, global = true)]
    slot: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check core linkage
    Ping,
    /// Print the current project's board
    Show,
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Manage tasks of the current project
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// List projects, marking the current one
    List,
    /// Create a project and make it current
    Add { name: String },
    Rename { id: String, name: String },
    Delete { id: String },
    /// Make a project current
    Select { id: String },
}

#[derive(Subcommand)]
enum TaskCommands {
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// todo | inprogress | done
        #[arg(short, long, default_value = "todo")]
        column: ColumnType,
    },
    /// Edit a task; omitted fields keep their value, a blank description clears it
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        column: Option<ColumnType>,
    },
    Delete { id: String },
    Move { id: String, column: ColumnType },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let log_dir = log_dir
            .to_str()
            .context("log directory must be valid UTF-8")?;
        init_logging(default_log_level(), log_dir).context("failed to initialize logging")?;
    }

    let mut config = KanbanConfig::from_env();
    if let Some(db) = cli.db {
        config = config.with_db_path(db);
    }
    if let Some(slot) = cli.slot {
        config = config.with_slot_key(slot);
    }

    match cli.command {
        Commands::Ping => {
            println!("kanban_core ping={}", kanban_core::ping());
            println!("kanban_core version={}", kanban_core::core_version());
            Ok(())
        }
        Commands::Show => with_store(&config, |store| {
            print_board(store.state());
            Ok(())
        }),
        Commands::Project { command } => with_store(&config, |store| run_project(store, command)),
        Commands::Task { command } => with_store(&config, |store| run_task(store, command)),
    }
}

fn with_store<T>(
    config: &KanbanConfig,
    f: impl FnOnce(&mut BoardStore<SqliteSlotRepository<'_>>) -> Result<T>,
) -> Result<T> {
    config.validate()?;
    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let repo = SqliteSlotRepository::try_new(&conn)?;
    let mut store = BoardStore::load(repo, config.slot_key.as_str());
    f(&mut store)
}

fn run_project(
    store: &mut BoardStore<SqliteSlotRepository<'_>>,
    command: ProjectCommands,
) -> Result<()> {
    match command {
        ProjectCommands::List => {
            for project in store.projects() {
                let marker = if store.current_project_id() == Some(project.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {}  {} ({} tasks)", project.id, project.name, project.tasks.len());
            }
        }
        ProjectCommands::Add { name } => {
            let id = store.add_project(required(&name, "project name")?)?;
            println!("{id}");
        }
        ProjectCommands::Rename { id, name } => {
            report(store.rename_project(&id, required(&name, "project name")?)?, "project", &id);
        }
        ProjectCommands::Delete { id } => report(store.delete_project(&id)?, "project", &id),
        ProjectCommands::Select { id } => {
            if store.project(&id).is_none() {
                bail!("unknown project `{id}`");
            }
            store.set_current_project(&id)?;
        }
    }
    Ok(())
}

fn run_task(store: &mut BoardStore<SqliteSlotRepository<'_>>, command: TaskCommands) -> Result<()> {
    if store.current_project().is_none() {
        bail!("no project selected; run `kanban project add <name>` first");
    }

    match command {
        TaskCommands::Add {
            title,
            description,
            column,
        } => {
            let task = NewTask {
                title: required(&title, "title")?.to_string(),
                description: description.filter(|text| !text.trim().is_empty()),
                column,
            };
            if let Some(id) = store.add_task(task)? {
                println!("{id}");
            }
        }
        TaskCommands::Edit {
            id,
            title,
            description,
            column,
        } => {
            let Some(existing) = store.task(&id) else {
                bail!("unknown task `{id}`");
            };
            let title = match title {
                Some(title) => required(&title, "title")?.to_string(),
                None => existing.title.clone(),
            };
            let edited = Task {
                title,
                description: edited_description(description, existing.description.as_deref()),
                column: column.unwrap_or(existing.column),
                ..existing.clone()
            };
            report(store.update_task(edited)?, "task", &id);
        }
        TaskCommands::Delete { id } => report(store.delete_task(&id)?, "task", &id),
        TaskCommands::Move { id, column } => report(store.move_task(&id, column)?, "task", &id),
    }
    Ok(())
}

fn print_board(state: &BoardState) {
    let Some(project) = state.current_project() else {
        println!("Select or create a project to begin.");
        return;
    };
    println!("# {}", project.name);
    for column in ColumnType::ALL {
        println!();
        println!("## {}", column.label());
        for task in project.tasks_in_column(column) {
            println!("- [{}] {}", task.id, task.title);
            if let Some(description) = task.description.as_deref() {
                println!("    {description}");
            }
        }
    }
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{field} is required");
    }
    Ok(trimmed)
}

/// Omitted keeps the stored description; blank clears it.
fn edited_description(input: Option<String>, existing: Option<&str>) -> Option<String> {
    match input {
        Some(text) if text.trim().is_empty() => None,
        Some(text) => Some(text),
        None => existing.map(str::to_string),
    }
}

fn report(changed: bool, kind: &str, id: &str) {
    if !changed {
        eprintln!("no change: {kind} `{id}` not found or already up to date");
    }
}

#[cfg(test)]
mod tests {
    use super::edited_description;

    #[test]
    fn blank_description_clears_on_edit() {
        assert_eq!(edited_description(Some("   ".to_string()), Some("old")), None);
        assert_eq!(edited_description(Some(String::new()), Some("old")), None);
    }

    #[test]
    fn omitted_description_keeps_existing() {
        assert_eq!(edited_description(None, Some("old")).as_deref(), Some("old"));
        assert_eq!(edited_description(None, None), None);
        assert_eq!(
            edited_description(Some("new".to_string()), Some("old")).as_deref(),
            Some("new")
        );
    }
}
