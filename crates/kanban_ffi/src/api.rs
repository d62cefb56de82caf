//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the board operations to the UI shell via FRB.
//! - Validate form input (trimmed, non-empty names and titles) before any
//!   board operation runs.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens the configured database, applies at most one board
//!   operation and returns a full envelope; no board state is cached here.

use kanban_core::db::open_db;
use kanban_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    BoardState, BoardStore, ColumnType, KanbanConfig, NewTask, Project, SqliteSlotRepository,
    StoreResult, Task,
};
use log::warn;
use std::sync::OnceLock;

static BOARD_CONFIG: OnceLock<KanbanConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One column heading for board rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    /// Wire name (`todo|inprogress|done`), passed back to move/add calls.
    pub name: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Wire name of the column.
    pub column: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectView {
    pub id: String,
    pub name: String,
    /// All tasks in insertion order; the UI filters per column.
    pub tasks: Vec<TaskView>,
}

/// Full board envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// Whether the board could be read.
    pub ok: bool,
    pub projects: Vec<ProjectView>,
    pub current_project_id: Option<String>,
    /// Human-readable diagnostics message.
    pub message: String,
}

/// Result envelope for board mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    /// `false` for rejected input or storage failure.
    pub ok: bool,
    /// `false` when the operation was a documented no-op.
    pub changed: bool,
    /// Created project/task id, when the operation creates one.
    pub entity_id: Option<String>,
    pub message: String,
}

impl BoardActionResponse {
    fn applied(changed: bool, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            changed,
            entity_id: None,
            message: message.into(),
        }
    }

    fn created(entity_id: String, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            changed: true,
            entity_id: Some(entity_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            entity_id: None,
            message: message.into(),
        }
    }
}

/// Fixed board columns in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn board_columns() -> Vec<ColumnView> {
    ColumnType::ALL
        .iter()
        .map(|column| ColumnView {
            name: column.as_str().to_string(),
            label: column.label().to_string(),
        })
        .collect()
}

/// Reads the persisted board.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; `ok=false` only when the database cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn board_snapshot() -> BoardView {
    snapshot_in(resolve_config())
}

/// Creates a project and makes it current.
#[flutter_rust_bridge::frb(sync)]
pub fn board_add_project(name: String) -> BoardActionResponse {
    add_project_in(resolve_config(), name)
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_rename_project(project_id: String, name: String) -> BoardActionResponse {
    rename_project_in(resolve_config(), project_id, name)
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_delete_project(project_id: String) -> BoardActionResponse {
    delete_project_in(resolve_config(), project_id)
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_select_project(project_id: String) -> BoardActionResponse {
    select_project_in(resolve_config(), project_id)
}

/// Adds a task to the current project.
///
/// `column` takes a wire name; see `board_columns`.
#[flutter_rust_bridge::frb(sync)]
pub fn board_add_task(
    title: String,
    description: Option<String>,
    column: String,
) -> BoardActionResponse {
    add_task_in(resolve_config(), title, description, column)
}

/// Edits title/description/column of a task in the current project.
///
/// `id` and creation time are preserved.
#[flutter_rust_bridge::frb(sync)]
pub fn board_update_task(
    task_id: String,
    title: String,
    description: Option<String>,
    column: String,
) -> BoardActionResponse {
    update_task_in(resolve_config(), task_id, title, description, column)
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_delete_task(task_id: String) -> BoardActionResponse {
    delete_task_in(resolve_config(), task_id)
}

/// Drop target handler: moves a task to another column.
#[flutter_rust_bridge::frb(sync)]
pub fn board_move_task(task_id: String, column: String) -> BoardActionResponse {
    move_task_in(resolve_config(), task_id, column)
}

fn snapshot_in(config: &KanbanConfig) -> BoardView {
    match with_store(config, |store| Ok(store.snapshot())) {
        Ok(state) => {
            let view = to_board_view(&state);
            let message = format!("Loaded {} project(s).", view.projects.len());
            BoardView { message, ..view }
        }
        Err(message) => BoardView {
            ok: false,
            projects: Vec::new(),
            current_project_id: None,
            message: format!("board_snapshot failed: {message}"),
        },
    }
}

fn add_project_in(config: &KanbanConfig, name: String) -> BoardActionResponse {
    let Some(name) = required(&name) else {
        return BoardActionResponse::failure("Project name is required.");
    };
    match with_store(config, |store| store.add_project(name)) {
        Ok(id) => BoardActionResponse::created(id, "Project created."),
        Err(err) => failure("board_add_project", err),
    }
}

fn rename_project_in(config: &KanbanConfig, project_id: String, name: String) -> BoardActionResponse {
    let Some(name) = required(&name) else {
        return BoardActionResponse::failure("Project name is required.");
    };
    match with_store(config, |store| store.rename_project(&project_id, name)) {
        Ok(changed) => BoardActionResponse::applied(changed, "Project renamed."),
        Err(err) => failure("board_rename_project", err),
    }
}

fn delete_project_in(config: &KanbanConfig, project_id: String) -> BoardActionResponse {
    match with_store(config, |store| store.delete_project(&project_id)) {
        Ok(changed) => BoardActionResponse::applied(changed, "Project deleted."),
        Err(err) => failure("board_delete_project", err),
    }
}

fn select_project_in(config: &KanbanConfig, project_id: String) -> BoardActionResponse {
    match with_store(config, |store| store.set_current_project(&project_id)) {
        Ok(changed) => BoardActionResponse::applied(changed, "Project selected."),
        Err(err) => failure("board_select_project", err),
    }
}

fn add_task_in(
    config: &KanbanConfig,
    title: String,
    description: Option<String>,
    column: String,
) -> BoardActionResponse {
    let Some(title) = required(&title) else {
        return BoardActionResponse::failure("Title is required.");
    };
    let column = match column.parse::<ColumnType>() {
        Ok(column) => column,
        Err(err) => return BoardActionResponse::failure(err.to_string()),
    };
    let task = NewTask {
        title: title.to_string(),
        description: optional(description),
        column,
    };
    match with_store(config, |store| store.add_task(task)) {
        Ok(Some(id)) => BoardActionResponse::created(id, "Task created."),
        Ok(None) => BoardActionResponse::applied(false, "No project selected."),
        Err(err) => failure("board_add_task", err),
    }
}

fn update_task_in(
    config: &KanbanConfig,
    task_id: String,
    title: String,
    description: Option<String>,
    column: String,
) -> BoardActionResponse {
    let Some(title) = required(&title) else {
        return BoardActionResponse::failure("Title is required.");
    };
    let column = match column.parse::<ColumnType>() {
        Ok(column) => column,
        Err(err) => return BoardActionResponse::failure(err.to_string()),
    };
    let description = optional(description);
    let result = with_store(config, |store| {
        let Some(existing) = store.task(&task_id) else {
            return Ok(false);
        };
        let edited = Task {
            title: title.to_string(),
            description,
            column,
            ..existing.clone()
        };
        store.update_task(edited)
    });
    match result {
        Ok(changed) => BoardActionResponse::applied(changed, "Task updated."),
        Err(err) => failure("board_update_task", err),
    }
}

fn delete_task_in(config: &KanbanConfig, task_id: String) -> BoardActionResponse {
    match with_store(config, |store| store.delete_task(&task_id)) {
        Ok(changed) => BoardActionResponse::applied(changed, "Task deleted."),
        Err(err) => failure("board_delete_task", err),
    }
}

fn move_task_in(config: &KanbanConfig, task_id: String, column: String) -> BoardActionResponse {
    let column = match column.parse::<ColumnType>() {
        Ok(column) => column,
        Err(err) => return BoardActionResponse::failure(err.to_string()),
    };
    match with_store(config, |store| store.move_task(&task_id, column)) {
        Ok(changed) => BoardActionResponse::applied(changed, "Task moved."),
        Err(err) => failure("board_move_task", err),
    }
}

fn resolve_config() -> &'static KanbanConfig {
    BOARD_CONFIG.get_or_init(KanbanConfig::from_env)
}

fn with_store<T>(
    config: &KanbanConfig,
    f: impl FnOnce(&mut BoardStore<SqliteSlotRepository<'_>>) -> StoreResult<T>,
) -> Result<T, String> {
    config.validate().map_err(|err| err.to_string())?;
    let conn = open_db(&config.db_path).map_err(|err| format!("board DB open failed: {err}"))?;
    let repo = SqliteSlotRepository::try_new(&conn)
        .map_err(|err| format!("board repo init failed: {err}"))?;
    let mut store = BoardStore::load(repo, config.slot_key.as_str());
    f(&mut store).map_err(|err| err.to_string())
}

fn failure(operation: &str, message: String) -> BoardActionResponse {
    warn!("event=ffi_call module=ffi status=error op={operation}");
    BoardActionResponse::failure(format!("{operation} failed: {message}"))
}

fn required(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn to_board_view(state: &BoardState) -> BoardView {
    BoardView {
        ok: true,
        projects: state.projects.iter().map(to_project_view).collect(),
        current_project_id: state.current_project_id.clone(),
        message: String::new(),
    }
}

fn to_project_view(project: &Project) -> ProjectView {
    ProjectView {
        id: project.id.clone(),
        name: project.name.clone(),
        tasks: project.tasks.iter().map(to_task_view).collect(),
    }
}

fn to_task_view(task: &Task) -> TaskView {
    TaskView {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        column: task.column.as_str().to_string(),
        created_at: task.created_at.to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        add_project_in, add_task_in, board_columns, core_version, delete_project_in,
        init_logging, move_task_in, ping, rename_project_in, select_project_in, snapshot_in,
        update_task_in,
    };
    use kanban_core::KanbanConfig;
    use tempfile::TempDir;

    fn temp_config() -> (TempDir, KanbanConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = KanbanConfig::default().with_db_path(dir.path().join("board.sqlite3"));
        (dir, config)
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn board_columns_are_in_display_order() {
        let names: Vec<String> = board_columns().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["todo", "inprogress", "done"]);
        assert_eq!(board_columns()[1].label, "In Progress");
    }

    #[test]
    fn add_project_trims_and_rejects_blank_names() {
        let (_dir, config) = temp_config();

        let blank = add_project_in(&config, "   ".to_string());
        assert!(!blank.ok);
        assert!(snapshot_in(&config).projects.is_empty());

        let created = add_project_in(&config, "  Website ".to_string());
        assert!(created.ok, "{}", created.message);
        let board = snapshot_in(&config);
        assert_eq!(board.projects[0].name, "Website");
        assert_eq!(board.current_project_id, created.entity_id);

        let renamed = rename_project_in(&config, board.projects[0].id.clone(), "".to_string());
        assert!(!renamed.ok);
    }

    #[test]
    fn add_task_requires_title_and_known_column() {
        let (_dir, config) = temp_config();
        add_project_in(&config, "Website".to_string());

        let blank = add_task_in(&config, " ".to_string(), None, "todo".to_string());
        assert_eq!(blank.message, "Title is required.");

        let bad_column = add_task_in(&config, "Design".to_string(), None, "later".to_string());
        assert!(!bad_column.ok);
        assert!(bad_column.message.contains("unknown column"));

        let created = add_task_in(
            &config,
            "Design mock".to_string(),
            Some("".to_string()),
            "todo".to_string(),
        );
        assert!(created.ok && created.changed, "{}", created.message);
        let task = &snapshot_in(&config).projects[0].tasks[0];
        assert_eq!(task.column, "todo");
        assert_eq!(task.description, None);
    }

    #[test]
    fn add_task_without_project_reports_noop() {
        let (_dir, config) = temp_config();
        let response = add_task_in(&config, "Design".to_string(), None, "todo".to_string());
        assert!(response.ok);
        assert!(!response.changed);
        assert_eq!(response.entity_id, None);
    }

    #[test]
    fn update_task_preserves_id_and_creation_time() {
        let (_dir, config) = temp_config();
        add_project_in(&config, "Website".to_string());
        let task_id = add_task_in(&config, "Draft".to_string(), None, "todo".to_string())
            .entity_id
            .unwrap();
        let before = snapshot_in(&config).projects[0].tasks[0].clone();

        let response = update_task_in(
            &config,
            task_id.clone(),
            "Final".to_string(),
            Some("copy".to_string()),
            "inprogress".to_string(),
        );
        assert!(response.changed, "{}", response.message);

        let after = snapshot_in(&config).projects[0].tasks[0].clone();
        assert_eq!(after.id, task_id);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.title, "Final");
        assert_eq!(after.description.as_deref(), Some("copy"));
        assert_eq!(after.column, "inprogress");
    }

    #[test]
    fn move_and_delete_flow_through_persisted_board() {
        let (_dir, config) = temp_config();
        let first = add_project_in(&config, "First".to_string()).entity_id.unwrap();
        let second = add_project_in(&config, "Second".to_string()).entity_id.unwrap();
        assert!(select_project_in(&config, first.clone()).changed);

        let task_id = add_task_in(&config, "Ship".to_string(), None, "todo".to_string())
            .entity_id
            .unwrap();
        assert!(move_task_in(&config, task_id.clone(), "done".to_string()).changed);
        assert!(!move_task_in(&config, task_id, "done".to_string()).changed);

        assert!(delete_project_in(&config, first).changed);
        assert_eq!(snapshot_in(&config).current_project_id, Some(second));
    }
}
