//! Board state container.
//!
//! # Responsibility
//! - Own the current board snapshot and expose the eight board operations.
//! - Persist the full snapshot to a durable slot after every effective change.
//! - Rehydrate from the slot on startup, falling back to an empty board.
//!
//! # Invariants
//! - Previously returned snapshots are never mutated.
//! - No-op commands never write to storage.
//! - Loading never fails: unreadable slots yield `BoardState::default()`.
//! - User text (project names, task titles) is never logged.

use crate::model::board::{BoardState, ColumnType, NewTask, Project, ProjectId, Task, TaskId};
use crate::repo::slot_repo::{RepoError, SlotRepository};
use crate::service::reducer::{reduce, BoardCommand, BoardEnv, SystemEnv};
use crate::service::snapshot::{decode_snapshot, encode_snapshot, SnapshotError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure to persist a snapshot after a successful transition.
///
/// The in-memory board already reflects the command when this is returned.
#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    Encode(SnapshotError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "failed to persist board: {err}"),
            Self::Encode(err) => write!(f, "failed to encode board: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<SnapshotError> for StoreError {
    fn from(value: SnapshotError) -> Self {
        Self::Encode(value)
    }
}

/// Single source of truth for projects and tasks.
pub struct BoardStore<R: SlotRepository, E: BoardEnv = SystemEnv> {
    repo: R,
    env: E,
    slot_key: String,
    state: Arc<BoardState>,
}

impl<R: SlotRepository> BoardStore<R, SystemEnv> {
    /// Loads the board from `slot_key` using random ids and the system clock.
    pub fn load(repo: R, slot_key: impl Into<String>) -> Self {
        Self::load_with_env(repo, slot_key, SystemEnv)
    }
}

impl<R: SlotRepository, E: BoardEnv> BoardStore<R, E> {
    /// Loads the board from `slot_key` with a caller-provided environment.
    ///
    /// # Contract
    /// - Missing slot: empty board.
    /// - Storage or decode failure: empty board plus a `warn` event.
    /// - Dangling current project id: repaired to the first project.
    pub fn load_with_env(repo: R, slot_key: impl Into<String>, env: E) -> Self {
        let slot_key = slot_key.into();
        let state = load_state(&repo, &slot_key);
        Self {
            repo,
            env,
            slot_key,
            state: Arc::new(state),
        }
    }

    /// Current immutable snapshot.
    pub fn snapshot(&self) -> Arc<BoardState> {
        Arc::clone(&self.state)
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    pub fn projects(&self) -> &[Project] {
        &self.state.projects
    }

    pub fn current_project_id(&self) -> Option<&str> {
        self.state.current_project_id.as_deref()
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.state.current_project()
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.state.project(id)
    }

    /// Looks up a task in the current project.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.current_project().and_then(|project| project.task(id))
    }

    pub fn tasks_in_column(&self, column: ColumnType) -> Vec<&Task> {
        self.state.tasks_in_column(column)
    }

    /// Applies one command and persists the result if the board changed.
    ///
    /// Returns whether the board changed.
    ///
    /// # Errors
    /// - `StoreError` when the new snapshot could not be written. The
    ///   in-memory board keeps the change.
    pub fn dispatch(&mut self, command: BoardCommand) -> StoreResult<bool> {
        let command_name = command.name();
        let Some(next) = reduce(&self.state, command, &mut self.env) else {
            debug!(
                "event=store_dispatch module=store status=noop command={}",
                command_name
            );
            return Ok(false);
        };

        self.state = Arc::new(next);
        self.persist(command_name)?;
        debug!(
            "event=store_dispatch module=store status=ok command={} projects={}",
            command_name,
            self.state.projects.len()
        );
        Ok(true)
    }

    /// Creates a project, selects it, and returns its id.
    pub fn add_project(&mut self, name: impl Into<String>) -> StoreResult<ProjectId> {
        self.dispatch(BoardCommand::AddProject { name: name.into() })?;
        Ok(self.state.current_project_id.clone().unwrap_or_default())
    }

    /// Renames a project. No-op when `id` is unknown.
    pub fn rename_project(&mut self, id: &str, name: impl Into<String>) -> StoreResult<bool> {
        self.dispatch(BoardCommand::RenameProject {
            id: id.to_string(),
            name: name.into(),
        })
    }

    /// Deletes a project; reselects the first remaining project if it was current.
    pub fn delete_project(&mut self, id: &str) -> StoreResult<bool> {
        self.dispatch(BoardCommand::DeleteProject { id: id.to_string() })
    }

    /// Selects a project. No-op when `id` is unknown.
    pub fn set_current_project(&mut self, id: &str) -> StoreResult<bool> {
        self.dispatch(BoardCommand::SetCurrentProject { id: id.to_string() })
    }

    /// Appends a task to the current project and returns its id.
    ///
    /// Returns `None` when there is no current project.
    pub fn add_task(&mut self, task: NewTask) -> StoreResult<Option<TaskId>> {
        if !self.dispatch(BoardCommand::AddTask(task))? {
            return Ok(None);
        }
        Ok(self
            .current_project()
            .and_then(|project| project.tasks.last())
            .map(|task| task.id.clone()))
    }

    /// Fully replaces the task with the same id in the current project.
    pub fn update_task(&mut self, task: Task) -> StoreResult<bool> {
        self.dispatch(BoardCommand::UpdateTask(task))
    }

    pub fn delete_task(&mut self, id: &str) -> StoreResult<bool> {
        self.dispatch(BoardCommand::DeleteTask { id: id.to_string() })
    }

    /// Moves a task of the current project to `column`. Idempotent.
    pub fn move_task(&mut self, id: &str, column: ColumnType) -> StoreResult<bool> {
        self.dispatch(BoardCommand::MoveTask {
            id: id.to_string(),
            column,
        })
    }

    fn persist(&self, command_name: &'static str) -> StoreResult<()> {
        let result = encode_snapshot(&self.state)
            .map_err(StoreError::from)
            .and_then(|payload| {
                self.repo
                    .save_slot(&self.slot_key, &payload)
                    .map_err(StoreError::from)
            });
        if let Err(err) = &result {
            error!(
                "event=store_persist module=store status=error command={} error={}",
                command_name, err
            );
        }
        result
    }
}

fn load_state(repo: &impl SlotRepository, slot_key: &str) -> BoardState {
    let payload = match repo.load_slot(slot_key) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            info!("event=store_load module=store status=ok source=empty");
            return BoardState::default();
        }
        Err(err) => {
            warn!(
                "event=store_load module=store status=fallback error_code=slot_read_failed error={}",
                err
            );
            return BoardState::default();
        }
    };

    let mut state = match decode_snapshot(&payload) {
        Ok(state) => state,
        Err(err) => {
            warn!(
                "event=store_load module=store status=fallback error_code=slot_decode_failed error={}",
                err
            );
            return BoardState::default();
        }
    };

    if state.repair_current_project() {
        warn!("event=store_load module=store status=repaired reason=dangling_current_project");
    }
    info!(
        "event=store_load module=store status=ok source=slot projects={}",
        state.projects.len()
    );
    state
}
