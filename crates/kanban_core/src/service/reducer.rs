//! Pure board reducer.
//!
//! # Responsibility
//! - Map `(snapshot, command)` to the next snapshot.
//! - Encode the no-op rules for missing preconditions.
//!
//! # Invariants
//! - The input snapshot is never mutated; a changed board is a new value.
//! - `None` means "no observable change" and must not trigger persistence.
//! - Freshly generated ids never collide with ids already in the snapshot.
//! - Task commands only ever touch the current project.

use crate::model::board::{BoardState, ColumnType, NewTask, Project, ProjectId, Task, TaskId};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Every mutation the state container accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCommand {
    AddProject { name: String },
    RenameProject { id: ProjectId, name: String },
    DeleteProject { id: ProjectId },
    SetCurrentProject { id: ProjectId },
    AddTask(NewTask),
    /// Full replace of the task with the same id in the current project.
    UpdateTask(Task),
    DeleteTask { id: TaskId },
    MoveTask { id: TaskId, column: ColumnType },
}

impl BoardCommand {
    /// Stable command label used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddProject { .. } => "add_project",
            Self::RenameProject { .. } => "rename_project",
            Self::DeleteProject { .. } => "delete_project",
            Self::SetCurrentProject { .. } => "set_current_project",
            Self::AddTask(_) => "add_task",
            Self::UpdateTask(_) => "update_task",
            Self::DeleteTask { .. } => "delete_task",
            Self::MoveTask { .. } => "move_task",
        }
    }
}

/// Source of fresh ids and wall-clock time for the reducer.
pub trait BoardEnv {
    /// Returns a candidate id. Collisions are re-drawn by the reducer.
    fn fresh_id(&mut self) -> String;
    fn now(&self) -> DateTime<Utc>;
}

/// Random UUID v4 ids and the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnv;

impl BoardEnv for SystemEnv {
    fn fresh_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Applies `command` to `state`.
///
/// Returns `Some(next)` when the board changed, `None` for a no-op.
pub fn reduce(
    state: &BoardState,
    command: BoardCommand,
    env: &mut impl BoardEnv,
) -> Option<BoardState> {
    match command {
        BoardCommand::AddProject { name } => {
            let id = unique_id(state, env);
            let mut next = state.clone();
            next.projects.push(Project::new(id.clone(), name));
            next.current_project_id = Some(id);
            Some(next)
        }
        BoardCommand::RenameProject { id, name } => {
            let index = project_index(state, &id)?;
            if state.projects[index].name == name {
                return None;
            }
            let mut next = state.clone();
            next.projects[index].name = name;
            Some(next)
        }
        BoardCommand::DeleteProject { id } => {
            let index = project_index(state, &id)?;
            let mut next = state.clone();
            next.projects.remove(index);
            if next.current_project_id.as_deref() == Some(id.as_str()) {
                next.current_project_id = next.projects.first().map(|p| p.id.clone());
            }
            Some(next)
        }
        BoardCommand::SetCurrentProject { id } => {
            project_index(state, &id)?;
            if state.current_project_id.as_deref() == Some(id.as_str()) {
                return None;
            }
            let mut next = state.clone();
            next.current_project_id = Some(id);
            Some(next)
        }
        BoardCommand::AddTask(new_task) => {
            let index = current_project_index(state)?;
            let task = Task {
                id: unique_id(state, env),
                title: new_task.title,
                description: new_task.description,
                created_at: env.now(),
                column: new_task.column,
            };
            let mut next = state.clone();
            next.projects[index].tasks.push(task);
            Some(next)
        }
        BoardCommand::UpdateTask(task) => {
            let index = current_project_index(state)?;
            let position = task_index(&state.projects[index], &task.id)?;
            if state.projects[index].tasks[position] == task {
                return None;
            }
            let mut next = state.clone();
            next.projects[index].tasks[position] = task;
            Some(next)
        }
        BoardCommand::DeleteTask { id } => {
            let index = current_project_index(state)?;
            let position = task_index(&state.projects[index], &id)?;
            let mut next = state.clone();
            next.projects[index].tasks.remove(position);
            Some(next)
        }
        BoardCommand::MoveTask { id, column } => {
            let index = current_project_index(state)?;
            let position = task_index(&state.projects[index], &id)?;
            if state.projects[index].tasks[position].column == column {
                return None;
            }
            let mut next = state.clone();
            next.projects[index].tasks[position].column = column;
            Some(next)
        }
    }
}

fn unique_id(state: &BoardState, env: &mut impl BoardEnv) -> String {
    loop {
        let candidate = env.fresh_id();
        if !candidate.is_empty() && !state.contains_id(&candidate) {
            return candidate;
        }
    }
}

fn project_index(state: &BoardState, id: &str) -> Option<usize> {
    state.projects.iter().position(|project| project.id == id)
}

fn current_project_index(state: &BoardState) -> Option<usize> {
    let current = state.current_project_id.as_deref()?;
    project_index(state, current)
}

fn task_index(project: &Project, id: &str) -> Option<usize> {
    project.tasks.iter().position(|task| task.id == id)
}
