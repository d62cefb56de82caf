//! Board domain model.
//!
//! # Responsibility
//! - Define the project/task records held by the state container.
//! - Define the persisted snapshot shape (`projects` + `currentProjectId`).
//!
//! # Invariants
//! - Project ids are unique across the snapshot.
//! - Task ids are unique within their owning project.
//! - Every task sits in exactly one `ColumnType`.
//! - `current_project_id`, when set, references a project in `projects`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Opaque project identifier.
pub type ProjectId = String;

/// Opaque task identifier.
pub type TaskId = String;

/// Fixed workflow column a task occupies.
///
/// Wire names are `todo`, `inprogress` and `done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Todo,
    InProgress,
    Done,
}

impl ColumnType {
    /// Board display order.
    pub const ALL: [ColumnType; 3] = [ColumnType::Todo, ColumnType::InProgress, ColumnType::Done];

    /// Stable wire name used in the persisted snapshot.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inprogress",
            Self::Done => "done",
        }
    }

    /// Human-readable column heading.
    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a column name is not one of the fixed columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColumnError(pub String);

impl Display for ParseColumnError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown column `{}`; expected todo|inprogress|done",
            self.0
        )
    }
}

impl Error for ParseColumnError {}

impl FromStr for ColumnType {
    type Err = ParseColumnError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "inprogress" | "in_progress" | "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(ParseColumnError(other.to_string())),
        }
    }
}

/// Single card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Immutable after creation.
    pub id: TaskId,
    pub title: String,
    /// Absent in the persisted layout when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Captured once at creation; serialized as RFC 3339.
    pub created_at: DateTime<Utc>,
    pub column: ColumnType,
}

/// Caller-supplied fields for a task that does not exist yet.
///
/// The container fills in `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub column: ColumnType,
}

impl NewTask {
    pub fn new(title: impl Into<String>, column: ColumnType) -> Self {
        Self {
            title: title.into(),
            description: None,
            column,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Named, ordered collection of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    pub fn new(id: impl Into<ProjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Tasks in `column`, in insertion order.
    pub fn tasks_in_column(&self, column: ColumnType) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(move |task| task.column == column)
    }
}

/// Full board snapshot: everything that is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardState {
    pub projects: Vec<Project>,
    /// Serialized as `null` when no project is selected.
    pub current_project_id: Option<ProjectId>,
}

/// Snapshot-level invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardValidationError {
    DuplicateProjectId(ProjectId),
    DuplicateTaskId {
        project_id: ProjectId,
        task_id: TaskId,
    },
}

impl Display for BoardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateProjectId(id) => write!(f, "duplicate project id `{id}`"),
            Self::DuplicateTaskId {
                project_id,
                task_id,
            } => write!(f, "duplicate task id `{task_id}` in project `{project_id}`"),
        }
    }
}

impl Error for BoardValidationError {}

impl BoardState {
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    /// Returns the project referenced by `current_project_id`.
    pub fn current_project(&self) -> Option<&Project> {
        self.current_project_id
            .as_deref()
            .and_then(|id| self.project(id))
    }

    /// Tasks of the current project in `column`; empty without a current project.
    pub fn tasks_in_column(&self, column: ColumnType) -> Vec<&Task> {
        self.current_project()
            .map(|project| project.tasks_in_column(column).collect())
            .unwrap_or_default()
    }

    /// Whether `id` is already used by any project or task.
    pub fn contains_id(&self, id: &str) -> bool {
        self.projects
            .iter()
            .any(|project| project.id == id || project.task(id).is_some())
    }

    /// Checks id uniqueness across projects and within each project.
    pub fn validate(&self) -> Result<(), BoardValidationError> {
        let mut project_ids = HashSet::new();
        for project in &self.projects {
            if !project_ids.insert(project.id.as_str()) {
                return Err(BoardValidationError::DuplicateProjectId(
                    project.id.clone(),
                ));
            }

            let mut task_ids = HashSet::new();
            for task in &project.tasks {
                if !task_ids.insert(task.id.as_str()) {
                    return Err(BoardValidationError::DuplicateTaskId {
                        project_id: project.id.clone(),
                        task_id: task.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Points a dangling `current_project_id` at the first project (or none).
    ///
    /// Returns `true` when the selection was changed.
    pub fn repair_current_project(&mut self) -> bool {
        match self.current_project_id.as_deref() {
            Some(id) if self.project(id).is_none() => {
                self.current_project_id = self.projects.first().map(|p| p.id.clone());
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardState, BoardValidationError, ColumnType, Project, Task};
    use chrono::Utc;

    fn task(id: &str, column: ColumnType) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            description: None,
            created_at: Utc::now(),
            column,
        }
    }

    #[test]
    fn column_parses_wire_names_and_aliases() {
        assert_eq!("todo".parse::<ColumnType>().unwrap(), ColumnType::Todo);
        assert_eq!(
            " InProgress ".parse::<ColumnType>().unwrap(),
            ColumnType::InProgress
        );
        assert_eq!(
            "in_progress".parse::<ColumnType>().unwrap(),
            ColumnType::InProgress
        );
        assert!("backlog".parse::<ColumnType>().is_err());
    }

    #[test]
    fn column_serializes_with_wire_names() {
        let json = serde_json::to_string(&ColumnType::ALL).unwrap();
        assert_eq!(json, r#"["todo","inprogress","done"]"#);
    }

    #[test]
    fn tasks_in_column_keeps_insertion_order() {
        let mut project = Project::new("p1", "Website");
        project.tasks.push(task("a", ColumnType::Todo));
        project.tasks.push(task("b", ColumnType::Done));
        project.tasks.push(task("c", ColumnType::Todo));
        let state = BoardState {
            projects: vec![project],
            current_project_id: Some("p1".to_string()),
        };

        let ids: Vec<&str> = state
            .tasks_in_column(ColumnType::Todo)
            .into_iter()
            .map(|task| task.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(state.tasks_in_column(ColumnType::InProgress).is_empty());
    }

    #[test]
    fn validate_rejects_duplicate_task_ids() {
        let mut project = Project::new("p1", "Website");
        project.tasks.push(task("dup", ColumnType::Todo));
        project.tasks.push(task("dup", ColumnType::Done));
        let state = BoardState {
            projects: vec![project],
            current_project_id: None,
        };

        assert_eq!(
            state.validate(),
            Err(BoardValidationError::DuplicateTaskId {
                project_id: "p1".to_string(),
                task_id: "dup".to_string(),
            })
        );
    }

    #[test]
    fn repair_current_project_selects_first_project() {
        let mut state = BoardState {
            projects: vec![Project::new("p1", "One"), Project::new("p2", "Two")],
            current_project_id: Some("gone".to_string()),
        };

        assert!(state.repair_current_project());
        assert_eq!(state.current_project_id.as_deref(), Some("p1"));
        assert!(!state.repair_current_project());
    }
}
