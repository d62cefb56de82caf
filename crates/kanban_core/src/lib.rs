//! Core domain logic for the kanban board.
//! This crate is the single source of truth for board invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, KanbanConfig, DEFAULT_SLOT_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::board::{
    BoardState, BoardValidationError, ColumnType, NewTask, ParseColumnError, Project, ProjectId,
    Task, TaskId,
};
pub use repo::slot_repo::{RepoError, RepoResult, SlotRepository, SqliteSlotRepository};
pub use service::board_store::{BoardStore, StoreError, StoreResult};
pub use service::reducer::{reduce, BoardCommand, BoardEnv, SystemEnv};
pub use service::snapshot::{decode_snapshot, encode_snapshot, SnapshotError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
