//! Storage configuration.
//!
//! # Responsibility
//! - Resolve where the board database lives and which slot key holds the
//!   snapshot.
//!
//! # Invariants
//! - Blank environment values fall back to defaults.
//! - A validated config never carries an empty slot key or database path.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Storage key used by the original browser build of the board.
pub const DEFAULT_SLOT_KEY: &str = "kanban-data";
pub const DEFAULT_DB_FILE_NAME: &str = "kanban.sqlite3";
pub const DB_PATH_ENV: &str = "KANBAN_DB_PATH";
pub const SLOT_KEY_ENV: &str = "KANBAN_SLOT_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDbPath,
    EmptySlotKey,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDbPath => write!(f, "database path cannot be empty"),
            Self::EmptySlotKey => write!(f, "slot key cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Where and under which key the board snapshot is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanConfig {
    pub db_path: PathBuf,
    pub slot_key: String,
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

impl KanbanConfig {
    /// Resolves config from `KANBAN_DB_PATH` and `KANBAN_SLOT_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = non_blank(lookup(DB_PATH_ENV)) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(key) = non_blank(lookup(SLOT_KEY_ENV)) {
            config.slot_key = key;
        }
        config
    }

    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }

    pub fn with_slot_key(mut self, slot_key: impl Into<String>) -> Self {
        self.slot_key = slot_key.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDbPath);
        }
        if self.slot_key.trim().is_empty() {
            return Err(ConfigError::EmptySlotKey);
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}
