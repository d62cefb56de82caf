//! Key-value slot repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide load/save over durable `kv_slots` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - A slot key maps to at most one value; saves fully replace it.
//! - Empty keys are rejected before touching SQL.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for slot persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Slot keys must be non-empty after trimming.
    InvalidKey(String),
    /// Storage schema is missing or unusable.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid slot key `{key}`"),
            Self::InvalidData(message) => write!(f, "invalid slot storage: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable key-value slot storage.
pub trait SlotRepository {
    /// Returns the stored value, or `None` when the slot was never written.
    fn load_slot(&self, key: &str) -> RepoResult<Option<String>>;
    /// Inserts or fully replaces the slot value.
    fn save_slot(&self, key: &str, value: &str) -> RepoResult<()>;
}

/// SQLite-backed slot repository.
#[derive(Clone, Copy)]
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    /// Wraps a connection without checking the schema.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Wraps a connection after verifying the `kv_slots` table exists.
    ///
    /// # Errors
    /// - `RepoError::InvalidData` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_slots'
            );",
            [],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(RepoError::InvalidData(
                "table `kv_slots` is missing; open the database with `open_db`".to_string(),
            ));
        }
        Ok(Self::new(conn))
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn load_slot(&self, key: &str) -> RepoResult<Option<String>> {
        let key = normalize_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = normalize_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

fn normalize_key(key: &str) -> RepoResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidKey(key.to_string()));
    }
    Ok(trimmed)
}
