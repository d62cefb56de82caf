//! Board snapshot codec for the durable slot.
//!
//! # Responsibility
//! - Encode `BoardState` into the persisted JSON layout.
//! - Decode slot payloads, including the `{ "state": ..., "version": N }`
//!   envelope written by the browser build of the board.
//!
//! # Invariants
//! - Decoded snapshots always pass `BoardState::validate()`.
//! - Encode then decode yields an equal `BoardState`.

use crate::model::board::{BoardState, BoardValidationError};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure to encode or decode a slot payload.
#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
    Invalid(BoardValidationError),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed board snapshot: {err}"),
            Self::Invalid(err) => write!(f, "invalid board snapshot: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<BoardValidationError> for SnapshotError {
    fn from(value: BoardValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Serializes the full snapshot into the slot layout.
pub fn encode_snapshot(state: &BoardState) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(state)?)
}

/// Parses a slot payload back into a validated snapshot.
///
/// # Errors
/// - `SnapshotError::Json` for malformed JSON or a mismatched shape.
/// - `SnapshotError::Invalid` when ids are duplicated.
pub fn decode_snapshot(payload: &str) -> Result<BoardState, SnapshotError> {
    let value: Value = serde_json::from_str(payload)?;
    let state: BoardState = serde_json::from_value(unwrap_envelope(value))?;
    state.validate()?;
    Ok(state)
}

fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if !map.contains_key("projects") && map.contains_key("state") => {
            map.remove("state").unwrap_or(Value::Null)
        }
        other => other,
    }
}
