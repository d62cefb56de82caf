//! Board domain model.
//!
//! # Responsibility
//! - Define canonical project/task structures used by the state container.
//! - Own snapshot-level invariant checks.
//!
//! # Invariants
//! - Every project and task is identified by a stable opaque id.
//! - Deletion is a hard removal; there are no tombstones.

pub mod board;
