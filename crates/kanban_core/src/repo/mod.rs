//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the durable key-value slot contract used by the board store.
//! - Isolate SQLite query details from the state container.
//!
//! # Invariants
//! - Repository APIs never interpret slot payloads; encoding belongs to the
//!   service layer.

pub mod slot_repo;
