//! Board use-case services.
//!
//! # Responsibility
//! - Host the pure reducer, the snapshot codec and the state container.
//! - Keep FFI/CLI callers decoupled from storage details.

pub mod board_store;
pub mod reducer;
pub mod snapshot;
