//! Flutter-facing bindings for the kanban core.

pub mod api;
