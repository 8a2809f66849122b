//! Flutter-facing bindings for the Note X core.

pub mod api;
