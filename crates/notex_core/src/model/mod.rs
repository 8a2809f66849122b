//! Domain model for the note form.
//!
//! # Responsibility
//! - Define the durable document shape and its section records.
//! - Own the link validation and origin rules shared by store and export.
//!
//! # Invariants
//! - Section identity is its current position in `Document::sections`.
//! - Transient UI fields never reach the durable encoding.

pub mod link;
pub mod section;
