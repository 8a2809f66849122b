//! Note store: action vocabulary, pure reducer and the stateful store.
//!
//! # Responsibility
//! - Own the in-memory document and apply transitions in dispatch order.
//! - Persist after every transition through the injected storage port.
//!
//! # Invariants
//! - `reducer::reduce` is the only place document values are derived.
//! - Storage is read only when the store is opened.

pub mod action;
pub mod notes_store;
pub mod reducer;
