//! Core state management for the Note X form.
//! This crate is the single source of truth for document invariants.

pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;

pub use export::{
    missing_title_indices, render_report, write_report, ExportError, EXPORT_FILE_NAME,
    MISSING_TITLE_MESSAGE,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::link::{
    link_origin, validate_link, LinkValidationError, EMPTY_LINK_MESSAGE, INVALID_LINK_MESSAGE,
};
pub use model::section::{Document, Section, SectionField};
pub use storage::{
    DocumentStorage, KeyValuePersistence, KeyValueStore, MemoryKeyValueStore,
    SqliteKeyValueStore, StorageError, StorageResult, NOTES_STATE_KEY,
};
pub use store::action::Action;
pub use store::notes_store::NotesStore;
pub use store::reducer::reduce;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
