//! Database file behind `SqliteKeyValueStore`.
//!
//! Only one table lives here (`local_storage`), so this module is little
//! more than a versioned bootstrap: open the file, bring the schema up to
//! `migrations::latest_version()`, hand back the connection.
//!
//! # Invariants
//! - `PRAGMA user_version` equals the last applied migration.
//! - A connection is never returned before its schema is current.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// Result of opening or migrating the notes database.
pub type DbResult<T> = Result<T, DbError>;

/// Why the notes database could not be made ready.
#[derive(Debug)]
pub enum DbError {
    /// Opening the file or configuring the connection failed.
    Sqlite(rusqlite::Error),
    /// Script `version` failed; the whole pending batch was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// `user_version` is ahead of every migration this build ships.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "notes database error: {err}"),
            Self::Migration { version, source } => {
                write!(f, "notes storage migration {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "notes storage was written by a newer build (schema {db_version}, this build reads up to {latest_supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(source) | Self::Migration { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;
    use std::error::Error;

    #[test]
    fn newer_schema_message_names_both_versions() {
        let err = DbError::UnsupportedSchemaVersion {
            db_version: 4,
            latest_supported: 1,
        };
        let message = err.to_string();
        assert!(message.contains("schema 4"), "{message}");
        assert!(message.contains("up to 1"), "{message}");
        assert!(err.source().is_none());
    }

    #[test]
    fn migration_error_keeps_driver_source() {
        let err = DbError::Migration {
            version: 1,
            source: rusqlite::Error::InvalidQuery,
        };
        assert!(err.to_string().starts_with("notes storage migration 1 failed"));
        assert!(err.source().is_some());
    }
}
