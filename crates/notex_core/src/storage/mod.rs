//! Persistence adapter between the note store and durable key-value storage.
//!
//! # Responsibility
//! - Define the storage port (`DocumentStorage`) injected into `NotesStore`.
//! - Define the byte-level slot abstraction (`KeyValueStore`) and adapt it to
//!   whole-document load/save under one well-known key.
//!
//! # Invariants
//! - `load` never fails: missing or unreadable state yields the default document.
//! - `save` always writes the full durable document, overwriting the slot.
//! - Only durable section fields are encoded.

use crate::db::DbError;
use crate::model::section::Document;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

/// Storage key holding the serialized document.
pub const NOTES_STATE_KEY: &str = "notesState";

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reading or writing the durable slot.
#[derive(Debug)]
pub enum StorageError {
    /// Backend database failure.
    Db(DbError),
    /// Document could not be encoded or the stored payload could not be decoded.
    Serialization(serde_json::Error),
    /// Backend refused the operation for a backend-specific reason.
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "invalid stored document: {err}"),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// String slot store keyed by name, modeled after browser local storage.
pub trait KeyValueStore {
    /// Reads the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    /// Writes `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;
    /// Deletes `key`. Removing a missing key is not an error.
    fn remove_item(&mut self, key: &str) -> StorageResult<()>;
}

/// Storage port consumed by `NotesStore`.
pub trait DocumentStorage {
    /// Loads the initial document, falling back to `Document::default()`.
    fn load(&self) -> Document;
    /// Persists the durable part of `document`.
    fn save(&mut self, document: &Document) -> StorageResult<()>;
}

/// `DocumentStorage` over any `KeyValueStore`, encoding the document as JSON.
#[derive(Debug)]
pub struct KeyValuePersistence<K: KeyValueStore> {
    store: K,
    key: String,
}

impl<K: KeyValueStore> KeyValuePersistence<K> {
    /// Uses the default `notesState` key.
    pub fn new(store: K) -> Self {
        Self::with_key(store, NOTES_STATE_KEY)
    }

    /// Uses a caller-provided key.
    pub fn with_key(store: K, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key used by this adapter.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrows the underlying slot store.
    pub fn store(&self) -> &K {
        &self.store
    }

    /// Mutably borrows the underlying slot store.
    pub fn store_mut(&mut self) -> &mut K {
        &mut self.store
    }

    /// Reads and decodes the stored document without the default fallback.
    ///
    /// Returns `Ok(None)` when the key is absent.
    pub fn try_load(&self) -> StorageResult<Option<Document>> {
        let Some(raw) = self.store.get_item(&self.key)? else {
            return Ok(None);
        };
        Ok(Some(decode_document(&raw)?))
    }
}

impl<K: KeyValueStore> DocumentStorage for KeyValuePersistence<K> {
    fn load(&self) -> Document {
        match self.try_load() {
            Ok(Some(document)) => {
                debug!(
                    "event=storage_load module=storage status=ok sections={}",
                    document.len()
                );
                document
            }
            Ok(None) => {
                debug!("event=storage_load module=storage status=empty");
                Document::default()
            }
            Err(err) => {
                warn!(
                    "event=storage_load module=storage status=fallback error_code=load_failed error={}",
                    err
                );
                Document::default()
            }
        }
    }

    fn save(&mut self, document: &Document) -> StorageResult<()> {
        let encoded = encode_document(document)?;
        self.store.set_item(&self.key, &encoded)?;
        debug!(
            "event=storage_save module=storage status=ok sections={} bytes={}",
            document.len(),
            encoded.len()
        );
        Ok(())
    }
}

/// Encodes the durable fields of `document` as JSON.
pub fn encode_document(document: &Document) -> StorageResult<String> {
    Ok(serde_json::to_string(document)?)
}

/// Decodes a stored JSON document.
///
/// # Errors
/// - `Serialization` when the payload is not JSON or has the wrong shape.
pub fn decode_document(raw: &str) -> StorageResult<Document> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::{
        decode_document, encode_document, DocumentStorage, KeyValuePersistence, KeyValueStore,
        MemoryKeyValueStore, NOTES_STATE_KEY,
    };
    use crate::model::section::{Document, Section};

    #[test]
    fn encoding_has_expected_wire_shape_without_session_fields() {
        let mut section = Section::new("Reading", "weekend").with_links(["https://a.dev"]);
        section.is_open = false;
        section.message = "Please enter a valid URL".to_string();
        section.highlighted = true;
        let document = Document::with_sections(vec![section]);

        let json: serde_json::Value =
            serde_json::from_str(&encode_document(&document).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sections": [
                    { "subject": "Reading", "notes": "weekend", "links": ["https://a.dev"] }
                ]
            })
        );
    }

    #[test]
    fn decode_tolerates_missing_section_fields() {
        let document = decode_document(r#"{"sections":[{"subject":"Only title"}]}"#).unwrap();
        assert_eq!(document.sections, vec![Section::new("Only title", "")]);
    }

    #[test]
    fn load_falls_back_to_default_for_missing_and_corrupt_state() {
        let mut persistence = KeyValuePersistence::new(MemoryKeyValueStore::default());
        assert_eq!(persistence.load(), Document::default());

        for corrupt in ["{oops", "[1,2,3]", r#"{"sections":"nope"}"#, r#"{"sections":[{"links":[1]}]}"#] {
            persistence
                .store_mut()
                .set_item(NOTES_STATE_KEY, corrupt)
                .unwrap();
            assert_eq!(persistence.load(), Document::default(), "payload {corrupt}");
        }
    }

    #[test]
    fn custom_key_is_isolated_from_default_key() {
        let mut persistence =
            KeyValuePersistence::with_key(MemoryKeyValueStore::default(), "otherNotes");
        persistence
            .save(&Document::with_sections(vec![Section::new("A", "")]))
            .unwrap();
        assert_eq!(persistence.key(), "otherNotes");
        assert!(persistence.store().get_item(NOTES_STATE_KEY).unwrap().is_none());
        assert!(persistence.store().get_item("otherNotes").unwrap().is_some());
    }
}
