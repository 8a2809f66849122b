//! FFI use-case API for the Flutter note form.
//!
//! # Responsibility
//! - Expose the note store's actions to Dart via FRB as sync calls.
//! - Return read-only view snapshots after every call.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One process-wide session store serializes all transitions.
//! - Indices arriving from Dart are never trusted; out-of-range is a no-op.

use log::{error, info};
use notex_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, link_origin,
    ping as ping_inner, write_report, Action, DocumentStorage, KeyValuePersistence,
    NotesStore, Section, SectionField, SqliteKeyValueStore,
};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

const NOTES_DB_FILE_NAME: &str = "notex_local_storage.sqlite3";
static NOTES_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: OnceLock<Mutex<SessionStore>> = OnceLock::new();
static SESSION_INIT: Mutex<()> = Mutex::new(());

type SessionStore = NotesStore<KeyValuePersistence<SqliteKeyValueStore>>;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One link with its display origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    pub url: String,
    /// `scheme://host`, empty when it cannot be derived.
    pub origin: String,
}

/// Read-only projection of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub subject: String,
    pub notes: String,
    pub links: Vec<LinkView>,
    pub is_open: bool,
    /// Section-scoped validation message (empty when none).
    pub message: String,
    /// Set when export was refused because this title is blank.
    pub highlighted: bool,
}

/// Read-only projection of the whole form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesSnapshot {
    pub sections: Vec<SectionView>,
    /// Document-level export error, if the last export was refused.
    pub export_error: Option<String>,
}

/// Envelope returned by every note call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesResponse {
    /// Whether the call did what was asked (a rejected link is `false`).
    pub ok: bool,
    /// Human-readable diagnostics; empty on plain success.
    pub message: String,
    pub snapshot: NotesSnapshot,
}

/// Envelope returned by export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesExportResponse {
    pub ok: bool,
    /// Written artifact path on success.
    pub path: Option<String>,
    pub message: String,
    pub snapshot: NotesSnapshot,
}

/// Returns the current document without changing it.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_snapshot() -> NotesResponse {
    respond(|_| (true, String::new()))
}

/// Dispatches a JSON-encoded action (`{"type":"add_section"}` etc.).
///
/// Unknown or malformed actions leave the document unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_dispatch_json(payload: String) -> NotesResponse {
    respond(|store| {
        store.dispatch_json(&payload);
        (true, String::new())
    })
}

/// Appends an empty section.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_add_section() -> NotesResponse {
    dispatch(Action::AddSection)
}

/// Removes one section by index.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_delete_section(section_index: u32) -> NotesResponse {
    dispatch(Action::DeleteSection {
        section_index: to_index(section_index),
    })
}

/// Replaces the title of one section.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_update_subject(section_index: u32, value: String) -> NotesResponse {
    dispatch(Action::UpdateSection {
        section_index: to_index(section_index),
        field: SectionField::Subject,
        value,
    })
}

/// Replaces the notes body of one section.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_update_notes(section_index: u32, value: String) -> NotesResponse {
    dispatch(Action::UpdateSection {
        section_index: to_index(section_index),
        field: SectionField::Notes,
        value,
    })
}

/// Validates and appends a link; rejections set the section message.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_submit_link(section_index: u32, url: String) -> NotesResponse {
    respond(|store| {
        let accepted = store.submit_link(to_index(section_index), &url);
        (accepted, String::new())
    })
}

/// Removes one link of one section.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_delete_link(section_index: u32, link_index: u32) -> NotesResponse {
    dispatch(Action::DeleteLink {
        section_index: to_index(section_index),
        link_index: to_index(link_index),
    })
}

/// Flips the collapse state of one section.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_toggle_section(section_index: u32) -> NotesResponse {
    dispatch(Action::ToggleSection {
        section_index: to_index(section_index),
    })
}

/// Exports the report into `output_dir` as `notes.txt`.
///
/// # FFI contract
/// - Refused exports highlight blank titles and write nothing.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_export(output_dir: String) -> NotesExportResponse {
    let result = with_session(|store| {
        let outcome = export_into(store, Path::new(output_dir.trim()));
        (outcome, snapshot_of(store))
    });

    match result {
        Ok((Ok(path), snapshot)) => NotesExportResponse {
            ok: true,
            path: Some(path.display().to_string()),
            message: "Export written.".to_string(),
            snapshot,
        },
        Ok((Err(message), snapshot)) => NotesExportResponse {
            ok: false,
            path: None,
            message,
            snapshot,
        },
        Err(message) => NotesExportResponse {
            ok: false,
            path: None,
            message,
            snapshot: NotesSnapshot::default(),
        },
    }
}

fn dispatch(action: Action) -> NotesResponse {
    respond(|store| {
        store.dispatch(action);
        (true, String::new())
    })
}

fn respond(f: impl FnOnce(&mut SessionStore) -> (bool, String)) -> NotesResponse {
    match with_session(|store| {
        let (ok, message) = f(store);
        (ok, message, snapshot_of(store))
    }) {
        Ok((ok, message, snapshot)) => NotesResponse {
            ok,
            message,
            snapshot,
        },
        Err(message) => NotesResponse {
            ok: false,
            message,
            snapshot: NotesSnapshot::default(),
        },
    }
}

fn export_into<S: DocumentStorage>(
    store: &mut NotesStore<S>,
    output_dir: &Path,
) -> Result<PathBuf, String> {
    if output_dir.as_os_str().is_empty() {
        return Err("output_dir cannot be empty".to_string());
    }
    let report = store.export_report().map_err(|err| err.to_string())?;
    write_report(output_dir, &report).map_err(|err| {
        error!("event=export_write module=ffi status=error error={err}");
        err.to_string()
    })
}

fn snapshot_of<S: DocumentStorage>(store: &NotesStore<S>) -> NotesSnapshot {
    NotesSnapshot {
        sections: store
            .document()
            .sections
            .iter()
            .map(to_section_view)
            .collect(),
        export_error: store.export_error().map(str::to_string),
    }
}

fn to_section_view(section: &Section) -> SectionView {
    SectionView {
        subject: section.subject.clone(),
        notes: section.notes.clone(),
        links: section
            .links
            .iter()
            .map(|url| LinkView {
                url: url.clone(),
                origin: link_origin(url),
            })
            .collect(),
        is_open: section.is_open,
        message: section.message.clone(),
        highlighted: section.highlighted,
    }
}

fn to_index(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn with_session<T>(f: impl FnOnce(&mut SessionStore) -> T) -> Result<T, String> {
    let session = get_or_open(&SESSION, &SESSION_INIT, open_session_store)?;
    // A panic mid-transition cannot leave a half-written document: the
    // store only swaps in fully reduced values.
    let mut guard = session.lock().unwrap_or_else(PoisonError::into_inner);
    Ok(f(&mut guard))
}

/// Returns the value in `cell`, running `open` at most once across threads.
///
/// `init_lock` serializes first use so concurrent callers never open the
/// backing file twice. A failed `open` leaves `cell` empty for a later retry.
fn get_or_open<'a, T>(
    cell: &'a OnceLock<Mutex<T>>,
    init_lock: &Mutex<()>,
    open: impl FnOnce() -> Result<T, String>,
) -> Result<&'a Mutex<T>, String> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let _init = init_lock.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = open()?;
    Ok(cell.get_or_init(|| Mutex::new(value)))
}

fn open_session_store() -> Result<SessionStore, String> {
    let db_path = resolve_notes_db_path();
    let kv = SqliteKeyValueStore::open(&db_path)
        .map_err(|err| format!("notes storage open failed: {err}"))?;
    info!("event=session_open module=ffi status=ok");
    Ok(NotesStore::open(KeyValuePersistence::new(kv)))
}

fn resolve_notes_db_path() -> PathBuf {
    NOTES_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("NOTEX_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(NOTES_DB_FILE_NAME)
        })
        .clone()
}
