//! Stateful note store over an injected storage port.
//!
//! # Responsibility
//! - Hold the current document and the document-level export error.
//! - Run each action through `reduce`, then snapshot through storage.
//! - Provide the link-submit and export flows the presentation layer drives.
//!
//! # Invariants
//! - Transitions are applied one at a time, in call order.
//! - A failed save never rolls back the in-memory transition.
//! - Log events carry action names and counts only, never user text.

use crate::export::{render_report, ExportError};
use crate::model::link::validate_link;
use crate::model::section::{Document, SectionField};
use crate::storage::DocumentStorage;
use crate::store::action::Action;
use crate::store::reducer::reduce;
use log::{debug, error, info};

/// Document owner for one editing session.
pub struct NotesStore<S: DocumentStorage> {
    storage: S,
    document: Document,
    export_error: Option<String>,
}

impl<S: DocumentStorage> NotesStore<S> {
    /// Opens a store, loading the initial document through `storage`.
    pub fn open(storage: S) -> Self {
        let document = storage.load();
        info!(
            "event=store_open module=store status=ok sections={} links={}",
            document.len(),
            document.link_count()
        );
        Self {
            storage,
            document,
            export_error: None,
        }
    }

    /// Current document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Document-level error from the last refused export, if any.
    pub fn export_error(&self) -> Option<&str> {
        self.export_error.as_deref()
    }

    /// Borrows the storage port.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consumes the store and returns its storage port.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Applies `action` and persists the resulting document.
    ///
    /// Saving happens on every call, including identity transitions. Save
    /// failures are logged and the new state is kept in memory.
    pub fn dispatch(&mut self, action: Action) -> &Document {
        let name = action.name();
        self.document = reduce(&self.document, action);
        debug!(
            "event=dispatch module=store status=ok action={} sections={}",
            name,
            self.document.len()
        );

        if let Err(err) = self.storage.save(&self.document) {
            error!(
                "event=storage_save module=store status=error action={} error_code=save_failed error={}",
                name, err
            );
        }
        &self.document
    }

    /// Decodes a JSON action and dispatches it. Undecodable payloads are
    /// identity transitions.
    pub fn dispatch_json(&mut self, payload: &str) -> &Document {
        self.dispatch(Action::from_json(payload))
    }

    /// Replaces one text field of a section.
    pub fn update_field(
        &mut self,
        section_index: usize,
        field: SectionField,
        value: impl Into<String>,
    ) -> &Document {
        self.dispatch(Action::UpdateSection {
            section_index,
            field,
            value: value.into(),
        })
    }

    /// Validates link input and dispatches `AddLink` or a section message.
    ///
    /// Returns `true` when the link was accepted. Rejections surface only as
    /// the section's `message`.
    pub fn submit_link(&mut self, section_index: usize, raw: &str) -> bool {
        match validate_link(raw) {
            Ok(url) => {
                self.dispatch(Action::AddLink { section_index, url });
                true
            }
            Err(err) => {
                debug!(
                    "event=link_submit module=store status=rejected error_code={}",
                    err.code()
                );
                self.dispatch(Action::SetMessage {
                    section_index,
                    text: err.message().to_string(),
                });
                false
            }
        }
    }

    /// Runs the export pre-check and renders the report.
    ///
    /// On missing titles, every blank-titled section is highlighted through
    /// `ReplaceAllSections`, the document-level error is set, and no report
    /// is produced. On success the error and all highlights are cleared.
    ///
    /// # Errors
    /// - `ExportError::MissingTitles` listing the highlighted indices.
    pub fn export_report(&mut self) -> Result<String, ExportError> {
        match render_report(&self.document) {
            Ok(report) => {
                self.export_error = None;
                if self.document.sections.iter().any(|section| section.highlighted) {
                    let mut sections = self.document.sections.clone();
                    for section in &mut sections {
                        section.highlighted = false;
                    }
                    self.dispatch(Action::ReplaceAllSections { sections });
                }
                info!(
                    "event=export module=store status=ok sections={} bytes={}",
                    self.document.len(),
                    report.len()
                );
                Ok(report)
            }
            Err(ExportError::MissingTitles { section_indices }) => {
                let mut sections = self.document.sections.clone();
                for (index, section) in sections.iter_mut().enumerate() {
                    section.highlighted = section_indices.contains(&index);
                }
                self.dispatch(Action::ReplaceAllSections { sections });

                info!(
                    "event=export module=store status=refused error_code=missing_titles count={}",
                    section_indices.len()
                );
                let err = ExportError::MissingTitles { section_indices };
                self.export_error = Some(err.to_string());
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}
