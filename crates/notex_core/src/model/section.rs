//! Section and document records.
//!
//! # Responsibility
//! - Define the canonical `Document` persisted under the storage key.
//! - Separate durable fields from per-session UI state.
//!
//! # Invariants
//! - `sections` order is display order.
//! - `is_open`, `message` and `highlighted` are skipped by serde; a decoded
//!   section always starts open, with no message and no highlight.

use serde::{Deserialize, Serialize};

/// Editable text fields of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionField {
    /// Section title shown in the card header.
    Subject,
    /// Free-form notes body.
    Notes,
}

impl SectionField {
    /// Stable lowercase label used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Notes => "notes",
        }
    }
}

/// One note card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Title text. Empty is allowed until export.
    #[serde(default)]
    pub subject: String,
    /// Free text, never validated.
    #[serde(default)]
    pub notes: String,
    /// Accepted links in insertion order. Duplicates are allowed.
    #[serde(default)]
    pub links: Vec<String>,
    /// Collapse state of the card.
    #[serde(skip, default = "default_open")]
    pub is_open: bool,
    /// Last link validation message. Empty when there is nothing to show.
    #[serde(skip)]
    pub message: String,
    /// Set by the export pre-check when `subject` is blank.
    #[serde(skip)]
    pub highlighted: bool,
}

fn default_open() -> bool {
    true
}

impl Default for Section {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl Section {
    /// Creates an open section with no links and no UI flags set.
    pub fn new(subject: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            notes: notes.into(),
            links: Vec::new(),
            is_open: true,
            message: String::new(),
            highlighted: false,
        }
    }

    /// Builder-style helper for seeding links, mostly used by tests and
    /// import paths. Links are taken as-is without validation.
    pub fn with_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.links = links.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the value of one editable field.
    pub fn field(&self, field: SectionField) -> &str {
        match field {
            SectionField::Subject => &self.subject,
            SectionField::Notes => &self.notes,
        }
    }

    /// Whether the title is blank after trimming.
    pub fn is_missing_title(&self) -> bool {
        self.subject.trim().is_empty()
    }

    /// Copy of this section with all session-only state reset.
    pub fn to_durable(&self) -> Self {
        Self::new(self.subject.clone(), self.notes.clone()).with_links(self.links.iter().cloned())
    }
}

/// Root value persisted under the storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl Default for Document {
    /// A fresh document holds a single empty section.
    fn default() -> Self {
        Self {
            sections: vec![Section::default()],
        }
    }
}

impl Document {
    /// Creates a document from an explicit section list (may be empty).
    pub fn with_sections(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Number of sections currently in the document.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the document holds no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Gets one section by index.
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Total number of links across all sections.
    pub fn link_count(&self) -> usize {
        self.sections.iter().map(|section| section.links.len()).sum()
    }

    /// Copy of this document with all session-only state reset.
    pub fn to_durable(&self) -> Self {
        Self {
            sections: self.sections.iter().map(Section::to_durable).collect(),
        }
    }
}
