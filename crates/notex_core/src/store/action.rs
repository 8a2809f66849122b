//! Action vocabulary accepted by the note store.
//!
//! # Invariants
//! - Serialized actions are tagged by `type` in snake_case.
//! - Unrecognized tags decode to `Action::Unknown` instead of failing.

use crate::model::section::{Section, SectionField};
use log::warn;
use serde::{Deserialize, Serialize};

/// One requested state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Append an empty section.
    AddSection,
    /// Remove the section at `section_index`.
    DeleteSection { section_index: usize },
    /// Replace `subject` or `notes` of one section.
    UpdateSection {
        section_index: usize,
        field: SectionField,
        value: String,
    },
    /// Append a link after re-validating it.
    AddLink { section_index: usize, url: String },
    /// Remove one link of one section.
    DeleteLink {
        section_index: usize,
        link_index: usize,
    },
    /// Set or clear (empty `text`) a section message.
    SetMessage { section_index: usize, text: String },
    /// Flip the collapse state of one section.
    ToggleSection { section_index: usize },
    /// Replace every section at once.
    ReplaceAllSections { sections: Vec<Section> },
    /// Any tag this build does not know. Always an identity transition.
    #[serde(other)]
    Unknown,
}

impl Action {
    /// Stable label used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddSection => "add_section",
            Self::DeleteSection { .. } => "delete_section",
            Self::UpdateSection { .. } => "update_section",
            Self::AddLink { .. } => "add_link",
            Self::DeleteLink { .. } => "delete_link",
            Self::SetMessage { .. } => "set_message",
            Self::ToggleSection { .. } => "toggle_section",
            Self::ReplaceAllSections { .. } => "replace_all_sections",
            Self::Unknown => "unknown",
        }
    }

    /// Decodes a JSON action payload.
    ///
    /// Unknown tags map to `Action::Unknown`; payloads that are not a
    /// well-formed action at all are also treated as `Unknown`.
    pub fn from_json(payload: &str) -> Self {
        match serde_json::from_str(payload) {
            Ok(action) => action,
            Err(err) => {
                warn!(
                    "event=action_decode module=store status=error error_code=action_malformed line={} column={}",
                    err.line(),
                    err.column()
                );
                Self::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Action;
    use crate::model::section::SectionField;

    #[test]
    fn decodes_tagged_snake_case_actions() {
        let action = Action::from_json(
            r#"{"type":"update_section","section_index":1,"field":"subject","value":"Reading"}"#,
        );
        assert_eq!(
            action,
            Action::UpdateSection {
                section_index: 1,
                field: SectionField::Subject,
                value: "Reading".to_string(),
            }
        );
        assert_eq!(Action::from_json(r#"{"type":"add_section"}"#), Action::AddSection);
    }

    #[test]
    fn unknown_tags_and_garbage_decode_to_unknown() {
        assert_eq!(Action::from_json(r#"{"type":"set_dark_mode"}"#), Action::Unknown);
        assert_eq!(Action::from_json("{not json"), Action::Unknown);
        assert_eq!(
            Action::from_json(r#"{"type":"delete_link","section_index":"zero"}"#),
            Action::Unknown
        );
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(Action::ToggleSection { section_index: 2 })
            .expect("serialize action");
        assert_eq!(json["type"], "toggle_section");
        assert_eq!(json["section_index"], 2);
    }
}
