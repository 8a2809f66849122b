//! Pure transition function for the note document.
//!
//! # Responsibility
//! - Map `(document, action)` to the next document.
//!
//! # Invariants
//! - No side effects and no inputs besides the two arguments.
//! - The input document is never mutated; the result is a fresh value.
//! - Out-of-range indices and unknown actions return an equal document.
//! - Only the addressed section is touched by section-scoped actions.

use crate::model::link::validate_link;
use crate::model::section::{Document, Section, SectionField};
use crate::store::action::Action;

/// Computes the next document for `action`.
pub fn reduce(document: &Document, action: Action) -> Document {
    match action {
        Action::AddSection => {
            let mut next = document.clone();
            next.sections.push(Section::default());
            next
        }
        Action::DeleteSection { section_index } => {
            if section_index >= document.sections.len() {
                return document.clone();
            }
            let mut next = document.clone();
            next.sections.remove(section_index);
            next
        }
        Action::UpdateSection {
            section_index,
            field,
            value,
        } => update_section(document, section_index, |section| {
            match field {
                SectionField::Subject => {
                    section.subject = value;
                    section.highlighted = false;
                }
                SectionField::Notes => section.notes = value,
            }
            section.message.clear();
        }),
        Action::AddLink { section_index, url } => {
            update_section(document, section_index, |section| match validate_link(&url) {
                Ok(link) => {
                    section.links.push(link);
                    section.message.clear();
                }
                Err(err) => section.message = err.message().to_string(),
            })
        }
        Action::DeleteLink {
            section_index,
            link_index,
        } => {
            let in_range = document
                .section(section_index)
                .is_some_and(|section| link_index < section.links.len());
            if !in_range {
                return document.clone();
            }
            update_section(document, section_index, |section| {
                section.links.remove(link_index);
            })
        }
        Action::SetMessage {
            section_index,
            text,
        } => update_section(document, section_index, |section| section.message = text),
        Action::ToggleSection { section_index } => {
            update_section(document, section_index, |section| {
                section.is_open = !section.is_open;
            })
        }
        Action::ReplaceAllSections { sections } => Document::with_sections(sections),
        Action::Unknown => document.clone(),
    }
}

fn update_section(
    document: &Document,
    section_index: usize,
    apply: impl FnOnce(&mut Section),
) -> Document {
    let mut next = document.clone();
    if let Some(section) = next.sections.get_mut(section_index) {
        apply(section);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::reduce;
    use crate::model::section::{Document, Section, SectionField};
    use crate::store::action::Action;

    fn two_sections() -> Document {
        Document::with_sections(vec![
            Section::new("First", "one").with_links(["https://a.dev", "https://b.dev"]),
            Section::new("Second", "two"),
        ])
    }

    #[test]
    fn add_and_delete_section_preserve_order() {
        let document = two_sections();
        let added = reduce(&document, Action::AddSection);
        assert_eq!(added.len(), 3);
        assert_eq!(added.sections[2], Section::default());

        let removed = reduce(&added, Action::DeleteSection { section_index: 0 });
        assert_eq!(removed.len(), 2);
        assert_eq!(removed.sections[0].subject, "Second");
        assert_eq!(removed.sections[1], Section::default());
        // input is untouched
        assert_eq!(document, two_sections());
    }

    #[test]
    fn update_section_replaces_field_and_clears_message() {
        let mut document = two_sections();
        document.sections[0].message = "You must add a link".to_string();
        document.sections[0].highlighted = true;

        let next = reduce(
            &document,
            Action::UpdateSection {
                section_index: 0,
                field: SectionField::Notes,
                value: "updated".to_string(),
            },
        );
        assert_eq!(next.sections[0].notes, "updated");
        assert!(next.sections[0].message.is_empty());
        assert!(next.sections[0].highlighted);

        let next = reduce(
            &next,
            Action::UpdateSection {
                section_index: 0,
                field: SectionField::Subject,
                value: "Renamed".to_string(),
            },
        );
        assert_eq!(next.sections[0].subject, "Renamed");
        assert!(!next.sections[0].highlighted);
    }

    #[test]
    fn add_link_appends_trimmed_url_and_clears_message() {
        let mut document = two_sections();
        document.sections[1].message = "Please enter a valid URL".to_string();

        let next = reduce(
            &document,
            Action::AddLink {
                section_index: 1,
                url: "  https://example.com/path ".to_string(),
            },
        );
        assert_eq!(next.sections[1].links, vec!["https://example.com/path"]);
        assert!(next.sections[1].message.is_empty());
    }

    #[test]
    fn add_link_rejects_invalid_input_with_section_message() {
        let document = two_sections();

        let empty = reduce(
            &document,
            Action::AddLink {
                section_index: 1,
                url: "   ".to_string(),
            },
        );
        assert!(empty.sections[1].links.is_empty());
        assert_eq!(empty.sections[1].message, "You must add a link");

        let malformed = reduce(
            &document,
            Action::AddLink {
                section_index: 1,
                url: "not a url".to_string(),
            },
        );
        assert!(malformed.sections[1].links.is_empty());
        assert_eq!(malformed.sections[1].message, "Please enter a valid URL");
        assert!(malformed.sections[0].message.is_empty());
    }

    #[test]
    fn delete_link_removes_one_and_keeps_order() {
        let mut document = two_sections();
        document.sections[0].links.push("https://c.dev".to_string());

        let next = reduce(
            &document,
            Action::DeleteLink {
                section_index: 0,
                link_index: 1,
            },
        );
        assert_eq!(next.sections[0].links, vec!["https://a.dev", "https://c.dev"]);
    }

    #[test]
    fn out_of_range_indices_are_identity() {
        let document = two_sections();
        let actions = vec![
            Action::DeleteSection { section_index: 2 },
            Action::UpdateSection {
                section_index: 9,
                field: SectionField::Subject,
                value: "x".to_string(),
            },
            Action::AddLink {
                section_index: 2,
                url: "https://example.com".to_string(),
            },
            Action::DeleteLink {
                section_index: 0,
                link_index: 2,
            },
            Action::DeleteLink {
                section_index: 5,
                link_index: 0,
            },
            Action::SetMessage {
                section_index: usize::MAX,
                text: "boom".to_string(),
            },
            Action::ToggleSection { section_index: 3 },
            Action::Unknown,
        ];

        for action in actions {
            let name = action.name();
            assert_eq!(reduce(&document, action), document, "{name} should be a no-op");
        }
    }

    #[test]
    fn set_message_is_section_scoped() {
        let document = two_sections();
        let next = reduce(
            &document,
            Action::SetMessage {
                section_index: 0,
                text: "You must add a link".to_string(),
            },
        );
        assert_eq!(next.sections[0].message, "You must add a link");
        assert_eq!(next.sections[1], document.sections[1]);

        let cleared = reduce(
            &next,
            Action::SetMessage {
                section_index: 0,
                text: String::new(),
            },
        );
        assert!(cleared.sections[0].message.is_empty());
    }

    #[test]
    fn toggle_section_flips_open_flag() {
        let document = two_sections();
        let closed = reduce(&document, Action::ToggleSection { section_index: 1 });
        assert!(!closed.sections[1].is_open);
        assert!(closed.sections[0].is_open);
        let reopened = reduce(&closed, Action::ToggleSection { section_index: 1 });
        assert!(reopened.sections[1].is_open);
    }

    #[test]
    fn replace_all_sections_swaps_whole_list() {
        let document = two_sections();
        let replacement = vec![Section::new("Only", "")];
        let next = reduce(
            &document,
            Action::ReplaceAllSections {
                sections: replacement.clone(),
            },
        );
        assert_eq!(next.sections, replacement);
    }

    #[test]
    fn section_add_delete_sequence_matches_vec_simulation() {
        // (is_add, index) pairs; deletes may be out of range on purpose.
        let script = [
            (true, 0),
            (true, 0),
            (false, 1),
            (true, 0),
            (false, 7),
            (false, 0),
            (true, 0),
            (false, 2),
        ];

        let mut document = Document::default();
        document.sections[0].subject = "s0".to_string();
        let mut model = vec!["s0".to_string()];
        let mut counter = 1;

        for (is_add, index) in script {
            if is_add {
                document = reduce(&document, Action::AddSection);
                let label = format!("s{counter}");
                counter += 1;
                let last = document.len() - 1;
                document = reduce(
                    &document,
                    Action::UpdateSection {
                        section_index: last,
                        field: SectionField::Subject,
                        value: label.clone(),
                    },
                );
                model.push(label);
            } else {
                document = reduce(&document, Action::DeleteSection { section_index: index });
                if index < model.len() {
                    model.remove(index);
                }
            }
        }

        let subjects: Vec<String> = document
            .sections
            .iter()
            .map(|section| section.subject.clone())
            .collect();
        assert_eq!(subjects, model);
    }
}
