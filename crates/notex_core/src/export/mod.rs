//! Plain-text export of the note document.
//!
//! # Responsibility
//! - Render the report for a document whose sections all have titles.
//! - Report which sections block the export otherwise.
//! - Write the rendered report to the export artifact file.
//!
//! # Invariants
//! - Export is all-or-nothing: any blank title yields no output at all.
//! - Every link is rendered, even when its origin cannot be extracted.
//! - Each block starts with exactly one `Title:` line; line breaks inside
//!   user text never start a new layout line.

use crate::model::link::link_origin;
use crate::model::section::{Document, Section};
use std::error::Error;
use std::fmt::{Display, Formatter, Write as _};
use std::path::{Path, PathBuf};

/// File name of the export artifact.
pub const EXPORT_FILE_NAME: &str = "notes.txt";
/// Document-level message when export is refused.
pub const MISSING_TITLE_MESSAGE: &str = "One or more sections are missing a Title.";

/// Reasons an export produced no artifact.
#[derive(Debug)]
pub enum ExportError {
    /// Sections at these indices have blank subjects.
    MissingTitles { section_indices: Vec<usize> },
    /// The artifact could not be written.
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTitles { .. } => f.write_str(MISSING_TITLE_MESSAGE),
            Self::Io(err) => write!(f, "failed to write export: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::MissingTitles { .. } => None,
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Indices of sections whose subject is blank after trimming.
pub fn missing_title_indices(document: &Document) -> Vec<usize> {
    document
        .sections
        .iter()
        .enumerate()
        .filter(|(_, section)| section.is_missing_title())
        .map(|(index, _)| index)
        .collect()
}

/// Renders the plain-text report.
///
/// # Errors
/// - `MissingTitles` when any section has a blank subject; nothing is
///   rendered in that case.
pub fn render_report(document: &Document) -> Result<String, ExportError> {
    let section_indices = missing_title_indices(document);
    if !section_indices.is_empty() {
        return Err(ExportError::MissingTitles { section_indices });
    }

    let blocks: Vec<String> = document.sections.iter().map(render_section).collect();
    Ok(blocks.join("\n"))
}

fn render_section(section: &Section) -> String {
    let mut block = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(block, "Title: {}", flatten_line(&section.subject));
    let _ = writeln!(block, "Notes: {}", indent_continuation(&section.notes));
    block.push_str("Links:\n");
    if section.links.is_empty() {
        block.push_str("- (none)\n");
    }
    for link in &section.links {
        let origin = link_origin(link);
        if origin.is_empty() {
            let _ = writeln!(block, "- {link}");
        } else {
            let _ = writeln!(block, "- {link} ({origin})");
        }
    }
    block
}

/// Joins all lines of `text` with single spaces.
fn flatten_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keeps multi-line notes readable: continuation lines are indented so they
/// cannot be mistaken for `Title:`/`Notes:`/`Links:` lines.
fn indent_continuation(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join("\n  ")
}

/// Writes `report` to `dir/notes.txt`, replacing an older export.
pub fn write_report(dir: &Path, report: &str) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(EXPORT_FILE_NAME);
    std::fs::write(&path, report)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::{missing_title_indices, render_report, write_report, ExportError};
    use crate::model::section::{Document, Section};

    #[test]
    fn refuses_when_any_title_is_blank() {
        let document = Document::with_sections(vec![
            Section::new("A", "x"),
            Section::new("", "y"),
            Section::new("  ", "z"),
        ]);
        assert_eq!(missing_title_indices(&document), vec![1, 2]);

        match render_report(&document) {
            Err(ExportError::MissingTitles { section_indices }) => {
                assert_eq!(section_indices, vec![1, 2]);
            }
            other => panic!("unexpected export result: {other:?}"),
        }
    }

    #[test]
    fn renders_blocks_in_order_with_origins() {
        let document = Document::with_sections(vec![
            Section::new("Reading", "weekend list")
                .with_links(["https://foo.com/x", "http://localhost:3000/a"]),
            Section::new("Empty", ""),
        ]);

        let report = render_report(&document).unwrap();
        assert_eq!(
            report,
            "Title: Reading\n\
             Notes: weekend list\n\
             Links:\n\
             - https://foo.com/x (https://foo.com)\n\
             - http://localhost:3000/a (http://localhost:3000)\n\
             \n\
             Title: Empty\n\
             Notes: \n\
             Links:\n\
             - (none)\n"
        );
    }

    #[test]
    fn multi_line_text_cannot_break_block_layout() {
        let document = Document::with_sections(vec![Section::new(
            "A\nTitle: injected\r\n",
            "first\nLinks:\nlast",
        )]);

        let report = render_report(&document).unwrap();
        assert_eq!(
            report,
            "Title: A Title: injected\n\
             Notes: first\n  Links:\n  last\n\
             Links:\n\
             - (none)\n"
        );
        assert_eq!(report.matches("\nTitle:").count(), 0);
        assert_eq!(
            report.lines().filter(|line| line.starts_with("Links:")).count(),
            1
        );
    }

    #[test]
    fn keeps_links_without_origin() {
        let document =
            Document::with_sections(vec![Section::new("Legacy", "").with_links(["not a url"])]);
        let report = render_report(&document).unwrap();
        assert!(report.contains("- not a url\n"));
    }

    #[test]
    fn write_report_creates_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&dir.path().join("out"), "Title: A\n").unwrap();
        assert!(path.ends_with("notes.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Title: A\n");
    }
}
