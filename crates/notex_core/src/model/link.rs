//! Link validation and origin extraction.
//!
//! # Responsibility
//! - Decide whether user input may enter a section's `links`.
//! - Derive the `scheme://host` origin shown next to links in exports.
//!
//! # Invariants
//! - Accepted links are the trimmed input, byte-for-byte.
//! - A link is accepted only when it parses as an absolute URL and the typed
//!   text carries `scheme://` followed by a host.
//! - Origin extraction never fails; unparseable input yields `""`.

use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;

/// Message shown when the link input is blank.
pub const EMPTY_LINK_MESSAGE: &str = "You must add a link";
/// Message shown when the link input is not an absolute URL.
pub const INVALID_LINK_MESSAGE: &str = "Please enter a valid URL";

/// Reason a candidate link was rejected.
///
/// `Display` renders the user-facing section message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkValidationError {
    /// Input was empty after trimming.
    Empty,
    /// Input is not an absolute URL with scheme and authority.
    Invalid,
}

impl LinkValidationError {
    /// User-facing message for this rejection.
    pub fn message(self) -> &'static str {
        match self {
            Self::Empty => EMPTY_LINK_MESSAGE,
            Self::Invalid => INVALID_LINK_MESSAGE,
        }
    }

    /// Stable label used in log events.
    pub fn code(self) -> &'static str {
        match self {
            Self::Empty => "link_empty",
            Self::Invalid => "link_invalid",
        }
    }
}

impl Display for LinkValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for LinkValidationError {}

/// Validates a raw link candidate and returns the value to store.
///
/// # Errors
/// - `Empty` when the trimmed input is empty.
/// - `Invalid` when the trimmed input has no scheme, no `//` authority
///   marker, or no host.
pub fn validate_link(raw: &str) -> Result<String, LinkValidationError> {
    let candidate = raw.trim();
    if candidate.is_empty() {
        return Err(LinkValidationError::Empty);
    }

    match Url::parse(candidate) {
        Ok(parsed)
            if has_authority_marker(candidate, parsed.scheme())
                && parsed.host_str().is_some_and(|host| !host.is_empty()) =>
        {
            Ok(candidate.to_string())
        }
        _ => Err(LinkValidationError::Invalid),
    }
}

// The parser repairs `http:host` and `https:/host` for special schemes; the
// typed text itself must carry `scheme://`.
fn has_authority_marker(candidate: &str, scheme: &str) -> bool {
    candidate
        .get(scheme.len()..)
        .is_some_and(|rest| rest.starts_with("://"))
}

/// Returns the origin (`scheme://host[:port]`) of `link`, or `""` when the
/// link does not parse or has an opaque origin.
///
/// Internationalized hosts are rendered in Unicode, matching what was typed.
pub fn link_origin(link: &str) -> String {
    let Ok(parsed) = Url::parse(link.trim()) else {
        return String::new();
    };
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return String::new();
    }
    origin.unicode_serialization()
}
