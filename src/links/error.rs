// src/links/error.rs
// =============================================================================
// Errors produced by the link engine.
//
// Every variant is recoverable: the caller reports the message and the
// session keeps going. The application layer (main.rs) wraps these in
// anyhow::Error when it needs to bubble them up with `?`.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// Extraction was attempted on blank or whitespace-only input
    #[error("The document is empty. Paste or load some HTML first.")]
    EmptyInput,

    /// The anchor pattern matched nothing
    #[error("No links found in the provided HTML.")]
    NoLinksFound,

    /// A replacement main link is not a well-formed absolute URL
    #[error("Invalid URL '{value}': {reason}")]
    InvalidUrlEdit { value: String, reason: String },

    /// A link index outside the current link list. Stored 0-based, shown 1-based.
    #[error("There is no link #{}", .0 + 1)]
    UnknownLink(usize),
}
