//! Error types for the page tree transducer.

use thiserror::Error;

/// Result type for page tree operations.
pub type Result<T> = std::result::Result<T, PageTreeError>;

/// Errors surfaced by the library entry points. Individual malformed values
/// never fail a parse; they fall back to defaults instead.
#[derive(Error, Debug)]
pub enum PageTreeError {
    /// The document has no element tagged as the content root.
    #[error("no ContentNode found in document")]
    MissingContentRoot,

    /// Embedded or supplied styleguide JSON could not be read.
    #[error("invalid styleguide data: {0}")]
    Styleguide(#[source] serde_json::Error),

    /// The finished tree could not be serialized.
    #[error("failed to serialize page tree: {0}")]
    Serialize(#[from] serde_json::Error),
}
