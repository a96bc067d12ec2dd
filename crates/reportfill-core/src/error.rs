//! Error types for the report filling pipeline.

use thiserror::Error;

/// Error conditions surfaced by the filling pipeline and its collaborators.
///
/// Anchor misses inside the fill engine are never errors — every fill step
/// degrades to a silent skip when its anchor text is absent (see the `fill`
/// module). These variants cover the structural and I/O failures that must
/// reach the caller.
#[derive(Error, Debug)]
pub enum FillError {
    /// File I/O failure reading a template, asset, or data file, or
    /// writing an output document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in the weekly data file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The template package is missing a required part or its XML cannot
    /// be parsed.
    #[error("Template error: {0}")]
    Template(String),

    /// The signature asset is unreadable or not a supported image format.
    #[error("Asset error: {0}")]
    Asset(String),

    /// A document-to-PDF conversion or PDF merge step failed.
    #[error("Conversion error: {0}")]
    Convert(String),
}

/// Type alias for [`Result<T, FillError>`].
pub type Result<T> = std::result::Result<T, FillError>;
