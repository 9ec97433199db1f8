//! Error types for the tooling crate.

use std::path::Path;

use techtree_core::error::CatalogError;
use thiserror::Error;

/// Result type alias using [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors raised while loading, generating or writing.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Failed to read or write a file.
    #[error("IO error on {path}: {source}")]
    Io {
        /// File or directory involved.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A catalog document is not well-formed XML.
    #[error("Malformed XML in {path}: {source}")]
    Xml {
        /// Document path.
        path: String,
        /// Underlying parser error.
        #[source]
        source: quick_xml::Error,
    },

    /// A catalog document has no root element, or the wrong one.
    #[error("Unexpected root in {path}: expected <{expected}>, found {found}")]
    UnexpectedRoot {
        /// Document path.
        path: String,
        /// Expected root element.
        expected: &'static str,
        /// What was found instead.
        found: String,
    },

    /// Failed to parse a JSON listing.
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse a RON config.
    #[error("Failed to parse config: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// Catalog resolution failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl ToolError {
    /// Wrap an IO error with the path it concerns.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
