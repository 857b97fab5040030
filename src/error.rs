//! Error types for the book builder.
//!
//! Only structural failures (missing input, missing content root, malformed
//! shell document, include cycles) abort a run. A missing include target is
//! deliberately not an error: expansion substitutes a diagnostic comment and
//! logs a warning so the rest of the document still builds.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the texbind library.
#[derive(Debug, Error)]
pub enum BindError {
    /// Input document does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Content root directory does not exist or is not a directory.
    #[error("Content root not found: {}", .0.display())]
    ContentRootNotFound(PathBuf),

    /// Shell document is missing a splice anchor.
    #[error("Anchor '{0}' not found in shell document")]
    AnchorNotFound(String),

    /// Content root contains no part directory with chapter files.
    #[error("No content found under {}", .0.display())]
    NoContent(PathBuf),

    /// Include chain loops back on a file already being expanded.
    #[error("Cyclic include detected: {}", format_cycle(.chain))]
    CyclicInclude { chain: Vec<PathBuf> },

    /// Failed to read an include file that exists.
    #[error("Failed to read include {}: {source}", .path.display())]
    IncludeRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Dialect configuration file could not be parsed.
    #[error("Invalid dialect configuration: {0}")]
    DialectParse(#[from] serde_yaml_ng::Error),
}

/// Result type alias for texbind operations.
pub type Result<T> = std::result::Result<T, BindError>;

/// Render an include cycle as `a -> b -> a`.
fn format_cycle(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
