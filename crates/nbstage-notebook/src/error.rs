//! Notebook error types.

use std::path::PathBuf;

/// Error loading or writing a notebook.
#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    /// I/O error reading or writing the notebook file.
    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        /// Path of the notebook file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not a valid notebook (malformed JSON or missing
    /// required fields). No partial notebook is returned.
    #[error("invalid notebook format: {0}")]
    Format(#[from] serde_json::Error),
}
