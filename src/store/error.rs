//! Error types for metadata table operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur loading or saving the metadata table.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File system error (open, create, rename).
    #[error("IO error on metadata file {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a readable metadata table, or a row failed
    /// to encode.
    #[error("malformed metadata table {path}: {source}\n  Suggestion: fix the file or move it aside")]
    Csv {
        /// The file involved.
        path: PathBuf,
        /// The underlying CSV error.
        #[source]
        source: csv::Error,
    },
}

impl StoreError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a CSV error.
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}
