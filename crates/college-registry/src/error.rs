//! Error types for registry and alias file loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading registry or alias files.
///
/// Individual malformed rows are not errors; the loader skips them and
/// reports a [`SkippedEntry`](crate::SkippedEntry) instead.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid JSON, or not a JSON array.
    #[error("failed to parse JSON {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// CSV header or framing could not be read.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// File extension is neither `.json` nor `.csv`.
    #[error("unsupported file format for {path}: expected .json or .csv")]
    UnsupportedFormat { path: PathBuf },
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
