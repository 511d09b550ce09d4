//! Error types for the expedition map pipeline.
//!
//! Two families are kept apart:
//!
//! - [`MapError`] is fatal to a run. It aborts before the artifact is written.
//! - [`TraceReadError`] concerns a single trace file. The aggregator turns it
//!   into a skip notice and carries on with the next file.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T, E = MapError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MapError {
    #[error("could not read table {path}")]
    TableRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("could not write table {path}")]
    TableWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("site table has no `{column}` column (looked for: {candidates})")]
    MissingColumn {
        column: &'static str,
        candidates: String,
    },

    #[error("row {row}: `{value}` in column `{column}` is not a usable coordinate")]
    InvalidCoordinate {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("no site records available to center the map")]
    NoSites,

    #[error("failed to encode map layers")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write map to {path}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration")]
    Config(#[from] config::ConfigError),
}

impl MapError {
    pub fn missing_column(column: &'static str, candidates: &[&str]) -> Self {
        Self::MissingColumn {
            column,
            candidates: candidates.join(", "),
        }
    }
}

/// Failure to load a single trace file.
#[derive(Error, Debug)]
pub enum TraceReadError {
    #[error("trace file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("could not open trace file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse trace file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl TraceReadError {
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
