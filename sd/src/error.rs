//! Style database error types

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StyleError>;

/// Errors raised while loading or saving styles
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Failed to read styles from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed styles file {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Styles file {path} has no '{column}' column (row {row})")]
    MissingColumn {
        path: PathBuf,
        column: &'static str,
        row: u64,
    },

    #[error("Failed to back up {path}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write styles to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
