//! Error types for co-output.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing exports and history.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{path} does not have the merged-stats header (found {found:?})")]
    Schema {
        path:  PathBuf,
        found: Vec<String>,
    },

    #[error("run {run} is already recorded at {path}")]
    RunExists {
        run:  u32,
        path: PathBuf,
    },
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
