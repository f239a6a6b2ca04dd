use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by the cleaning stage. All of them abort the stage.
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{file}: required column '{column}' is missing")]
    MissingColumn { file: String, column: String },
    #[error("{file} line {line}: malformed row: {message}")]
    Malformed {
        file: String,
        line: u64,
        message: String,
    },
    #[error("{file} line {line}: column '{column}' has unparseable date '{value}'")]
    InvalidDate {
        file: String,
        line: u64,
        column: String,
        value: String,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
