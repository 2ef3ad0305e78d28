use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HeatError>;

#[derive(Error, Debug)]
pub enum HeatError {
    #[error("Malformed log entry at line {line}: {reason}")]
    MalformedLogEntry { line: usize, reason: String },
    #[error("Unparsable count '{text}' at line {line}")]
    UnparsableCount { line: usize, text: String },
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Data unavailable in {}: {reason}", path.display())]
    DataUnavailable { path: PathBuf, reason: String },
    #[error("Process error: {0}")]
    Process(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Font error: {0}")]
    Font(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HeatError {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        HeatError::MalformedLogEntry { line, reason: reason.into() }
    }

    pub fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        HeatError::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
