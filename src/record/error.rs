use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or decoding records
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON in {path} at line {line}: {source}")]
    Json {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("Record at line {line} of {path} is not a JSON object")]
    NotAnObject { path: PathBuf, line: usize },
}
