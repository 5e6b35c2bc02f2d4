//! Library error type.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read {origin}: {source}")]
    InputUnavailable {
        origin: String,
        #[source]
        source: io::Error,
    },

    #[error("struct {name} not found ({lines_scanned} lines scanned)")]
    StructNotFound { name: String, lines_scanned: usize },

    #[error("struct {name} opened at line {start_line} is not terminated (depth {depth} at line {line})")]
    UnterminatedStruct {
        name: String,
        start_line: usize,
        line: usize,
        depth: usize,
    },

    #[error("unbalanced closing brace at line {line} (depth would become {depth})")]
    DepthViolation { line: usize, depth: i64 },

    #[error("invalid LLVM version {0:?}: expected a major version number like 19")]
    InvalidVersion(String),

    #[error("download of {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("unknown option {0}")]
    UnknownOption(String),

    #[error("invalid value {value:?} for {option}: {reason}")]
    InvalidValue {
        option: String,
        value: String,
        reason: String,
    },

    #[error("formatter {program}: {reason}")]
    Formatter { program: String, reason: String },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yml::Error),
}

impl Error {
    /// Line at which a structural failure was detected, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::StructNotFound { lines_scanned, .. } => Some(*lines_scanned),
            Error::UnterminatedStruct { line, .. } | Error::DepthViolation { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }
}
