use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrepperError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Pattern(#[from] regex::Error),

    #[error("Invalid glob '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("cannot read {path}: {source}")]
    UnreadableEntry {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start rg: {0}")]
    BackendUnavailable(String),

    #[error("An unexpected error occurred: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GrepperError>;
