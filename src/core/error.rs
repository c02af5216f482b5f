//! Error types for the editing core and its front end.
//!
//! Only resource failures live here. Invariant violations panic, and
//! no-match outcomes (search miss, motion at a document edge) are plain
//! `Option`/`bool` values.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No file name set for buffer")]
    NoPath,

    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error("{0}")]
    Cli(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

impl EditorError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        EditorError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;
