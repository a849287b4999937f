// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogbookError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database Error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error in {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Editor exited with a non-zero status")]
    EditorError,

    #[error("Log service has shut down")]
    ServiceClosed,
}

pub type Result<T> = std::result::Result<T, LogbookError>;
