//! Error types for tabsolve core.

use tabsolve_engine::engine::GridError;
use thiserror::Error;

/// Errors that can occur while loading, editing or saving a table.
#[derive(Error, Debug)]
pub enum TabsolveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Invalid cell reference: {0}")]
    InvalidCellRef(String),

    #[error("Cell input cannot contain {0:?}")]
    InvalidInput(char),

    #[error("No file path set")]
    NoFilePath,
}

pub type Result<T> = std::result::Result<T, TabsolveError>;
