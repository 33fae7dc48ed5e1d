//! Indexer type definitions.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexerError {
    /// Invalid include or exclude pattern
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
    /// The workspace root does not exist or is not a directory
    #[error("Workspace not found: {0}")]
    InvalidPath(String),
}
