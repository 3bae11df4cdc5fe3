//! Error types for OpenNMS client operations.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A comparator, operator or nesting level the target protocol cannot express.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Filter-wide settings the target protocol can only carry once.
    #[error("Inconsistent filter: {0}")]
    Inconsistent(String),

    #[error("Invalid restriction: {0}")]
    InvalidRestriction(String),

    #[error("Invalid server version: {0}")]
    InvalidVersion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No server configured: {0} does not exist")]
    NotConfigured(PathBuf),

    #[error("Metadata error: {0}")]
    Metadata(String),
}

pub type Result<T> = std::result::Result<T, Error>;
