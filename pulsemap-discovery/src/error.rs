//! Error types for the discovery crate

use thiserror::Error;

/// Discovery error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Cloud provider error: {0}")]
    Provider(String),

    #[error("Unknown discovery source: {0}")]
    UnknownSource(String),
}

/// Result type for discovery operations
pub type Result<T> = std::result::Result<T, Error>;
