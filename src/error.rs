//! Error types shared across the crate.

use thiserror::Error;

/// Failure raised by a graphics resource while tearing itself down.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisposeError {
    #[error("Resource '{0}' was already released")]
    AlreadyReleased(String),

    #[error("Teardown of '{resource}' failed: {reason}")]
    Failed { resource: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ConstellationError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Backend returned {status} for {endpoint}: {body}")]
    Backend {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    ConfigFormat(#[from] toml::de::Error),
}

pub type ConstellationResult<T> = Result<T, ConstellationError>;
