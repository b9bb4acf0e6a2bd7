use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the supervision toolkit
#[derive(Error, Debug)]
pub enum RespawnError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Secret acquisition errors
    #[error("Secret file '{path}': {reason}")]
    SecretFile { path: PathBuf, reason: String },

    // Hostname resolution errors
    #[error("Cannot resolve host '{0}'")]
    HostResolution(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for RespawnError
pub type Result<T> = std::result::Result<T, RespawnError>;
