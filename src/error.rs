//! Error types for memristor-synapse

use thiserror::Error;

/// Result type alias for device and synapse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or driving devices
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Caller passed a value outside the accepted set (unknown policy,
    /// unknown quantity, non-finite adjustment or voltage).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Device bounds or law coefficients that cannot describe a device.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
