//! Error types for Spark

use thiserror::Error;

/// The main error type for Spark operations
#[derive(Debug, Error)]
pub enum SparkError {
    /// A user-supplied hook (update, draw, force or emission callback) failed.
    #[error("Callback failed on {entity}: {message}")]
    Callback { entity: String, message: String },

    #[error("Unknown force algorithm: {0}")]
    UnknownForce(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl SparkError {
    /// Convenience constructor for hook failures
    pub fn callback(entity: impl Into<String>, message: impl Into<String>) -> Self {
        SparkError::Callback {
            entity: entity.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for Spark operations
pub type Result<T> = std::result::Result<T, SparkError>;
