//! Error types for impute-names

use thiserror::Error;

/// Result type alias for name operations
pub type Result<T> = std::result::Result<T, NameError>;

/// Errors from name parsing and frequency-model loading
#[derive(Error, Debug)]
pub enum NameError {
    /// No split rule matched the cleaned name string
    #[error("Cannot split '{0}' into first and last names")]
    Malformed(String),

    /// The blocking token derived from the name is too short to be usable
    #[error("Cannot create token for '{0}'")]
    Token(String),

    /// Frequency model file could not be read or decoded
    #[error("Model error: {0}")]
    Model(String),
}

impl From<serde_json::Error> for NameError {
    fn from(err: serde_json::Error) -> Self {
        NameError::Model(err.to_string())
    }
}
