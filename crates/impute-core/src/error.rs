//! Error types for impute-core

use thiserror::Error;

use impute_names::NameError;

/// Result type alias for disambiguation operations
pub type Result<T> = std::result::Result<T, ImputeError>;

/// Main error type for disambiguation operations
#[derive(Error, Debug)]
pub enum ImputeError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Corpus loading errors
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// Name parsing errors
    #[error("Name error: {0}")]
    Name(#[from] NameError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML parse failure
    #[error("Parse error: {0}")]
    Parse(String),

    /// Threshold outside the open-closed unit interval
    #[error("Threshold '{name}' must be within (0, 1], got {value}")]
    InvalidThreshold { name: String, value: f64 },

    /// Likelihood that would admit a zero posterior denominator
    #[error("Likelihood '{name}' must be positive, got {value}")]
    InvalidLikelihood { name: String, value: f64 },

    /// Empty likelihood table
    #[error("Likelihood table '{0}' must not be empty")]
    EmptyTable(String),

    /// Match and non-match tables of different lengths
    #[error("Coauthor tables must have equal lengths, got {match_len} and {nonmatch_len}")]
    TableLengthMismatch { match_len: usize, nonmatch_len: usize },

    /// Expected author population of zero
    #[error("Expected author count must be positive")]
    ZeroExpectedAuthors,
}

/// Corpus-specific errors
#[derive(Error, Debug)]
pub enum CorpusError {
    /// No usable mentions survived loading
    #[error("Corpus contains no usable mentions")]
    Empty,
}

impl From<std::io::Error> for ImputeError {
    fn from(err: std::io::Error) -> Self {
        ImputeError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ImputeError {
    fn from(err: toml::de::Error) -> Self {
        ImputeError::Config(ConfigError::Parse(err.to_string()))
    }
}
