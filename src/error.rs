//! Conversion error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while converting a fitted scaler into a scaling profile.
///
/// Every variant is fatal for the invocation. Nothing is retried.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Source path missing, unreadable or not decodable as a scaler
    #[error("failed to read scaler from {path}: {reason}")]
    SourceRead { path: PathBuf, reason: String },

    /// A vector does not have the expected number of entries
    #[error("{field} has {actual} entries, expected {expected}")]
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A parameter cannot be represented in the output document
    #[error("{field}[{index}] is not finite ({value})")]
    NonFiniteParameter {
        field: &'static str,
        index: usize,
        value: f64,
    },

    /// Operator feature-name list could not be read
    #[error("failed to read feature list from {path}: {reason}")]
    FeatureList { path: PathBuf, reason: String },

    /// Invalid converter configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O failure while writing the destination
    #[error("failed to write {path}: {source}")]
    DestinationWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Written profile could not be read back
    #[error("failed to read back profile {path}: {reason}")]
    ReadBack { path: PathBuf, reason: String },

    #[error("invalid profile JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Written document differs from the in-memory profile
    #[error("verification failed: {0}")]
    VerifyMismatch(String),
}

impl From<::config::ConfigError> for ConvertError {
    fn from(err: ::config::ConfigError) -> Self {
        ConvertError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
