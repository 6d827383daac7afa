//! Error types for the churnwatch runtime
//!
//! Every failure is attributed to a stage (artifact load, input, encode,
//! predict) so a blocked prediction always reports where the contract
//! broke. No error path produces a fallback probability.

use thiserror::Error;

/// Main error type for the churnwatch system
#[derive(Error, Debug)]
pub enum ChurnError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Artifact load failed: {artifact} - {message}")]
    ArtifactLoad { artifact: String, message: String },

    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Input stage: a numeric field failed validation before encoding.
    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    /// Encode stage: a categorical value the fitted encoder has never seen.
    /// The trained model has no "unknown" column, so this is fatal.
    #[error("Encode failed: unknown category for {field}: {value:?}")]
    UnknownCategory { field: String, value: String },

    /// Encode stage: merged row and declared classifier schema disagree.
    #[error("Encode failed: schema mismatch - {detail}")]
    SchemaMismatch { detail: String },

    /// Encode stage: an encoder output column collides with a retained one.
    #[error("Encode failed: duplicate feature column {column}")]
    MergeCollision { column: String },

    #[error("Predict failed: {message}")]
    Predict { message: String },
}

/// Type alias for Result with ChurnError
pub type ChurnResult<T> = Result<T, ChurnError>;

impl ChurnError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an artifact load error
    pub fn artifact(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArtifactLoad {
            artifact: artifact.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create an invalid-input error
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an unknown-category error
    pub fn unknown_category(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnknownCategory {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a schema mismatch error
    pub fn schema_mismatch(detail: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            detail: detail.into(),
        }
    }

    /// Create a merge collision error
    pub fn merge_collision(column: impl Into<String>) -> Self {
        Self::MergeCollision {
            column: column.into(),
        }
    }

    /// Create a predict stage error
    pub fn predict(message: impl Into<String>) -> Self {
        Self::Predict {
            message: message.into(),
        }
    }
}

/// Convert from serde_json errors
impl From<serde_json::Error> for ChurnError {
    fn from(err: serde_json::Error) -> Self {
        ChurnError::serialization("json_operation", err)
    }
}

/// Convert from std::io errors
impl From<std::io::Error> for ChurnError {
    fn from(err: std::io::Error) -> Self {
        ChurnError::io("io_operation", err)
    }
}
