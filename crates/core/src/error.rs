//! Error types for the grounded workspace.
//!
//! A single error enum covers configuration, I/O, generation, embedding,
//! knowledge (ingestion/indexing), prompt and serialization failures.
//! Citation problems are deliberately absent: they are reported as
//! validation results, not errors.

use thiserror::Error;

/// Unified error type.
///
/// Every fallible function in the workspace returns `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid configuration (rejected before any work starts)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generation collaborator errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Embedding collaborator errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Ingestion and index errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt loading and rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
