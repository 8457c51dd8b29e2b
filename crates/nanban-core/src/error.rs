use thiserror::Error;

/// Top-level error type for the Nanban system.
///
/// Only the configuration, persistence and recognition seams produce errors.
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for NanbanError` so the `?` operator works across
/// crate boundaries. None of these conditions is fatal: callers degrade to a
/// safe default (empty result, default phrase set, default config).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NanbanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Perception error: {0}")]
    Perception(String),

    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for NanbanError {
    fn from(err: toml::de::Error) -> Self {
        NanbanError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for NanbanError {
    fn from(err: toml::ser::Error) -> Self {
        NanbanError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for NanbanError {
    fn from(err: serde_json::Error) -> Self {
        NanbanError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Nanban operations.
pub type Result<T> = std::result::Result<T, NanbanError>;
