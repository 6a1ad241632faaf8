// file: src/error.rs
// version: 1.0.0
// guid: 3f8a21c4-95d0-4b7e-a1c2-6d9e08b4f712

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, SubmitAgentError>;

/// Error types for the AML submit agent
#[derive(Error, Debug)]
pub enum SubmitAgentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Process '{command}' failed (exit code {exit_code:?}): {stderr}")]
    ProcessError {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Azure authentication error: {0}")]
    AuthError(String),

    #[error("Azure REST error ({status}): {body}")]
    RestError { status: u16, body: String },

    #[error("Job submission error: {0}")]
    SubmissionError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SubmitAgentError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a new authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::AuthError(msg.into())
    }

    /// Create a new submission error
    pub fn submission(msg: impl Into<String>) -> Self {
        Self::SubmissionError(msg.into())
    }

    /// Create a new storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }
}
