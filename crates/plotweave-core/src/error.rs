//! Error types for the plotweave engine

use thiserror::Error;

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Main error type for the narrative engine and its collaborators
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    /// Input rejected before any I/O was attempted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network-level failure (connect, read, stream interruption)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response; `message` is already normalized for display
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Body could not be parsed where a structured value was required
    #[error("Malformed response: {body}")]
    Parse { body: String },

    /// Session persistence failure
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl EngineError {
    /// Create a new invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a new transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a new HTTP error with a display-ready message
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a new parse error carrying the offending body
    pub fn parse(body: impl Into<String>) -> Self {
        Self::Parse { body: body.into() }
    }

    /// Create a new store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

impl From<anyhow::Error> for EngineError {
    fn from(error: anyhow::Error) -> Self {
        Self::Config(error.to_string())
    }
}
