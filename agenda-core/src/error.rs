//! Error types for the agenda client.

use thiserror::Error;

/// Errors that can occur while talking to the backend or local storage.
#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with `ok: false`. The message is meant for the user.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response from backend: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AgendaError {
    /// Text shown to the user when this error ends a session attempt.
    pub fn user_message(&self) -> String {
        match self {
            AgendaError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for agenda operations.
pub type AgendaResult<T> = Result<T, AgendaError>;
