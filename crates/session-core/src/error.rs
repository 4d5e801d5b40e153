//! Error types for session collaborators.

use thiserror::Error;

/// Errors that can occur when talking to the session collaborator.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Establishing the connection failed.
    #[error("connect failed: {0}")]
    Connect(String),

    /// The session is no longer usable (ended or replaced).
    #[error("session closed")]
    Closed,

    /// The collaborator rejected or failed an outbound operation.
    #[error("{operation} failed: {message}")]
    Operation { operation: String, message: String },

    /// Transport-level failure between the bot and the collaborator.
    #[error("transport error: {0}")]
    Transport(String),

    /// Invalid connect options or collaborator configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl SessionError {
    /// Create an operation failure.
    pub fn operation(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Operation {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
