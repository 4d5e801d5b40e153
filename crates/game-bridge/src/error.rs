//! Error types for game-bridge.

use session_core::SessionError;
use thiserror::Error;

/// Errors that can occur when talking to the bridge daemon.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON-RPC error response from the bridge.
    #[error("RPC error in {method} ({code}): {message}")]
    Rpc {
        method: String,
        code: i32,
        message: String,
    },

    /// Connection to the bridge failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Bridge health check failed.
    #[error("Health check failed")]
    HealthCheckFailed,

    /// SSE stream error.
    #[error("SSE error: {0}")]
    Sse(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<BridgeError> for SessionError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Rpc { method, message, .. } => SessionError::operation(method, message),
            BridgeError::Config(message) => SessionError::Configuration(message),
            BridgeError::HealthCheckFailed => {
                SessionError::Connect("bridge health check failed".to_string())
            }
            other => SessionError::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_maps_to_operation() {
        let err: SessionError = BridgeError::Rpc {
            method: "activateBlock".to_string(),
            code: -32000,
            message: "too far".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "activateBlock failed: too far");
    }

    #[test]
    fn test_config_error_maps_to_configuration() {
        let err: SessionError = BridgeError::Config("bad url".to_string()).into();
        assert!(matches!(err, SessionError::Configuration(_)));
    }

    #[test]
    fn test_sse_error_maps_to_transport() {
        let err: SessionError = BridgeError::Sse("reset".to_string()).into();
        assert!(matches!(err, SessionError::Transport(_)));
    }
}
