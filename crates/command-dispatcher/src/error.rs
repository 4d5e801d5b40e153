//! Error types for command dispatch.

use session_core::SessionError;
use thiserror::Error;

/// Errors that can occur while dispatching a command.
///
/// Action failures never show up here; they are turned into reply text.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The reply could not be delivered.
    #[error("reply failed: {0}")]
    Reply(#[from] SessionError),

    /// The command worker has shut down.
    #[error("command queue closed")]
    QueueClosed,
}
