//! Reply channels.

use session_core::{Session, SessionError};

/// Where a reply goes. Mirrors the channel the request arrived on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyChannel {
    /// Public chat line (request was recovered from chat text).
    Chat,
    /// Direct message back to the named user.
    Whisper(String),
}

impl ReplyChannel {
    /// Send `text` on this channel.
    pub async fn deliver<S: Session + ?Sized>(
        &self,
        session: &S,
        text: &str,
    ) -> Result<(), SessionError> {
        match self {
            Self::Chat => session.chat(text).await,
            Self::Whisper(username) => session.whisper(username, text).await,
        }
    }
}
