//! Signals emitted by a live session.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Device-code prompt for interactive account authentication.
///
/// This is informational: the operator opens the URI and types the code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceCode {
    pub verification_uri: String,
    pub user_code: String,
    /// Seconds until the code expires.
    #[serde(default)]
    pub expires_in: u64,
}

impl DeviceCode {
    /// Whole minutes until expiry, rounded to nearest.
    pub fn expires_in_minutes(&self) -> u64 {
        (self.expires_in + 30) / 60
    }
}

/// A lifecycle or text signal from the session collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Authentication and login succeeded.
    Login,
    /// The player entity spawned in the world; the session is active.
    Spawn,
    /// The server kicked us.
    Kicked { reason: Value, logged_in: bool },
    /// Raw kick packet received before login completed.
    KickPacket(Value),
    /// Socket or protocol error. An `End` normally follows.
    Error(String),
    /// The connection stream ended.
    End { reason: Option<String> },
    /// Action-bar text.
    ActionBar(String),
    /// Chat or system message rendered to plain text.
    Message(String),
    /// Direct message pre-parsed by the collaborator.
    Whisper { sender: String, body: String },
    /// Device-code authentication prompt.
    DeviceCode(DeviceCode),
}

impl SessionEvent {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Spawn => "spawn",
            Self::Kicked { .. } => "kicked",
            Self::KickPacket(_) => "kick_disconnect",
            Self::Error(_) => "error",
            Self::End { .. } => "end",
            Self::ActionBar(_) => "actionBar",
            Self::Message(_) => "message",
            Self::Whisper { .. } => "whisper",
            Self::DeviceCode(_) => "msaCode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_code_minutes() {
        let code = DeviceCode {
            verification_uri: "https://microsoft.com/link".to_string(),
            user_code: "ABCD1234".to_string(),
            expires_in: 900,
        };
        assert_eq!(code.expires_in_minutes(), 15);
    }

    #[test]
    fn test_device_code_deserialize_without_expiry() {
        let json = r#"{"verification_uri": "https://x", "user_code": "C0DE"}"#;
        let code: DeviceCode = serde_json::from_str(json).unwrap();
        assert_eq!(code.user_code, "C0DE");
        assert_eq!(code.expires_in, 0);
    }

    #[test]
    fn test_event_kind() {
        assert_eq!(SessionEvent::End { reason: None }.kind(), "end");
        assert_eq!(
            SessionEvent::Kicked {
                reason: Value::String("bye".into()),
                logged_in: true
            }
            .kind(),
            "kicked"
        );
    }
}
