//! The fixed command vocabulary.

use std::fmt;

/// Greeting sent to public chat after every spawn.
pub const GREETING: &str = "Ready. Commands: tp, kill, startfollow, stopfollow.";

/// A command an allowed user can whisper to the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Double-click the nearest interactable block.
    Tp,
    /// Issue the privileged chat command.
    Kill,
    /// Follow the requesting user.
    StartFollow,
    /// Stop following.
    StopFollow,
}

impl Command {
    pub const ALL: [Command; 4] = [Self::Tp, Self::Kill, Self::StartFollow, Self::StopFollow];

    /// Parse a raw message body. Surrounding whitespace and case are
    /// ignored; anything else must match exactly.
    pub fn parse(body: &str) -> Option<Self> {
        let normalized = body.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|command| command.as_str() == normalized)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tp => "tp",
            Self::Kill => "kill",
            Self::StartFollow => "startfollow",
            Self::StopFollow => "stopfollow",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
