//! Command dispatcher.

use session_core::Session;
use tracing::{debug, info};

use crate::actions::{ActionConfig, ActionSet};
use crate::allowed::AllowedUsers;
use crate::command::Command;
use crate::error::DispatchError;
use crate::reply::ReplyChannel;

/// Maps authorized private messages to actions.
///
/// Every invocation runs its action; repeated commands are not merged or
/// deduplicated.
pub struct CommandDispatcher {
    allowed: AllowedUsers,
    actions: ActionSet,
}

impl CommandDispatcher {
    pub fn new(allowed: AllowedUsers, actions: ActionSet) -> Self {
        Self { allowed, actions }
    }

    /// Create a dispatcher with default action tunables.
    pub fn with_defaults(allowed: AllowedUsers) -> Self {
        Self::new(allowed, ActionSet::new(ActionConfig::default()))
    }

    pub fn allowed(&self) -> &AllowedUsers {
        &self.allowed
    }

    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }

    /// Handle one private message and return the reply text.
    ///
    /// Returns `None`, with no side effect, when the sender is not allowed
    /// or the body is not a known command.
    pub async fn handle<S: Session + ?Sized>(
        &self,
        session: &S,
        sender: &str,
        body: &str,
    ) -> Option<String> {
        if !self.allowed.contains(sender) {
            debug!("Ignoring message from unauthorized sender {}", sender);
            return None;
        }

        let Some(command) = Command::parse(body) else {
            debug!("Ignoring unknown command from {}: {:?}", sender, body);
            return None;
        };

        info!("Executing {} for {}", command, sender);
        Some(self.execute(session, sender, command).await)
    }

    /// Handle a message and deliver the reply on `channel`.
    pub async fn respond<S: Session + ?Sized>(
        &self,
        session: &S,
        sender: &str,
        body: &str,
        channel: &ReplyChannel,
    ) -> Result<Option<String>, DispatchError> {
        let Some(reply) = self.handle(session, sender, body).await else {
            return Ok(None);
        };
        channel.deliver(session, &reply).await?;
        Ok(Some(reply))
    }

    async fn execute<S: Session + ?Sized>(
        &self,
        session: &S,
        sender: &str,
        command: Command,
    ) -> String {
        match command {
            Command::Tp => self.actions.double_click_nearest(session).await,
            Command::Kill => self.actions.execute_privileged(session).await,
            Command::StartFollow => self.actions.start_follow(session, sender).await,
            Command::StopFollow => self.actions.stop_follow(session).await,
        }
    }
}
