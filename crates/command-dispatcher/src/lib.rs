//! Authorization-gated command dispatch for the presence bot.
//!
//! This crate provides the [`CommandDispatcher`] which turns a private
//! message from an allowed user into exactly one world action and a reply.
//!
//! # Architecture
//!
//! ```text
//! PrivateMessage { sender, body }  (from chat-parser or the collaborator)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    COMMAND DISPATCHER                       │
//! │                                                             │
//! │  1. Drop silently unless sender is in AllowedUsers          │
//! │         ↓                                                   │
//! │  2. Trim + case-fold body, parse Command                    │
//! │     (unknown commands are dropped silently)                 │
//! │         ↓                                                   │
//! │  3. Run the action (ActionSet):                             │
//! │     • tp          → double-click nearest interactable       │
//! │     • kill        → issue the privileged chat command       │
//! │     • startfollow → follow the sender                       │
//! │     • stopfollow  → clear the navigation goal               │
//! │         ↓                                                   │
//! │  4. Deliver the reply on the channel the request came in on │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands are executed one at a time by a [`CommandQueue`] worker so a
//! slow action never stalls the connection event loop.

mod actions;
mod allowed;
mod command;
mod dispatcher;
mod error;
mod reply;
mod worker;

// Public exports
pub use actions::{ActionConfig, ActionSet, INTERACTABLE_BLOCKS};
pub use allowed::AllowedUsers;
pub use command::{Command, GREETING};
pub use dispatcher::CommandDispatcher;
pub use error::DispatchError;
pub use reply::ReplyChannel;
pub use worker::{CommandJob, CommandQueue};
