//! Presence bot: holds a place on a game server indefinitely.
//!
//! The [`ConnectionSupervisor`] connects through any
//! [`Connector`](session_core::Connector), reconnects with capped exponential
//! backoff when the session ends, tracks the login queue, keeps the player
//! active, and hands whispered commands to the
//! [`CommandDispatcher`](command_dispatcher::CommandDispatcher).
//!
//! ```rust,no_run
//! use presence_bot::{BotConfig, ConnectionSupervisor};
//!
//! # async fn example() -> Result<(), presence_bot::BotError> {
//! let config = BotConfig::from_env()?;
//! let supervisor = ConnectionSupervisor::from_config(&config)?;
//! supervisor.run().await?;
//! # Ok(())
//! # }
//! ```

mod backoff;
mod config;
mod dedup;
mod error;
mod lifecycle;
mod supervisor;

pub use backoff::{Backoff, BackoffConfig};
pub use config::{BotConfig, SupervisorConfig, DUPLICATE_WHISPER_WINDOW};
pub use dedup::{WhisperDedup, WhisperPath};
pub use error::{BotError, ConfigError};
pub use lifecycle::{ConnectionState, Lifecycle};
pub use supervisor::ConnectionSupervisor;
