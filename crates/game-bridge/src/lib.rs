//! Bridge daemon client library.
//!
//! The game protocol itself is handled by a separate headless client
//! process (the "bridge"). This crate talks to it over HTTP and exposes it
//! as a [`session_core::Connector`]:
//!
//! - Opening sessions and issuing world operations via JSON-RPC
//! - Receiving lifecycle and text signals via Server-Sent Events (SSE)
//! - Health checking
//!
//! # Example
//!
//! ```no_run
//! use game_bridge::{BridgeConfig, BridgeConnector};
//! use session_core::{ConnectOptions, Connector, Session};
//! use futures::StreamExt;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connector = BridgeConnector::new(BridgeConfig::default())?;
//! let mut connection = connector.connect(&ConnectOptions::default()).await?;
//!
//! while let Some(event) = connection.events.next().await {
//!     println!("{:?}", event);
//! }
//! connection.session.quit().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod connector;
pub mod error;
pub mod events;
pub mod types;

pub use client::BridgeClient;
pub use config::BridgeConfig;
pub use connector::{BridgeConnector, BridgeSession};
pub use error::BridgeError;
pub use events::{decode_event, subscribe, EventStream};
