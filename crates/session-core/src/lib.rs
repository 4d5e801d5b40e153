//! Core traits and types for game session collaborators.
//!
//! The presence bot never speaks the game protocol itself. Login, entity
//! tracking, packet transport and path planning belong to an external
//! collaborator, consumed through the narrow contract defined here:
//!
//! - [`Connector`] - Opens a new [`Session`] plus its event stream
//! - [`Session`] - Outbound operations on one live connection
//! - [`SessionEvent`] - Lifecycle and text signals emitted by a session
//! - [`SessionError`] - Error type shared by all collaborator calls
//!
//! # Example
//!
//! ```rust
//! use session_core::{BlockPos, Vec3};
//!
//! let feet = Vec3::new(10.7, 64.0, -3.2);
//! assert_eq!(feet.floored(), BlockPos::new(10, 64, -4));
//! ```

mod error;
mod event;
mod geometry;
mod movement;
mod options;
mod trait_def;

pub use error::SessionError;
pub use event::{DeviceCode, SessionEvent};
pub use geometry::{Block, BlockPos, Entity, Vec3};
pub use movement::{Goal, MovementPolicy};
pub use options::{AuthMode, ConnectOptions};
pub use trait_def::{Connection, Connector, EventStream, Session};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
