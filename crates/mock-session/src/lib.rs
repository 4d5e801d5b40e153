//! Mock session collaborators for presence bot tests.
//!
//! - [`MockSession`] - Scripted world state that records every outbound call
//! - [`MockConnector`] - Hands out a fresh `MockSession` per connect and
//!   gives the test a [`MockHandle`] to push events into it
//!
//! # Example
//!
//! ```rust
//! use mock_session::{Call, MockSession};
//! use session_core::{BlockPos, Session, Vec3};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let session = MockSession::new()
//!     .with_position(Vec3::new(0.5, 64.0, 0.5))
//!     .with_block("lever", BlockPos::new(1, 64, 0));
//!
//! session.chat("hello").await.unwrap();
//! assert_eq!(session.calls(), vec![Call::Chat("hello".to_string())]);
//! # }
//! ```

mod connector;
mod session;

pub use connector::{MockConnector, MockHandle};
pub use session::{Call, MockSession};

// Re-export session-core types for convenience
pub use session_core::{async_trait, Connector, Session, SessionError, SessionEvent};
