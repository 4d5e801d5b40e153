//! Connection lifecycle state machine.
//!
//! ```text
//! Idle ──start──▶ Connecting ──spawn──▶ Active
//!                     ▲                   │
//!                     │ reconnect fires   │ end of stream
//!                     │                   ▼
//!                     └────────────── Disconnected
//! ```
//!
//! This type only decides; the supervisor owns the actual timers.

use std::fmt;
use std::time::Duration;

use crate::backoff::{Backoff, BackoffConfig};

/// Where the supervised connection currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Active,
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Active => "active",
            Self::Disconnected => "disconnected",
        };
        f.write_str(s)
    }
}

/// Connection state plus the process-wide reconnect bookkeeping.
///
/// At most one reconnect may be pending; `reconnect_pending` is set when
/// one is scheduled and cleared only when it fires.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: ConnectionState,
    backoff: Backoff,
    reconnect_pending: bool,
}

impl Lifecycle {
    pub fn new(backoff: BackoffConfig) -> Self {
        Self {
            state: ConnectionState::Idle,
            backoff: Backoff::new(backoff),
            reconnect_pending: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_pending
    }

    /// A connection attempt is starting.
    pub fn begin_connect(&mut self) {
        self.state = ConnectionState::Connecting;
    }

    /// Login succeeded.
    pub fn on_login(&mut self) {
        self.backoff.reset();
    }

    /// The player spawned; the session is active.
    pub fn on_spawn(&mut self) {
        self.state = ConnectionState::Active;
        self.backoff.reset();
    }

    /// The connection ended. Returns the delay for a newly scheduled
    /// reconnect, or `None` if one is already pending.
    pub fn on_disconnect(&mut self) -> Option<Duration> {
        self.state = ConnectionState::Disconnected;
        if self.reconnect_pending {
            return None;
        }
        self.reconnect_pending = true;
        Some(self.backoff.next_delay())
    }

    /// The pending reconnect timer fired.
    pub fn on_reconnect_fired(&mut self) {
        self.reconnect_pending = false;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new(BackoffConfig::default())
    }
}
