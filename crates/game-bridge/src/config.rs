//! Configuration types for game-bridge.

/// Configuration for connecting to the bridge daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Base URL of the bridge HTTP server (e.g., "http://localhost:3000").
    pub base_url: String,
}

impl BridgeConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the RPC endpoint URL.
    pub fn rpc_url(&self) -> String {
        format!("{}/api/v1/rpc", self.base_url)
    }

    /// Get the events endpoint URL for one session.
    pub fn events_url(&self, session: &str) -> String {
        format!(
            "{}/api/v1/events?session={}",
            self.base_url,
            urlencoding::encode(session)
        )
    }

    /// Get the health check endpoint URL.
    pub fn check_url(&self) -> String {
        format!("{}/api/v1/check", self.base_url)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}
