//! Error types for the presence bot.

use game_bridge::BridgeError;
use thiserror::Error;

/// A setting read from the environment could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The value is present but does not parse.
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// The value parses but is outside what the bot accepts.
    #[error("{key} out of range: {reason}")]
    OutOfRange { key: &'static str, reason: String },
}

/// Errors that stop the bot.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// The command worker exited while the supervisor was still running.
    #[error("command worker stopped unexpectedly: {0}")]
    WorkerStopped(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BotConfig;

    fn load(value: &str) -> Result<BotConfig, BotError> {
        let config = BotConfig::from_lookup(|key| {
            (key == "BOT_BACKOFF_BASE_MS").then(|| value.to_string())
        })?;
        Ok(config)
    }

    #[test]
    fn test_config_error_stops_the_bot() {
        let err = load("soon").unwrap_err();
        assert!(matches!(err, BotError::Config(ConfigError::Invalid { .. })));
        assert!(err.to_string().starts_with("configuration error: "));
    }

    #[test]
    fn test_bridge_error_display() {
        let err = BotError::from(BridgeError::HealthCheckFailed);
        assert!(err.to_string().starts_with("bridge error: "));
    }
}
