//! Environment-driven configuration.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use command_dispatcher::{ActionConfig, ActionSet, AllowedUsers, CommandDispatcher, GREETING};
use game_bridge::BridgeConfig;
use session_core::{AuthMode, ConnectOptions};

use crate::backoff::BackoffConfig;
use crate::error::ConfigError;

const DEFAULT_ALLOWED_USERS: &str = "sav4da";
const DEFAULT_BRIDGE_URL: &str = "http://localhost:3000";
const DEFAULT_BACKOFF_BASE_MS: u64 = 5_000;
const DEFAULT_BACKOFF_MAX_MS: u64 = 300_000;
const DEFAULT_ACTIVITY_INTERVAL_SECS: u64 = 20;
const DEFAULT_CLICK_DELAY_MS: u64 = 200;

/// Window in which the same whisper seen on both delivery paths counts once.
pub const DUPLICATE_WHISPER_WINDOW: Duration = Duration::from_secs(1);

/// What the connection supervisor needs, independent of where it came from.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub connect: ConnectOptions,
    pub backoff: BackoffConfig,
    /// Period of the anti-idle arm swing.
    pub activity_interval: Duration,
    /// Chat line sent after every spawn.
    pub greeting: String,
    pub duplicate_window: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            connect: ConnectOptions::default(),
            backoff: BackoffConfig::default(),
            activity_interval: Duration::from_secs(DEFAULT_ACTIVITY_INTERVAL_SECS),
            greeting: GREETING.to_string(),
            duplicate_window: DUPLICATE_WHISPER_WINDOW,
        }
    }
}

/// Full bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub connect: ConnectOptions,
    pub allowed_users: AllowedUsers,
    pub bridge: BridgeConfig,
    pub backoff: BackoffConfig,
    pub activity_interval: Duration,
    pub actions: ActionConfig,
}

impl BotConfig {
    /// Read configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honored.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `MC_HOST` | `localhost` |
    /// | `MC_PORT` | `25565` |
    /// | `MC_VERSION` | `1.21.4` |
    /// | `MC_AUTH` | `microsoft` (or `offline`) |
    /// | `MC_USERNAME` | `presence-bot` |
    /// | `MC_PROFILES_DIR` | `./.minecraft_profiles` |
    /// | `BOT_ALLOWED_USERS` | `sav4da` (comma separated) |
    /// | `BRIDGE_URL` | `http://localhost:3000` |
    /// | `BOT_BACKOFF_BASE_MS` | `5000` |
    /// | `BOT_BACKOFF_MAX_MS` | `300000` |
    /// | `BOT_ACTIVITY_INTERVAL_SECS` | `20` |
    /// | `BOT_CLICK_DELAY_MS` | `200` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ConnectOptions::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = get("MC_HOST").unwrap_or(defaults.host);
        let port: u16 = parse_or(&get, "MC_PORT", defaults.port)?;
        let version = get("MC_VERSION").unwrap_or(defaults.version);
        let auth: AuthMode = parse_or(&get, "MC_AUTH", defaults.auth)?;
        let username = get("MC_USERNAME").unwrap_or(defaults.username);
        let profiles_dir = get("MC_PROFILES_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.profiles_dir);

        let connect = ConnectOptions::new(host, port)
            .with_version(version)
            .with_auth(auth)
            .with_username(username)
            .with_profiles_dir(profiles_dir);

        let allowed_users = AllowedUsers::from_csv(
            &get("BOT_ALLOWED_USERS").unwrap_or_else(|| DEFAULT_ALLOWED_USERS.to_string()),
        );
        if allowed_users.is_empty() {
            return Err(ConfigError::OutOfRange {
                key: "BOT_ALLOWED_USERS",
                reason: "no usable names".to_string(),
            });
        }

        let bridge = BridgeConfig::new(
            get("BRIDGE_URL").unwrap_or_else(|| DEFAULT_BRIDGE_URL.to_string()),
        );

        let base_ms: u64 = parse_or(&get, "BOT_BACKOFF_BASE_MS", DEFAULT_BACKOFF_BASE_MS)?;
        let max_ms: u64 = parse_or(&get, "BOT_BACKOFF_MAX_MS", DEFAULT_BACKOFF_MAX_MS)?;
        if base_ms == 0 {
            return Err(ConfigError::OutOfRange {
                key: "BOT_BACKOFF_BASE_MS",
                reason: "must be greater than zero".to_string(),
            });
        }
        if max_ms < base_ms {
            return Err(ConfigError::OutOfRange {
                key: "BOT_BACKOFF_MAX_MS",
                reason: format!("{} is below the base delay {}", max_ms, base_ms),
            });
        }
        let backoff = BackoffConfig::new(
            Duration::from_millis(base_ms),
            Duration::from_millis(max_ms),
        );

        let activity_secs: u64 = parse_or(
            &get,
            "BOT_ACTIVITY_INTERVAL_SECS",
            DEFAULT_ACTIVITY_INTERVAL_SECS,
        )?;
        if activity_secs == 0 {
            return Err(ConfigError::OutOfRange {
                key: "BOT_ACTIVITY_INTERVAL_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let click_ms: u64 = parse_or(&get, "BOT_CLICK_DELAY_MS", DEFAULT_CLICK_DELAY_MS)?;
        let actions = ActionConfig::default().with_click_delay(Duration::from_millis(click_ms));

        Ok(Self {
            connect,
            allowed_users,
            bridge,
            backoff,
            activity_interval: Duration::from_secs(activity_secs),
            actions,
        })
    }

    pub fn supervisor_config(&self) -> SupervisorConfig {
        SupervisorConfig {
            connect: self.connect.clone(),
            backoff: self.backoff.clone(),
            activity_interval: self.activity_interval,
            ..Default::default()
        }
    }

    pub fn dispatcher(&self) -> CommandDispatcher {
        CommandDispatcher::new(
            self.allowed_users.clone(),
            ActionSet::new(self.actions.clone()),
        )
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}
