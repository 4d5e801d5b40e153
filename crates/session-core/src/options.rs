//! Connection options passed to a [`Connector`](crate::Connector).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// How the session authenticates with the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Account login through the device-code flow. Tokens are cached under
    /// [`ConnectOptions::profiles_dir`].
    #[default]
    Microsoft,
    /// No authentication (offline-mode servers).
    Offline,
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Microsoft => "microsoft",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMode {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "microsoft" | "msa" => Ok(Self::Microsoft),
            "offline" => Ok(Self::Offline),
            other => Err(SessionError::Configuration(format!(
                "unknown auth mode: {}",
                other
            ))),
        }
    }
}

/// Everything a connector needs to open one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    /// Protocol version string, e.g. "1.21.4".
    pub version: String,
    pub auth: AuthMode,
    /// Account name; for `Microsoft` auth this only keys the token cache.
    pub username: String,
    /// Credential cache location, owned by the collaborator.
    pub profiles_dir: PathBuf,
}

impl ConnectOptions {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_profiles_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.profiles_dir = dir.into();
        self
    }

    /// `host:port` for logging.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 25565,
            version: "1.21.4".to_string(),
            auth: AuthMode::Microsoft,
            username: "presence-bot".to_string(),
            profiles_dir: PathBuf::from("./.minecraft_profiles"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_mode_parse() {
        assert_eq!("Microsoft".parse::<AuthMode>().unwrap(), AuthMode::Microsoft);
        assert_eq!(" offline ".parse::<AuthMode>().unwrap(), AuthMode::Offline);
        assert!("mojang".parse::<AuthMode>().is_err());
    }

    #[test]
    fn test_connect_options_builder() {
        let options = ConnectOptions::new("play.example.net", 25566)
            .with_version("1.20.1")
            .with_auth(AuthMode::Offline);
        assert_eq!(options.address(), "play.example.net:25566");
        assert_eq!(options.version, "1.20.1");
        assert_eq!(options.auth, AuthMode::Offline);
        assert_eq!(options.profiles_dir, PathBuf::from("./.minecraft_profiles"));
    }

    #[test]
    fn test_connect_options_serialize_camel_case() {
        let json = serde_json::to_value(ConnectOptions::default()).unwrap();
        assert_eq!(json["auth"], "microsoft");
        assert!(json.get("profilesDir").is_some());
    }
}
