//! Configuration management for a repository.

use std::env;

/// Default capacity of a registry mailbox.
pub const DEFAULT_MAILBOX: usize = 64;

/// Repository configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Name of the registry instance
    pub name: String,
    /// Capacity of the registry's command channel
    pub mailbox: usize,
    /// Sync the store schema right after registering the initial types
    pub alter_on_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            mailbox: DEFAULT_MAILBOX,
            alter_on_start: false,
        }
    }
}

impl Config {
    /// Load `.env` if present, then read the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let name = get("GRAFT_REPO").unwrap_or_else(|| "default".to_string());

        let mailbox = match get("GRAFT_MAILBOX") {
            Some(raw) => raw
                .parse()
                .ok()
                .filter(|capacity| *capacity > 0)
                .ok_or(ConfigError::InvalidMailbox(raw))?,
            None => DEFAULT_MAILBOX,
        };

        let alter_on_start = match get("GRAFT_ALTER_ON_START").as_deref() {
            None => false,
            Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            Some(other) => return Err(ConfigError::InvalidFlag(other.to_string())),
        };

        Ok(Self {
            name,
            mailbox,
            alter_on_start,
        })
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("GRAFT_MAILBOX must be a positive integer, got '{0}'")]
    InvalidMailbox(String),

    #[error("GRAFT_ALTER_ON_START must be true or false, got '{0}'")]
    InvalidFlag(String),
}
