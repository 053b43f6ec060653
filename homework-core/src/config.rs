use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Secrets required before the poller may start.
#[derive(Clone)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl Credentials {
    /// Reads the credentials from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the credentials through `lookup`, reporting every missing or empty
    /// variable at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut require = |name: &'static str| {
            let value = lookup(name).filter(|value| !value.trim().is_empty());
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };
        let practicum_token = require(PRACTICUM_TOKEN);
        let telegram_token = require(TELEGRAM_TOKEN);
        let telegram_chat_id = require(TELEGRAM_CHAT_ID);

        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }
        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

/// Where the cursor starts when the process boots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InitialCursor {
    /// Query the whole history; the newest homework is announced on the first cycle.
    #[default]
    Epoch,
    /// Query only changes that happen after startup.
    Now,
}

impl InitialCursor {
    pub fn timestamp(self) -> i64 {
        match self {
            InitialCursor::Epoch => 0,
            InitialCursor::Now => Utc::now().timestamp(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub endpoint: String,
    pub telegram_api_url: String,
    pub retry_period_secs: u64,
    pub request_timeout_secs: u64,
    pub initial_cursor: InitialCursor,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string(),
            telegram_api_url: "https://api.telegram.org".to_string(),
            retry_period_secs: 600,
            request_timeout_secs: 30,
            initial_cursor: InitialCursor::Epoch,
        }
    }
}

impl PollConfig {
    /// Default location: `<config_dir>/homework-bot/config.json`.
    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("homework-bot").join("config.json"))
    }

    /// Loads the tunables from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let config = match std::fs::read(path) {
            Ok(bytes) => match serde_json::from_slice::<PollConfig>(&bytes) {
                Ok(config) => config,
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "invalid poll config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, path = %path.display(), "poll config not readable, using defaults");
                Self::default()
            }
        };
        config.sanitized()
    }

    /// Loads the default config file if there is one.
    pub fn load() -> Self {
        match Self::config_file_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Self::default(),
        }
    }

    pub fn retry_period(&self) -> Duration {
        Duration::from_secs(self.retry_period_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Replaces zero periods with defaults; a zero retry period would poll the
    /// API without pause.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.retry_period_secs == 0 {
            warn!(
                default = defaults.retry_period_secs,
                "retry_period_secs must be positive, using default"
            );
            self.retry_period_secs = defaults.retry_period_secs;
        }
        if self.request_timeout_secs == 0 {
            warn!(
                default = defaults.request_timeout_secs,
                "request_timeout_secs must be positive, using default"
            );
            self.request_timeout_secs = defaults.request_timeout_secs;
        }
        if self.request_timeout_secs >= self.retry_period_secs {
            warn!(
                request_timeout_secs = self.request_timeout_secs,
                retry_period_secs = self.retry_period_secs,
                "request timeout is not shorter than the retry period"
            );
        }
        self
    }
}
