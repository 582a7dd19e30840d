use crate::error::{Result, WatchError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// The three secrets the watcher cannot run without.
#[derive(Clone)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl Credentials {
    /// Check that every required value is present and non-blank.
    ///
    /// All missing variables are reported at once so a misconfigured host
    /// can be fixed in a single pass.
    pub fn from_values(
        practicum_token: Option<String>,
        telegram_token: Option<String>,
        telegram_chat_id: Option<String>,
    ) -> Result<Self> {
        let missing: Vec<String> = [
            (PRACTICUM_TOKEN_VAR, practicum_token.as_deref()),
            (TELEGRAM_TOKEN_VAR, telegram_token.as_deref()),
            (TELEGRAM_CHAT_ID_VAR, telegram_chat_id.as_deref()),
        ]
        .into_iter()
        .filter(|(_, value)| !is_set(*value))
        .map(|(name, _)| name.to_string())
        .collect();

        if !missing.is_empty() {
            for name in &missing {
                tracing::error!(variable = %name, "required environment variable is not set");
            }
            return Err(WatchError::MissingConfig(missing));
        }

        Ok(Self {
            practicum_token: practicum_token.unwrap_or_default(),
            telegram_token: telegram_token.unwrap_or_default(),
            telegram_chat_id: telegram_chat_id.unwrap_or_default(),
        })
    }
}

fn is_set(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Non-secret tunables, optionally read from a YAML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_retry_period_secs")]
    pub retry_period_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,
    #[serde(default)]
    pub log_file: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_retry_period_secs() -> u64 {
    600
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_telegram_api_url() -> String {
    DEFAULT_TELEGRAM_API_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            retry_period_secs: default_retry_period_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            telegram_api_url: default_telegram_api_url(),
            log_file: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let settings_error = |reason: String| WatchError::Settings {
            path: path.display().to_string(),
            reason,
        };
        let data = std::fs::read_to_string(path).map_err(|e| settings_error(e.to_string()))?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&data).map_err(|e| settings_error(e.to_string()))
    }

    /// Load from `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn retry_period(&self) -> Duration {
        Duration::from_secs(self.retry_period_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
