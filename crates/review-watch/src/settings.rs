use review_watch_core::{Result, Settings};
use std::path::{Path, PathBuf};

/// Values given on the command line or through the environment. Each one,
/// when set, wins over the settings file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub telegram_api_url: Option<String>,
    pub retry_period_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

/// Resolve the effective settings.
///
/// Priority:
/// 1. `overrides` (flags / environment)
/// 2. the YAML file at `config`, when given
/// 3. built-in defaults
pub fn resolve(config: Option<&Path>, overrides: Overrides) -> Result<Settings> {
    let mut settings = Settings::load_or_default(config)?;

    if let Some(endpoint) = overrides.endpoint {
        settings.endpoint = endpoint;
    }
    if let Some(url) = overrides.telegram_api_url {
        settings.telegram_api_url = url;
    }
    if let Some(secs) = overrides.retry_period_secs {
        settings.retry_period_secs = secs;
    }
    if let Some(secs) = overrides.request_timeout_secs {
        settings.request_timeout_secs = secs;
    }
    if let Some(path) = overrides.log_file {
        settings.log_file = Some(path.display().to_string());
    }
    Ok(settings)
}
