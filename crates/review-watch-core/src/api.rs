use crate::error::{Result, WatchError};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// Something that can be asked for the review queue since a point in time.
///
/// The returned value is the raw decoded body; callers run it through
/// [`crate::validate::validate`] before trusting it.
pub trait StatusSource {
    fn fetch(&self, since: i64) -> Result<Value>;
}

/// Blocking client for the homework statuses endpoint.
pub struct ApiClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    token: String,
}

impl ApiClient {
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("review-watch/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| WatchError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }
}

impl StatusSource for ApiClient {
    fn fetch(&self, since: i64) -> Result<Value> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", since)])
            .send()
            .map_err(|e| {
                tracing::error!(endpoint = %self.endpoint, error = %e, "API request failed");
                WatchError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(
                endpoint = %self.endpoint,
                status = status.as_u16(),
                "API is unavailable"
            );
            return Err(WatchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|e| {
            tracing::error!(
                endpoint = %self.endpoint,
                error = %e,
                "failed to read API response body"
            );
            WatchError::Transport(e.to_string())
        })?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "failed to decode API response as JSON");
            WatchError::Decode(e)
        })
    }
}
