//! Telegram Bot API channel.
//!
//! Only `sendMessage` is used. The Bot API answers with
//! `{"ok": true, "result": {...}}` on success and
//! `{"ok": false, "description": "..."}` otherwise, so both the HTTP status
//! and the `ok` flag are checked.

use crate::error::{Result, WatchError};
use crate::notify::MessageChannel;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Blocking Telegram Bot API client.
pub struct TelegramChannel {
    client: reqwest::blocking::Client,
    api_url: String,
    token: String,
}

impl TelegramChannel {
    pub fn new(
        api_url: impl Into<String>,
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
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_url, self.token)
    }
}

impl MessageChannel for TelegramChannel {
    fn send(&self, chat_id: &str, text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&SendMessageRequest { chat_id, text })
            .send()
            // reqwest includes the URL in its errors; the URL carries the token.
            .map_err(|e| WatchError::Delivery(e.without_url().to_string()))?;

        let status = response.status();
        let body: Option<BotApiResponse> = response.json().ok();

        match body {
            Some(BotApiResponse { ok: true, .. }) if status.is_success() => Ok(()),
            Some(BotApiResponse { description, .. }) => Err(WatchError::Delivery(format!(
                "Bot API returned HTTP {}: {}",
                status.as_u16(),
                description.unwrap_or_else(|| "no description".to_string())
            ))),
            None => Err(WatchError::Delivery(format!(
                "Bot API returned HTTP {} with an unreadable body",
                status.as_u16()
            ))),
        }
    }
}
