//! The poll loop.
//!
//! ```text
//! Starting ─▶ Polling ─▶ (Notifying) ─▶ Sleeping ─▶ Polling ─▶ …
//!                │
//!                └─▶ Stopped   (empty queue, or a fatal error)
//! ```
//!
//! Each iteration fetches the queue, validates it, formats the status of the
//! newest submission and sends it if it differs from the last one seen.
//! Fetch, validation and extraction failures end the loop; delivery failures
//! are absorbed by the [`Notifier`].

use crate::api::{ApiClient, StatusSource};
use crate::config::{Credentials, Settings};
use crate::error::Result;
use crate::notify::{MessageChannel, Notifier};
use crate::status::{changed, extract};
use crate::telegram::TelegramChannel;
use crate::types::SubmissionRecord;
use crate::validate::validate;
use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Phase / Tick
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Polling,
    Notifying,
    Sleeping,
    Stopped,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Starting => "starting",
            Phase::Polling => "polling",
            Phase::Notifying => "notifying",
            Phase::Sleeping => "sleeping",
            Phase::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Outcome of a single successful iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Stop,
}

// ---------------------------------------------------------------------------
// PollState
// ---------------------------------------------------------------------------

/// Everything the loop remembers between iterations. Lives for the process
/// lifetime only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    pub last_notified_text: Option<String>,
    /// Lower bound (`from_date`) for the next fetch.
    pub poll_timestamp: i64,
}

impl PollState {
    pub fn new(poll_timestamp: i64) -> Self {
        Self {
            last_notified_text: None,
            poll_timestamp,
        }
    }
}

pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

// ---------------------------------------------------------------------------
// Poller
// ---------------------------------------------------------------------------

pub struct Poller<S, C> {
    source: S,
    notifier: Notifier<C>,
    chat_id: String,
    interval: Duration,
    state: PollState,
    phase: Phase,
    clock: fn() -> i64,
}

impl Poller<ApiClient, TelegramChannel> {
    /// Build a poller wired to the real API and Telegram.
    pub fn connect(
        credentials: &Credentials,
        settings: &Settings,
        from_date: i64,
    ) -> Result<Self> {
        let source = ApiClient::new(
            settings.endpoint.clone(),
            credentials.practicum_token.clone(),
            settings.request_timeout(),
        )?;
        let channel = TelegramChannel::new(
            settings.telegram_api_url.clone(),
            credentials.telegram_token.clone(),
            settings.request_timeout(),
        )?;
        Ok(Self::new(
            source,
            Notifier::new(channel),
            credentials.telegram_chat_id.clone(),
            settings.retry_period(),
            from_date,
        ))
    }
}

impl<S: StatusSource, C: MessageChannel> Poller<S, C> {
    pub fn new(
        source: S,
        notifier: Notifier<C>,
        chat_id: impl Into<String>,
        interval: Duration,
        from_date: i64,
    ) -> Self {
        Self {
            source,
            notifier,
            chat_id: chat_id.into(),
            interval,
            state: PollState::new(from_date),
            phase: Phase::Starting,
            clock: unix_now,
        }
    }

    /// Replace the clock used when the API omits `current_date`.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one poll-validate-extract-diff-notify cycle.
    ///
    /// Returns `Tick::Stop` when the queue comes back empty. Any error is
    /// returned without touching the state.
    pub fn run_once(&mut self) -> Result<Tick> {
        self.phase = Phase::Polling;
        let since = self.state.poll_timestamp;
        tracing::debug!(from_date = since, "polling review queue");

        let envelope = validate(self.source.fetch(since)?)?;

        let Some(head) = envelope.latest() else {
            tracing::info!(from_date = since, "homework list is empty, stopping");
            self.phase = Phase::Stopped;
            return Ok(Tick::Stop);
        };
        let latest = SubmissionRecord::from_value(head)?;
        let message = extract(&latest)?;

        if changed(self.state.last_notified_text.as_deref(), &message) {
            self.phase = Phase::Notifying;
            tracing::info!(
                homework = latest.homework_name.as_deref().unwrap_or_default(),
                status = latest.status.as_deref().unwrap_or_default(),
                "review status changed"
            );
            self.notifier.notify(&self.chat_id, &message);
        } else {
            tracing::debug!("review status unchanged");
        }

        self.state.last_notified_text = Some(message);
        self.state.poll_timestamp = envelope.current_date.unwrap_or_else(self.clock);
        Ok(Tick::Continue)
    }

    /// Poll until the queue is empty or a fatal error occurs, sleeping the
    /// configured interval between iterations.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            from_date = self.state.poll_timestamp,
            "starting review watch"
        );
        loop {
            match self.run_once() {
                Ok(Tick::Continue) => {}
                Ok(Tick::Stop) => return Ok(()),
                Err(e) if e.is_fatal() => {
                    self.phase = Phase::Stopped;
                    return Err(e);
                }
                // Only kinds that ErrorKind::is_fatal marks non-fatal land
                // here. The Notifier absorbs delivery errors, so the real
                // pipeline never reaches this arm.
                Err(e) => {
                    tracing::warn!(kind = ?e.kind(), error = %e, "recovered from poll error");
                }
            }
            self.phase = Phase::Sleeping;
            std::thread::sleep(self.interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WatchError;
    use serde_json::{json, Value};
    use std::cell::RefCell;

    struct Fixed(Value);

    impl StatusSource for Fixed {
        fn fetch(&self, _since: i64) -> Result<Value> {
            Ok(self.0.clone())
        }
    }

    struct Silent;

    impl MessageChannel for Silent {
        fn send(&self, _chat_id: &str, _text: &str) -> Result<()> {
            Ok(())
        }
    }

    struct Recorder(RefCell<Vec<i64>>);

    impl StatusSource for Recorder {
        fn fetch(&self, since: i64) -> Result<Value> {
            self.0.borrow_mut().push(since);
            Ok(json!({"homeworks": [{"homework_name": "hw", "status": "reviewing"}]}))
        }
    }

    fn poller<S: StatusSource>(source: S) -> Poller<S, Silent> {
        Poller::new(source, Notifier::new(Silent), "42", Duration::ZERO, 100)
    }

    #[test]
    fn starts_in_starting_phase() {
        let p = poller(Fixed(json!({})));
        assert_eq!(p.phase(), Phase::Starting);
        assert_eq!(p.state(), &PollState::new(100));
    }

    #[test]
    fn timestamp_follows_server_date() {
        let mut p = poller(Fixed(json!({
            "homeworks": [{"homework_name": "hw", "status": "approved"}],
            "current_date": 200
        })));
        assert_eq!(p.run_once().unwrap(), Tick::Continue);
        assert_eq!(p.state().poll_timestamp, 200);
    }

    #[test]
    fn timestamp_falls_back_to_clock() {
        let mut p = poller(Fixed(json!({
            "homeworks": [{"homework_name": "hw", "status": "approved"}]
        })))
        .with_clock(|| 777);
        p.run_once().unwrap();
        assert_eq!(p.state().poll_timestamp, 777);
    }

    #[test]
    fn each_fetch_uses_previous_timestamp() {
        let mut p = poller(Recorder(RefCell::new(Vec::new()))).with_clock(|| 555);
        p.run_once().unwrap();
        p.run_once().unwrap();
        assert_eq!(*p.source.0.borrow(), vec![100, 555]);
    }

    #[test]
    fn fatal_error_leaves_state_untouched() {
        let mut p = poller(Fixed(json!({"homeworks": "nope"})));
        let err = p.run_once().unwrap_err();
        assert!(matches!(err, WatchError::Shape(_)));
        assert_eq!(p.state(), &PollState::new(100));
    }

    #[test]
    fn run_stops_on_fatal_error() {
        let mut p = poller(Fixed(json!({"homeworks": [{"status": "approved"}]})));
        let err = p.run().unwrap_err();
        assert!(matches!(err, WatchError::MissingField("homework_name")));
        assert_eq!(p.phase(), Phase::Stopped);
    }

    struct Flaky(RefCell<Vec<Result<Value>>>);

    impl StatusSource for Flaky {
        fn fetch(&self, _since: i64) -> Result<Value> {
            self.0.borrow_mut().remove(0)
        }
    }

    #[test]
    fn run_retries_after_non_fatal_error() {
        let mut p = poller(Flaky(RefCell::new(vec![
            Err(WatchError::Delivery("flood wait".into())),
            Ok(json!({"homeworks": []})),
        ])));
        p.run().unwrap();
        assert_eq!(p.phase(), Phase::Stopped);
        assert!(p.source.0.borrow().is_empty());
    }

    #[test]
    fn malformed_newest_entry_is_fatal() {
        let mut p = poller(Fixed(json!({
            "homeworks": [5, {"homework_name": "hw", "status": "approved"}]
        })));
        let err = p.run().unwrap_err();
        assert!(matches!(err, WatchError::Shape(_)));
        assert_eq!(p.state(), &PollState::new(100));
    }

    #[test]
    fn phase_names() {
        assert_eq!(Phase::Notifying.to_string(), "notifying");
        assert_eq!(Phase::Stopped.to_string(), "stopped");
    }
}
