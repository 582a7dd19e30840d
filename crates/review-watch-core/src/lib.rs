//! `review-watch-core` — watches a homework review queue and reports status
//! changes.
//!
//! # Pipeline
//!
//! ```text
//! Poller ──▶ StatusSource::fetch   (ApiClient: GET ?from_date=…)
//!   │            │
//!   │            ▼
//!   │        validate              raw JSON ──▶ ResponseEnvelope
//!   │            │
//!   │            ▼
//!   │        extract               newest SubmissionRecord ──▶ message text
//!   │            │
//!   │            ▼
//!   │        changed?              compare with PollState.last_notified_text
//!   │            │ yes
//!   │            ▼
//!   └──────▶ Notifier::notify      (TelegramChannel: sendMessage)
//! ```
//!
//! Every fallible step returns [`WatchError`]; [`ErrorKind::is_fatal`]
//! decides whether the loop stops.

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod poller;
pub mod status;
pub mod telegram;
pub mod types;
pub mod validate;


pub use api::{ApiClient, StatusSource};
pub use config::{Credentials, Settings};
pub use error::{ErrorKind, Result, WatchError};
pub use notify::{MessageChannel, Notifier};
pub use poller::{Phase, PollState, Poller, Tick};
pub use telegram::TelegramChannel;
pub use types::{ResponseEnvelope, ReviewStatus, SubmissionRecord};
