use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("missing required environment variable(s): {}", .0.join(", "))]
    MissingConfig(Vec<String>),

    #[error("failed to load settings from {path}: {reason}")]
    Settings { path: String, reason: String },

    #[error("API request failed: {0}")]
    Transport(String),

    #[error("API is unavailable: endpoint returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("failed to decode API response as JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("API response is empty")]
    EmptyResponse,

    #[error("unexpected API response shape: {0}")]
    Shape(String),

    #[error("homework record has no '{0}' field")]
    MissingField(&'static str),

    #[error("unknown homework status: {0}")]
    UnknownStatus(String),

    #[error("message was not delivered: {0}")]
    Delivery(String),
}

/// Coarse classification of a [`WatchError`], used by the poll loop to
/// decide between terminating and carrying on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Transport,
    Decode,
    EmptyResponse,
    Shape,
    MissingField,
    UnknownStatus,
    NotificationDelivery,
}

impl ErrorKind {
    /// Fatal kinds end the loop and the process. Only delivery failures are
    /// absorbed locally.
    pub fn is_fatal(self) -> bool {
        !matches!(self, ErrorKind::NotificationDelivery)
    }
}

impl WatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WatchError::MissingConfig(_) | WatchError::Settings { .. } => ErrorKind::Configuration,
            WatchError::Transport(_) | WatchError::HttpStatus { .. } => ErrorKind::Transport,
            WatchError::Decode(_) => ErrorKind::Decode,
            WatchError::EmptyResponse => ErrorKind::EmptyResponse,
            WatchError::Shape(_) => ErrorKind::Shape,
            WatchError::MissingField(_) => ErrorKind::MissingField,
            WatchError::UnknownStatus(_) => ErrorKind::UnknownStatus,
            WatchError::Delivery(_) => ErrorKind::NotificationDelivery,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.kind().is_fatal()
    }
}

pub type Result<T> = std::result::Result<T, WatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_delivery_errors_are_recoverable() {
        assert!(!WatchError::Delivery("bot blocked".into()).is_fatal());
        assert!(WatchError::Transport("connection refused".into()).is_fatal());
        assert!(WatchError::HttpStatus { status: 503 }.is_fatal());
        assert!(WatchError::EmptyResponse.is_fatal());
        assert!(WatchError::Shape("homeworks is not a list".into()).is_fatal());
        assert!(WatchError::MissingField("homework_name").is_fatal());
        assert!(WatchError::UnknownStatus("pending".into()).is_fatal());
        assert!(WatchError::MissingConfig(vec!["TELEGRAM_TOKEN".into()]).is_fatal());
    }

    #[test]
    fn http_status_is_a_transport_failure() {
        assert_eq!(
            WatchError::HttpStatus { status: 404 }.kind(),
            ErrorKind::Transport
        );
    }

    #[test]
    fn missing_config_lists_every_variable() {
        let err = WatchError::MissingConfig(vec![
            "PRACTICUM_TOKEN".into(),
            "TELEGRAM_CHAT_ID".into(),
        ]);
        assert_eq!(
            err.to_string(),
            "missing required environment variable(s): PRACTICUM_TOKEN, TELEGRAM_CHAT_ID"
        );
    }
}
