use crate::error::{Result, WatchError};
use crate::types::{ReviewStatus, SubmissionRecord};

/// Build the notification text for one submission.
pub fn extract(record: &SubmissionRecord) -> Result<String> {
    let name = record
        .homework_name
        .as_deref()
        .ok_or(WatchError::MissingField("homework_name"))?;
    let status: ReviewStatus = record
        .status
        .as_deref()
        .ok_or(WatchError::MissingField("status"))?
        .parse()?;
    Ok(format!(
        "Изменился статус проверки работы \"{name}\". {}",
        status.verdict()
    ))
}

/// True when `current` differs from the last message sent. With no
/// previous message, anything counts as a change.
pub fn changed(previous: Option<&str>, current: &str) -> bool {
    previous != Some(current)
}
