use crate::error::WatchError;
use crate::validate::json_type;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// ReviewStatus
// ---------------------------------------------------------------------------

/// Review verdict reported by the API for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl ReviewStatus {
    pub const ALL: [ReviewStatus; 3] = [
        ReviewStatus::Approved,
        ReviewStatus::Reviewing,
        ReviewStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::Approved => "approved",
            ReviewStatus::Reviewing => "reviewing",
            ReviewStatus::Rejected => "rejected",
        }
    }

    /// Localized text shown to the user for this verdict.
    pub fn verdict(self) -> &'static str {
        match self {
            ReviewStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            ReviewStatus::Reviewing => "Работа взята на проверку ревьюером.",
            ReviewStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(ReviewStatus::Approved),
            "reviewing" => Ok(ReviewStatus::Reviewing),
            "rejected" => Ok(ReviewStatus::Rejected),
            other => Err(WatchError::UnknownStatus(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// SubmissionRecord
// ---------------------------------------------------------------------------

/// One entry of the `homeworks` list.
///
/// Fields are optional here so that a record missing them still decodes;
/// the extractor reports which one is absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubmissionRecord {
    #[serde(default)]
    pub homework_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl SubmissionRecord {
    /// Decode one raw `homeworks` entry. Only the entry being reported goes
    /// through here; older entries are never inspected.
    pub fn from_value(value: &Value) -> Result<Self, WatchError> {
        if !value.is_object() {
            tracing::error!(found = json_type(value), "homework entry is not an object");
            return Err(WatchError::Shape(format!(
                "homework entry must be an object, got {}",
                json_type(value)
            )));
        }
        Self::deserialize(value).map_err(|e| {
            tracing::error!(error = %e, "homework entry has unexpected field types");
            WatchError::Shape(format!("homework entry: {e}"))
        })
    }
}

// ---------------------------------------------------------------------------
// ResponseEnvelope
// ---------------------------------------------------------------------------

/// A validated API response. Newest submission first; entries stay raw
/// until one is reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseEnvelope {
    pub homeworks: Vec<Value>,
    /// Server-side Unix timestamp of the response, when provided.
    pub current_date: Option<i64>,
}

impl ResponseEnvelope {
    pub fn latest(&self) -> Option<&Value> {
        self.homeworks.first()
    }
}
