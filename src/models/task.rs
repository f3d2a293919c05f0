//! Represents a task and the display attributes derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// A single user-entered item, stored under exactly one bucket.
///
/// Type tag and priority are deliberately absent: they are recomputed from
/// these fields whenever the task is read.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,

    /// Owning bucket; changes when the task is moved.
    pub bucket_id: Uuid,

    /// Exactly what the user typed. Never updated.
    pub raw: String,

    /// Short title.
    pub assignment_name: String,

    pub description: String,

    /// Composite due instant. A time-of-day of exactly midnight means no time
    /// was given.
    pub due_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Kind of work a task represents.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Homework,
    Quiz,
    Lab,
    Test,
    Project,
    Event,
    Reminder,
    Other,
}

impl TypeTag {
    pub const ALL: [TypeTag; 8] = [
        TypeTag::Homework,
        TypeTag::Quiz,
        TypeTag::Lab,
        TypeTag::Test,
        TypeTag::Project,
        TypeTag::Event,
        TypeTag::Reminder,
        TypeTag::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Homework => "Homework",
            TypeTag::Quiz => "Quiz",
            TypeTag::Lab => "Lab",
            TypeTag::Test => "Test",
            TypeTag::Project => "Project",
            TypeTag::Event => "Event",
            TypeTag::Reminder => "Reminder",
            TypeTag::Other => "Other",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the eight tag names.
#[derive(Debug, thiserror::Error)]
#[error("`{0}` is not a known type tag")]
pub struct UnknownTypeTag(pub String);

impl FromStr for TypeTag {
    type Err = UnknownTypeTag;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let candidate = s.trim();
        TypeTag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(candidate))
            .ok_or_else(|| UnknownTypeTag(s.to_string()))
    }
}

/// Display urgency, derived on read.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    High,
    Medium,
    Low,
}
