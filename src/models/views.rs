//! Read-side shapes returned to callers.

use crate::models::task::{Priority, TypeTag};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A task as displayed, with derived fields filled in.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: Uuid,
    pub bucket_id: Uuid,
    pub raw: String,
    pub assignment_name: String,
    pub description: String,
    /// `YYYY-MM-DD`, absent when unscheduled.
    pub due_date: Option<String>,
    /// `HH:MM`, absent when no time of day was given.
    pub due_time: Option<String>,
    pub type_tag: TypeTag,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A bucket with its tasks in creation order.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BucketView {
    pub id: Uuid,
    pub name: String,
    /// Reserved buckets cannot be renamed or deleted.
    pub protected: bool,
    pub created_at: DateTime<Utc>,
    pub tasks: Vec<TaskView>,
}

/// All tasks sharing one due-date key.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    /// `YYYY-MM-DD`, or `unscheduled`.
    pub date: String,
    pub tasks: Vec<TaskView>,
}
