//! Represents a bucket, a user's named category of tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named category owned by exactly one user.
///
/// Names are unique per user after normalization (see
/// `services::bucket_matcher::normalize_name`); the database keeps the
/// normalized form in a separate `name_key` column that is not loaded here.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// Unique identifier for this bucket.
    pub id: Uuid,

    /// Display name as the user (or the classifier) wrote it.
    pub name: String,

    /// Opaque identifier of the owning user.
    pub user_id: String,

    /// When this bucket was created. Buckets are listed in this order.
    pub created_at: DateTime<Utc>,

    /// Last rename.
    pub updated_at: DateTime<Utc>,
}
