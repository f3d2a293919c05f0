//! src/services/storage_service.rs
//!
//! StorageService: bucket and task rows in SQLite. Every statement is scoped
//! by the owning user, so an id belonging to someone else simply matches no
//! rows. Each mutation is a single statement; there are no multi-step writes
//! that a concurrent reader could observe half-done.

use crate::{
    models::{bucket::Bucket, task::Task},
    services::bucket_matcher::normalize_name,
};
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

const BUCKET_COLUMNS: &str = "id, name, user_id, created_at, updated_at";

/// Values for a task insert.
#[derive(Clone, Debug)]
pub struct NewTask {
    pub bucket_id: Uuid,
    pub raw: String,
    pub assignment_name: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
}

/// Column updates for an existing task. `None` leaves a column untouched;
/// `due_date: Some(None)` clears the due date.
#[derive(Clone, Debug, Default)]
pub struct TaskChanges {
    pub assignment_name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub bucket_id: Option<Uuid>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.assignment_name.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.bucket_id.is_none()
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Clone)]
pub struct StorageService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl StorageService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Connectivity probe used by readiness checks.
    pub async fn ping(&self) -> StorageResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&*self.db)
            .await?)
    }

    /// All buckets of `user_id`, oldest first.
    pub async fn list_buckets(&self, user_id: &str) -> StorageResult<Vec<Bucket>> {
        let buckets = sqlx::query_as::<_, Bucket>(&format!(
            "SELECT {BUCKET_COLUMNS} FROM buckets
             WHERE user_id = ?
             ORDER BY created_at ASC, rowid ASC"
        ))
        .bind(user_id)
        .fetch_all(&*self.db)
        .await?;
        Ok(buckets)
    }

    /// All tasks in any bucket of `user_id`, oldest first.
    pub async fn list_tasks(&self, user_id: &str) -> StorageResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT t.id, t.bucket_id, t.raw, t.assignment_name, t.description,
                    t.due_date, t.created_at, t.updated_at
             FROM tasks t
             JOIN buckets b ON b.id = t.bucket_id
             WHERE b.user_id = ?
             ORDER BY t.created_at ASC, t.rowid ASC",
        )
        .bind(user_id)
        .fetch_all(&*self.db)
        .await?;
        Ok(tasks)
    }

    pub async fn find_bucket(
        &self,
        user_id: &str,
        bucket_id: Uuid,
    ) -> StorageResult<Option<Bucket>> {
        let bucket = sqlx::query_as::<_, Bucket>(&format!(
            "SELECT {BUCKET_COLUMNS} FROM buckets WHERE id = ? AND user_id = ?"
        ))
        .bind(bucket_id)
        .bind(user_id)
        .fetch_optional(&*self.db)
        .await?;
        Ok(bucket)
    }

    /// Return the user's bucket whose normalized name equals that of `name`,
    /// inserting it first when there is none.
    ///
    /// The `(user_id, name_key)` unique index makes this safe under concurrent
    /// callers: the losing insert is ignored and both read the same row.
    /// The boolean is true when this call created the bucket.
    pub async fn get_or_create_bucket(
        &self,
        user_id: &str,
        name: &str,
    ) -> StorageResult<(Bucket, bool)> {
        let name = name.trim();
        let name_key = normalize_name(name);
        let now = Utc::now();

        let inserted = sqlx::query(
            "INSERT INTO buckets (id, user_id, name, name_key, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id, name_key) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(name)
        .bind(&name_key)
        .bind(now)
        .bind(now)
        .execute(&*self.db)
        .await?
        .rows_affected()
            > 0;

        let bucket = sqlx::query_as::<_, Bucket>(&format!(
            "SELECT {BUCKET_COLUMNS} FROM buckets WHERE user_id = ? AND name_key = ?"
        ))
        .bind(user_id)
        .bind(&name_key)
        .fetch_one(&*self.db)
        .await?;

        if !inserted {
            debug!(bucket = %bucket.id, name, "bucket name already taken, reusing existing row");
        }
        Ok((bucket, inserted))
    }

    /// Rename a bucket. Returns false when the bucket is not the user's or the
    /// new name collides with another of their buckets.
    pub async fn rename_bucket(
        &self,
        user_id: &str,
        bucket_id: Uuid,
        name: &str,
    ) -> StorageResult<bool> {
        let name = name.trim();
        let result = sqlx::query(
            "UPDATE buckets SET name = ?, name_key = ?, updated_at = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(name)
        .bind(normalize_name(name))
        .bind(Utc::now())
        .bind(bucket_id)
        .bind(user_id)
        .execute(&*self.db)
        .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(err) if is_unique_violation(&err) => {
                debug!(bucket = %bucket_id, name, "rename collides with an existing bucket");
                Ok(false)
            }
            Err(err) => Err(StorageError::Sqlx(err)),
        }
    }

    /// Delete a bucket; its tasks go with it through the foreign key cascade.
    pub async fn delete_bucket(&self, user_id: &str, bucket_id: Uuid) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM buckets WHERE id = ? AND user_id = ?")
            .bind(bucket_id)
            .bind(user_id)
            .execute(&*self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert a task, but only if its bucket belongs to `user_id`.
    pub async fn insert_task(&self, user_id: &str, task: NewTask) -> StorageResult<Option<Task>> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (
                 id, bucket_id, raw, assignment_name, description, due_date,
                 created_at, updated_at
             )
             SELECT ?, id, ?, ?, ?, ?, ?, ?
             FROM buckets WHERE id = ? AND user_id = ?
             RETURNING id, bucket_id, raw, assignment_name, description, due_date,
                       created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&task.raw)
        .bind(&task.assignment_name)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(now)
        .bind(now)
        .bind(task.bucket_id)
        .bind(user_id)
        .fetch_optional(&*self.db)
        .await?;
        Ok(row)
    }

    pub async fn find_task(&self, user_id: &str, task_id: Uuid) -> StorageResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            "SELECT t.id, t.bucket_id, t.raw, t.assignment_name, t.description,
                    t.due_date, t.created_at, t.updated_at
             FROM tasks t
             JOIN buckets b ON b.id = t.bucket_id
             WHERE t.id = ? AND b.user_id = ?",
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&*self.db)
        .await?;
        Ok(task)
    }

    pub async fn delete_task(&self, user_id: &str, task_id: Uuid) -> StorageResult<bool> {
        let result = sqlx::query(
            "DELETE FROM tasks
             WHERE id = ? AND bucket_id IN (SELECT id FROM buckets WHERE user_id = ?)",
        )
        .bind(task_id)
        .bind(user_id)
        .execute(&*self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply `changes` in one UPDATE. A move only happens when the target
    /// bucket is also the user's; otherwise nothing is written.
    pub async fn update_task(
        &self,
        user_id: &str,
        task_id: Uuid,
        changes: TaskChanges,
    ) -> StorageResult<bool> {
        if changes.is_empty() {
            return Ok(false);
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE tasks SET updated_at = ");
        builder.push_bind(Utc::now());

        if let Some(name) = changes.assignment_name {
            builder.push(", assignment_name = ");
            builder.push_bind(name);
        }
        if let Some(description) = changes.description {
            builder.push(", description = ");
            builder.push_bind(description);
        }
        if let Some(due) = changes.due_date {
            builder.push(", due_date = ");
            builder.push_bind(due);
        }
        if let Some(target) = changes.bucket_id {
            builder.push(", bucket_id = ");
            builder.push_bind(target);
        }

        builder.push(" WHERE id = ");
        builder.push_bind(task_id);
        builder.push(" AND bucket_id IN (SELECT id FROM buckets WHERE user_id = ");
        builder.push_bind(user_id.to_string());
        builder.push(")");

        if let Some(target) = changes.bucket_id {
            builder.push(" AND EXISTS (SELECT 1 FROM buckets WHERE id = ");
            builder.push_bind(target);
            builder.push(" AND user_id = ");
            builder.push_bind(user_id.to_string());
            builder.push(")");
        }

        let result = builder.build().execute(&*self.db).await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Return true if SQLx error indicates a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_lowercase().contains("unique")
    )
}
