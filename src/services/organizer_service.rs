//! OrganizerService: the caller-facing operations.
//!
//! `assign` runs the classification pipeline: load the user's state, ask the
//! classifier, resolve or create the target bucket, fill in the task fields,
//! write, and reload. The other operations are guarded single-statement
//! mutations. Anything the caller is not allowed to touch (blank input, ids
//! that are malformed or belong to someone else, reserved buckets) leaves the
//! state unchanged and is not reported as an error.

use crate::{
    models::{
        bucket::Bucket,
        task::TypeTag,
        views::{BucketView, CalendarDay, TaskView},
    },
    services::{
        bucket_matcher::{self, DEFAULT_BUCKET_NAME},
        categorizer,
        classifier::{Suggestion, TaskClassifier},
        due_date,
        projections,
        storage_service::{NewTask, StorageError, StorageService, TaskChanges},
    },
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Title used when the model gives neither a name nor a course.
const FALLBACK_ASSIGNMENT_NAME: &str = "Task";

#[derive(Debug, Error)]
pub enum OrganizerError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A required external credential is missing.
    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type OrganizerResult<T> = Result<T, OrganizerError>;

/// What `assign` did with the input.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignStatus {
    /// Blank text or user; nothing was attempted.
    Skipped,
    /// The classifier produced no suggestion; nothing was written.
    Unclassified,
    Assigned { bucket_id: Uuid, task_id: Uuid },
}

#[derive(Debug, Clone)]
pub struct AssignOutcome {
    pub status: AssignStatus,
    /// State after the operation, freshly read from storage.
    pub buckets: Vec<BucketView>,
}

/// Partial task edit. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub assignment_name: Option<String>,
    pub description: Option<String>,
    /// `YYYY-MM-DD`; an empty string clears the due date.
    pub due_date: Option<String>,
    /// `HH:MM`; combined with `due_date`, or with the task's existing due date
    /// if only the time is given. Ignored when the task has no due date.
    pub due_time: Option<String>,
    /// Move the task into this bucket.
    pub bucket_id: Option<String>,
}

#[derive(Clone)]
pub struct OrganizerService {
    pub storage: StorageService,
    classifier: TaskClassifier,
}

impl OrganizerService {
    pub fn new(storage: StorageService, classifier: TaskClassifier) -> Self {
        Self {
            storage,
            classifier,
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Current bucket view without creating anything.
    async fn snapshot(&self, user_id: &str) -> OrganizerResult<Vec<BucketView>> {
        if user_id.trim().is_empty() {
            return Ok(Vec::new());
        }
        let buckets = self.storage.list_buckets(user_id).await?;
        let tasks = self.storage.list_tasks(user_id).await?;
        Ok(projections::bucket_views(&buckets, &tasks, Self::today()))
    }

    async fn ensure_default_bucket(&self, user_id: &str) -> OrganizerResult<()> {
        let (bucket, created) = self
            .storage
            .get_or_create_bucket(user_id, DEFAULT_BUCKET_NAME)
            .await?;
        if created {
            info!(user_id, bucket = %bucket.id, "created default bucket");
        }
        Ok(())
    }

    /// All of the user's buckets with their tasks. Creates the default bucket
    /// on first use.
    pub async fn load_buckets(&self, user_id: &str) -> OrganizerResult<Vec<BucketView>> {
        if user_id.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.ensure_default_bucket(user_id).await?;
        self.snapshot(user_id).await
    }

    /// Classify `text` and file it as a new task.
    pub async fn assign(&self, text: &str, user_id: &str) -> OrganizerResult<AssignOutcome> {
        if text.trim().is_empty() || user_id.trim().is_empty() {
            return Ok(AssignOutcome {
                status: AssignStatus::Skipped,
                buckets: self.snapshot(user_id).await?,
            });
        }

        self.ensure_default_bucket(user_id).await?;
        let rows = self.storage.list_buckets(user_id).await?;
        let tasks = self.storage.list_tasks(user_id).await?;
        let today = Self::today();
        let current = projections::bucket_views(&rows, &tasks, today);

        let suggestion = self
            .classifier
            .classify(text, &current, today)
            .await
            .map_err(|err| OrganizerError::Configuration(err.to_string()))?;

        let Some(suggestion) = suggestion else {
            warn!(user_id, "no classification for task, leaving state unchanged");
            return Ok(AssignOutcome {
                status: AssignStatus::Unclassified,
                buckets: current,
            });
        };

        let bucket = self.resolve_bucket(user_id, &suggestion, &rows).await?;
        let task = finalize_task(text, bucket.id, &suggestion);
        let type_tag = resolve_type_tag(text, &suggestion);

        let Some(stored) = self.storage.insert_task(user_id, task).await? else {
            // Bucket disappeared between resolve and insert.
            warn!(user_id, bucket = %bucket.id, "target bucket vanished before insert");
            return Ok(AssignOutcome {
                status: AssignStatus::Skipped,
                buckets: self.snapshot(user_id).await?,
            });
        };

        info!(
            user_id,
            bucket = %bucket.id,
            task = %stored.id,
            type_tag = %type_tag,
            "assigned task"
        );

        Ok(AssignOutcome {
            status: AssignStatus::Assigned {
                bucket_id: bucket.id,
                task_id: stored.id,
            },
            buckets: self.snapshot(user_id).await?,
        })
    }

    /// Pick the bucket for a suggestion: a known id first, then a name
    /// (suggested, course, or the default) matched by normalized form, and
    /// only then a new bucket.
    async fn resolve_bucket(
        &self,
        user_id: &str,
        suggestion: &Suggestion,
        buckets: &[Bucket],
    ) -> OrganizerResult<Bucket> {
        if let Some(id) = suggestion.bucket_id.as_deref().and_then(parse_id) {
            if let Some(existing) = buckets.iter().find(|b| b.id == id) {
                debug!(bucket = %existing.id, "using suggested existing bucket");
                return Ok(existing.clone());
            }
            debug!(suggested = %id, "suggested bucket id is not one of the user's buckets");
        }

        let name = suggestion
            .new_bucket_name
            .as_deref()
            .or(suggestion.parsed_task.course_category.as_deref())
            .unwrap_or(DEFAULT_BUCKET_NAME);

        if let Some(existing) = bucket_matcher::find_matching(name, buckets) {
            debug!(bucket = %existing.id, name, "suggested name matches existing bucket");
            return Ok(existing.clone());
        }

        let (bucket, created) = self.storage.get_or_create_bucket(user_id, name).await?;
        if created {
            info!(user_id, bucket = %bucket.id, name = %bucket.name, "created bucket");
        }
        Ok(bucket)
    }

    pub async fn delete_bucket(
        &self,
        user_id: &str,
        bucket_id: &str,
    ) -> OrganizerResult<Vec<BucketView>> {
        if let Some(bucket) = self.owned_bucket(user_id, bucket_id).await? {
            if bucket_matcher::is_protected(&bucket.name) {
                debug!(bucket = %bucket.id, "refusing to delete reserved bucket");
            } else if self.storage.delete_bucket(user_id, bucket.id).await? {
                info!(user_id, bucket = %bucket.id, "deleted bucket");
            }
        }
        self.snapshot(user_id).await
    }

    /// Completing a task removes it.
    pub async fn complete_task(
        &self,
        user_id: &str,
        task_id: &str,
    ) -> OrganizerResult<Vec<BucketView>> {
        self.remove_task(user_id, task_id).await?;
        self.snapshot(user_id).await
    }

    pub async fn create_empty_bucket(
        &self,
        user_id: &str,
        name: &str,
    ) -> OrganizerResult<Vec<BucketView>> {
        if !user_id.trim().is_empty() && !name.trim().is_empty() {
            let (bucket, created) = self.storage.get_or_create_bucket(user_id, name).await?;
            if created {
                info!(user_id, bucket = %bucket.id, name = %bucket.name, "created empty bucket");
            }
        }
        self.snapshot(user_id).await
    }

    pub async fn rename_bucket(
        &self,
        user_id: &str,
        bucket_id: &str,
        name: &str,
    ) -> OrganizerResult<Vec<BucketView>> {
        if name.trim().is_empty() {
            return self.snapshot(user_id).await;
        }
        if let Some(bucket) = self.owned_bucket(user_id, bucket_id).await? {
            if bucket_matcher::is_protected(&bucket.name) {
                debug!(bucket = %bucket.id, "refusing to rename reserved bucket");
            } else if self.storage.rename_bucket(user_id, bucket.id, name).await? {
                info!(user_id, bucket = %bucket.id, name = name.trim(), "renamed bucket");
            }
        }
        self.snapshot(user_id).await
    }

    pub async fn get_task(
        &self,
        user_id: &str,
        task_id: &str,
    ) -> OrganizerResult<Option<TaskView>> {
        let Some(id) = parse_id(task_id) else {
            return Ok(None);
        };
        if user_id.trim().is_empty() {
            return Ok(None);
        }
        let task = self.storage.find_task(user_id, id).await?;
        Ok(task.map(|t| projections::task_view(&t, Self::today())))
    }

    pub async fn update_task(
        &self,
        user_id: &str,
        task_id: &str,
        update: TaskUpdate,
    ) -> OrganizerResult<Vec<BucketView>> {
        let Some(id) = parse_id(task_id) else {
            return self.snapshot(user_id).await;
        };
        if user_id.trim().is_empty() {
            return self.snapshot(user_id).await;
        }
        let Some(task) = self.storage.find_task(user_id, id).await? else {
            return self.snapshot(user_id).await;
        };

        let mut changes = TaskChanges {
            assignment_name: update
                .assignment_name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            description: update.description,
            ..Default::default()
        };

        if let Some(target) = update.bucket_id.as_deref() {
            match parse_id(target) {
                Some(target) => changes.bucket_id = Some(target),
                None => return self.snapshot(user_id).await,
            }
        }

        let time = update.due_time.as_deref();
        match update.due_date.as_deref().map(str::trim) {
            Some("") => changes.due_date = Some(None),
            Some(date) => {
                if let Some(due) = due_date::compose(Some(date), time) {
                    changes.due_date = Some(Some(due));
                }
            }
            None => {
                if let (Some(time), Some(current)) = (time, task.due_date) {
                    let date = current.format("%Y-%m-%d").to_string();
                    if let Some(due) = due_date::compose(Some(&date), Some(time)) {
                        changes.due_date = Some(Some(due));
                    }
                }
            }
        }

        if self.storage.update_task(user_id, id, changes).await? {
            info!(user_id, task = %id, "updated task");
        }
        self.snapshot(user_id).await
    }

    /// Tasks grouped by due date.
    pub async fn load_calendar(&self, user_id: &str) -> OrganizerResult<Vec<CalendarDay>> {
        if user_id.trim().is_empty() {
            return Ok(Vec::new());
        }
        let tasks = self.storage.list_tasks(user_id).await?;
        Ok(projections::calendar_days(&tasks, Self::today()))
    }

    pub async fn delete_task_from_calendar(
        &self,
        user_id: &str,
        task_id: &str,
    ) -> OrganizerResult<Vec<CalendarDay>> {
        self.remove_task(user_id, task_id).await?;
        self.load_calendar(user_id).await
    }

    async fn remove_task(&self, user_id: &str, task_id: &str) -> OrganizerResult<()> {
        if user_id.trim().is_empty() {
            return Ok(());
        }
        if let Some(id) = parse_id(task_id) {
            if self.storage.delete_task(user_id, id).await? {
                info!(user_id, task = %id, "removed task");
            }
        }
        Ok(())
    }

    async fn owned_bucket(
        &self,
        user_id: &str,
        bucket_id: &str,
    ) -> OrganizerResult<Option<Bucket>> {
        if user_id.trim().is_empty() {
            return Ok(None);
        }
        match parse_id(bucket_id) {
            Some(id) => Ok(self.storage.find_bucket(user_id, id).await?),
            None => Ok(None),
        }
    }
}

fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// Task row for a classified input.
fn finalize_task(raw: &str, bucket_id: Uuid, suggestion: &Suggestion) -> NewTask {
    let parsed = &suggestion.parsed_task;
    let assignment_name = parsed
        .assignment_name
        .clone()
        .or_else(|| parsed.course_category.clone())
        .unwrap_or_else(|| FALLBACK_ASSIGNMENT_NAME.to_string());

    NewTask {
        bucket_id,
        raw: raw.to_string(),
        assignment_name,
        description: parsed
            .description
            .clone()
            .unwrap_or_else(|| raw.to_string()),
        due_date: due_date::compose(parsed.due_date.as_deref(), parsed.due_time.as_deref()),
    }
}

/// The model's tag when it names one of the eight tags, else the lexical
/// fallback.
fn resolve_type_tag(raw: &str, suggestion: &Suggestion) -> TypeTag {
    let parsed = &suggestion.parsed_task;
    parsed
        .type_tag
        .as_deref()
        .and_then(|tag| tag.parse::<TypeTag>().ok())
        .unwrap_or_else(|| {
            categorizer::categorize(
                raw,
                parsed.assignment_name.as_deref(),
                parsed.description.as_deref(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::memory_pool,
        services::{
            classifier::{ParsedTask, tests::ScriptedModel},
            language_model::{LanguageModel, ModelError},
        },
    };
    use std::sync::Arc;

    async fn organizer_with(model: Arc<dyn LanguageModel>) -> OrganizerService {
        let storage = StorageService::new(Arc::new(memory_pool().await));
        OrganizerService::new(storage, TaskClassifier::new(model, "test-model"))
    }

    async fn organizer_replying(reply: &str) -> OrganizerService {
        organizer_with(ScriptedModel::replying(reply)).await
    }

    fn names(buckets: &[BucketView]) -> Vec<&str> {
        buckets.iter().map(|b| b.name.as_str()).collect()
    }

    #[tokio::test]
    async fn apush_reading_lands_in_new_bucket() {
        let organizer = organizer_replying(
            r#"{"newBucketName":"APUSH","parsedTask":{"assignmentName":"Chapter 5 Reading","typeTag":"Homework","dueDate":"2024-11-18"}}"#,
        )
        .await;

        let outcome = organizer
            .assign("APUSH reading chapter 5 due Monday", "u1")
            .await
            .unwrap();

        assert!(matches!(outcome.status, AssignStatus::Assigned { .. }));
        assert_eq!(names(&outcome.buckets), ["Others", "APUSH"]);

        let apush = &outcome.buckets[1];
        assert_eq!(apush.tasks.len(), 1);
        let task = &apush.tasks[0];
        assert_eq!(task.assignment_name, "Chapter 5 Reading");
        assert_eq!(task.type_tag, TypeTag::Homework);
        assert_eq!(task.due_date.as_deref(), Some("2024-11-18"));
        assert_eq!(task.due_time, None);
        assert_eq!(task.raw, "APUSH reading chapter 5 due Monday");
        assert_eq!(task.description, "APUSH reading chapter 5 due Monday");
    }

    #[tokio::test]
    async fn failed_classification_changes_nothing() {
        let organizer = organizer_with(ScriptedModel::failing(ModelError::Api {
            status: 503,
            body: "overloaded".into(),
        }))
        .await;
        let before = organizer.load_buckets("u1").await.unwrap();

        let outcome = organizer.assign("buy milk", "u1").await.unwrap();

        assert_eq!(outcome.status, AssignStatus::Unclassified);
        assert_eq!(outcome.buckets, before);
        assert!(organizer.storage.list_tasks("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_credentials_fail_the_request() {
        let organizer = organizer_with(ScriptedModel::failing(ModelError::MissingApiKey)).await;
        let err = organizer.assign("buy milk", "u1").await.unwrap_err();
        assert!(matches!(err, OrganizerError::Configuration(_)));
        assert!(organizer.storage.list_tasks("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_inputs_are_no_ops() {
        let model = ScriptedModel::replying(r#"{"newBucketName":"Math"}"#);
        let organizer = organizer_with(model.clone()).await;

        let outcome = organizer.assign("   ", "u1").await.unwrap();
        assert_eq!(outcome.status, AssignStatus::Skipped);
        assert!(outcome.buckets.is_empty());

        let outcome = organizer.assign("math homework", "").await.unwrap();
        assert_eq!(outcome.status, AssignStatus::Skipped);
        assert!(outcome.buckets.is_empty());

        assert!(organizer.storage.list_buckets("u1").await.unwrap().is_empty());
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_text_returns_existing_state_untouched() {
        let model = ScriptedModel::replying(
            r#"{"newBucketName":"Math","parsedTask":{"assignmentName":"Problem set 2"}}"#,
        );
        let organizer = organizer_with(model.clone()).await;
        let before = organizer.assign("math homework", "u1").await.unwrap().buckets;
        assert_eq!(names(&before), ["Others", "Math"]);

        let outcome = organizer.assign("", "u1").await.unwrap();

        assert_eq!(outcome.status, AssignStatus::Skipped);
        assert_eq!(outcome.buckets, before);
        assert_eq!(organizer.storage.list_tasks("u1").await.unwrap().len(), 1);
        assert_eq!(model.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn raw_text_is_stored_as_typed() {
        let organizer = organizer_replying(r#"{"parsedTask":{"assignmentName":"Essay"}}"#).await;
        let outcome = organizer.assign("  english essay \n", "u1").await.unwrap();

        let task = &outcome.buckets[0].tasks[0];
        assert_eq!(task.raw, "  english essay \n");
    }

    #[tokio::test]
    async fn chapter_test_keeps_test_tag() {
        let organizer = organizer_replying(
            r#"{"newBucketName":"Biology","parsedTask":{"assignmentName":"Chapter 4 test","typeTag":"Test","dueDate":"2024-11-22"}}"#,
        )
        .await;

        let outcome = organizer.assign("bio chapter 4 test friday", "u1").await.unwrap();

        let task = &outcome.buckets[1].tasks[0];
        assert_eq!(task.type_tag, TypeTag::Test);
        let fetched = organizer.get_task("u1", &task.id.to_string()).await.unwrap().unwrap();
        assert_eq!(fetched.type_tag, TypeTag::Test);
    }

    #[tokio::test]
    async fn default_bucket_is_created_once() {
        let organizer = organizer_replying(r#"{"parsedTask":{}}"#).await;
        organizer.load_buckets("u1").await.unwrap();
        organizer.load_buckets("u1").await.unwrap();
        organizer.assign("something", "u1").await.unwrap();

        let buckets = organizer.storage.list_buckets("u1").await.unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].name, DEFAULT_BUCKET_NAME);
    }

    #[tokio::test]
    async fn suggestion_without_bucket_falls_back_to_defaults() {
        let organizer = organizer_replying(r#"{"parsedTask":{}}"#).await;
        let outcome = organizer.assign("pick up uniform", "u1").await.unwrap();

        assert_eq!(names(&outcome.buckets), ["Others"]);
        let task = &outcome.buckets[0].tasks[0];
        assert_eq!(task.assignment_name, FALLBACK_ASSIGNMENT_NAME);
        assert_eq!(task.description, "pick up uniform");
        assert_eq!(task.type_tag, TypeTag::Reminder);
    }

    #[tokio::test]
    async fn course_category_names_the_bucket_and_task() {
        let organizer = organizer_replying(
            r#"{"parsedTask":{"courseCategory":"Chemistry","dueDate":"2024-11-20","dueTime":"15:00"}}"#,
        )
        .await;
        let outcome = organizer.assign("chem stuff thursday 3pm", "u1").await.unwrap();

        assert_eq!(names(&outcome.buckets), ["Others", "Chemistry"]);
        let task = &outcome.buckets[1].tasks[0];
        assert_eq!(task.assignment_name, "Chemistry");
        assert_eq!(task.due_date.as_deref(), Some("2024-11-20"));
        assert_eq!(task.due_time.as_deref(), Some("15:00"));
    }

    #[tokio::test]
    async fn near_duplicate_names_reuse_existing_bucket() {
        let organizer = organizer_replying(
            r#"{"newBucketName":"computer science","parsedTask":{"assignmentName":"Lab 2"}}"#,
        )
        .await;
        organizer.create_empty_bucket("u1", "Computer Science").await.unwrap();

        let outcome = organizer.assign("cs lab 2", "u1").await.unwrap();

        assert_eq!(names(&outcome.buckets), ["Computer Science", "Others"]);
        assert_eq!(outcome.buckets[0].tasks.len(), 1);
    }

    #[tokio::test]
    async fn suggested_bucket_id_is_used_when_owned() {
        let storage = StorageService::new(Arc::new(memory_pool().await));
        let (bio, _) = storage.get_or_create_bucket("u1", "Biology").await.unwrap();
        let reply = format!(
            r#"{{"bucketId":"{}","newBucketName":"Bio 101","parsedTask":{{"assignmentName":"Cell quiz"}}}}"#,
            bio.id
        );
        let organizer = OrganizerService::new(
            storage,
            TaskClassifier::new(ScriptedModel::replying(&reply), "m"),
        );

        let outcome = organizer.assign("bio quiz", "u1").await.unwrap();
        assert_eq!(
            outcome.status,
            AssignStatus::Assigned {
                bucket_id: bio.id,
                task_id: outcome.buckets[0].tasks[0].id,
            }
        );
        assert_eq!(names(&outcome.buckets), ["Biology", "Others"]);
    }

    #[tokio::test]
    async fn foreign_bucket_id_is_ignored() {
        let storage = StorageService::new(Arc::new(memory_pool().await));
        let (foreign, _) = storage.get_or_create_bucket("u2", "Secret").await.unwrap();
        let reply = format!(
            r#"{{"bucketId":"{}","newBucketName":"History","parsedTask":{{}}}}"#,
            foreign.id
        );
        let organizer = OrganizerService::new(
            storage,
            TaskClassifier::new(ScriptedModel::replying(&reply), "m"),
        );

        let outcome = organizer.assign("history essay", "u1").await.unwrap();
        assert_eq!(names(&outcome.buckets), ["Others", "History"]);
        assert_eq!(outcome.buckets[1].tasks.len(), 1);
    }

    #[tokio::test]
    async fn reserved_bucket_cannot_be_renamed_or_deleted() {
        let organizer = organizer_replying("{}").await;
        let buckets = organizer.load_buckets("u1").await.unwrap();
        let default_id = buckets[0].id.to_string();

        let after_rename = organizer.rename_bucket("u1", &default_id, "Misc").await.unwrap();
        assert_eq!(names(&after_rename), ["Others"]);

        let after_delete = organizer.delete_bucket("u1", &default_id).await.unwrap();
        assert_eq!(names(&after_delete), ["Others"]);
    }

    #[tokio::test]
    async fn mutations_on_foreign_ids_are_no_ops() {
        let organizer = organizer_replying(r#"{"newBucketName":"Math","parsedTask":{}}"#).await;
        let outcome = organizer.assign("math homework", "u1").await.unwrap();
        let math_id = outcome.buckets[1].id.to_string();
        let task_id = outcome.buckets[1].tasks[0].id.to_string();

        organizer.delete_bucket("u2", &math_id).await.unwrap();
        organizer.rename_bucket("u2", &math_id, "Algebra").await.unwrap();
        organizer.complete_task("u2", &task_id).await.unwrap();
        assert!(organizer.get_task("u2", &task_id).await.unwrap().is_none());

        let state = organizer.load_buckets("u1").await.unwrap();
        assert_eq!(names(&state), ["Others", "Math"]);
        assert_eq!(state[1].tasks.len(), 1);

        // malformed ids behave the same way
        let state = organizer.delete_bucket("u1", "not-an-id").await.unwrap();
        assert_eq!(names(&state), ["Others", "Math"]);
    }

    #[tokio::test]
    async fn bucket_lifecycle() {
        let organizer = organizer_replying("{}").await;
        organizer.load_buckets("u1").await.unwrap();

        let state = organizer.create_empty_bucket("u1", "Spanish").await.unwrap();
        assert_eq!(names(&state), ["Others", "Spanish"]);

        let state = organizer.create_empty_bucket("u1", "  spanish ").await.unwrap();
        assert_eq!(names(&state), ["Others", "Spanish"]);

        let spanish = state[1].id.to_string();
        let state = organizer.rename_bucket("u1", &spanish, "Spanish III").await.unwrap();
        assert_eq!(names(&state), ["Others", "Spanish III"]);

        let state = organizer.delete_bucket("u1", &spanish).await.unwrap();
        assert_eq!(names(&state), ["Others"]);
    }

    #[tokio::test]
    async fn complete_task_removes_it() {
        let organizer = organizer_replying(r#"{"parsedTask":{"assignmentName":"Milk"}}"#).await;
        let outcome = organizer.assign("buy milk", "u1").await.unwrap();
        let task_id = outcome.buckets[0].tasks[0].id.to_string();

        let state = organizer.complete_task("u1", &task_id).await.unwrap();
        assert!(state[0].tasks.is_empty());
        assert!(organizer.get_task("u1", &task_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_task_edits_fields_and_moves() {
        let organizer = organizer_replying(
            r#"{"parsedTask":{"assignmentName":"Essay","dueDate":"2024-12-01","dueTime":"09:30"}}"#,
        )
        .await;
        let outcome = organizer.assign("english essay", "u1").await.unwrap();
        let task_id = outcome.buckets[0].tasks[0].id.to_string();
        let state = organizer.create_empty_bucket("u1", "English").await.unwrap();
        let english = state[1].id.to_string();

        organizer
            .update_task(
                "u1",
                &task_id,
                TaskUpdate {
                    assignment_name: Some("Final essay".into()),
                    due_time: Some("14:00".into()),
                    bucket_id: Some(english.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let task = organizer.get_task("u1", &task_id).await.unwrap().unwrap();
        assert_eq!(task.assignment_name, "Final essay");
        assert_eq!(task.due_date.as_deref(), Some("2024-12-01"));
        assert_eq!(task.due_time.as_deref(), Some("14:00"));
        assert_eq!(task.bucket_id.to_string(), english);
        assert_eq!(task.raw, "english essay");

        organizer
            .update_task(
                "u1",
                &task_id,
                TaskUpdate {
                    due_date: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let task = organizer.get_task("u1", &task_id).await.unwrap().unwrap();
        assert_eq!(task.due_date, None);
    }

    #[tokio::test]
    async fn update_with_malformed_target_bucket_is_a_no_op() {
        let organizer = organizer_replying(r#"{"parsedTask":{"assignmentName":"Essay"}}"#).await;
        let outcome = organizer.assign("english essay", "u1").await.unwrap();
        let task_id = outcome.buckets[0].tasks[0].id.to_string();

        organizer
            .update_task(
                "u1",
                &task_id,
                TaskUpdate {
                    assignment_name: Some("Changed".into()),
                    bucket_id: Some("garbage".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let task = organizer.get_task("u1", &task_id).await.unwrap().unwrap();
        assert_eq!(task.assignment_name, "Essay");
    }

    #[tokio::test]
    async fn impossible_due_date_keeps_the_current_one() {
        let organizer = organizer_replying(
            r#"{"parsedTask":{"assignmentName":"Essay","dueDate":"2024-12-01"}}"#,
        )
        .await;
        let outcome = organizer.assign("english essay", "u1").await.unwrap();
        let task_id = outcome.buckets[0].tasks[0].id.to_string();

        organizer
            .update_task(
                "u1",
                &task_id,
                TaskUpdate {
                    due_date: Some("2024-02-30".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let task = organizer.get_task("u1", &task_id).await.unwrap().unwrap();
        assert_eq!(task.due_date.as_deref(), Some("2024-12-01"));
        assert_eq!(task.due_time, None);
    }

    #[tokio::test]
    async fn time_alone_is_ignored_without_a_due_date() {
        let organizer = organizer_replying(r#"{"parsedTask":{"assignmentName":"Essay"}}"#).await;
        let outcome = organizer.assign("english essay", "u1").await.unwrap();
        let task_id = outcome.buckets[0].tasks[0].id.to_string();

        organizer
            .update_task(
                "u1",
                &task_id,
                TaskUpdate {
                    due_time: Some("14:00".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let task = organizer.get_task("u1", &task_id).await.unwrap().unwrap();
        assert_eq!(task.due_date, None);
        assert_eq!(task.due_time, None);
    }

    #[tokio::test]
    async fn calendar_view_and_delete() {
        let organizer = organizer_replying(r#"{"parsedTask":{"dueDate":"2024-11-20"}}"#).await;
        let first = organizer.assign("history reading", "u1").await.unwrap();
        let first_id = first.buckets[0].tasks[0].id;

        let calendar = organizer.load_calendar("u1").await.unwrap();
        assert_eq!(calendar.len(), 1);
        assert_eq!(calendar[0].date, "2024-11-20");

        let calendar = organizer
            .delete_task_from_calendar("u1", &first_id.to_string())
            .await
            .unwrap();
        assert!(calendar.is_empty());
    }

    #[test]
    fn invalid_model_tag_uses_lexical_fallback() {
        let suggestion = Suggestion {
            parsed_task: ParsedTask {
                type_tag: Some("Essay".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(resolve_type_tag("spanish quiz", &suggestion), TypeTag::Quiz);

        let suggestion = Suggestion {
            parsed_task: ParsedTask {
                type_tag: Some("project".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(resolve_type_tag("spanish quiz", &suggestion), TypeTag::Project);
    }

    #[test]
    fn unparseable_due_date_leaves_task_unscheduled() {
        let suggestion = Suggestion {
            parsed_task: ParsedTask {
                due_date: Some("next monday".into()),
                due_time: Some("10:00".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let task = finalize_task("x", Uuid::new_v4(), &suggestion);
        assert_eq!(task.due_date, None);
    }
}
