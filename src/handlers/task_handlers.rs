//! HTTP handlers for task operations, including the AI-assisted assign.

use crate::{
    errors::AppError,
    models::views::{BucketView, TaskView},
    services::organizer_service::{AssignStatus, OrganizerService, TaskUpdate},
};
use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shown when the classifier could not place the task.
const UNCLASSIFIED_MESSAGE: &str = "Couldn't organize this task. Please try again.";

/// Body for `POST /users/{user_id}/tasks`.
#[derive(Debug, Deserialize)]
pub struct AssignTaskReq {
    /// Free-form (typed or transcribed) task text.
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskResp {
    /// `assigned`, `skipped` or `unclassified`.
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub buckets: Vec<BucketView>,
}

/// POST `/users/{user_id}/tasks`: classify the text and file it.
pub async fn assign_task(
    State(service): State<OrganizerService>,
    Path(user_id): Path<String>,
    Json(payload): Json<AssignTaskReq>,
) -> Result<Json<AssignTaskResp>, AppError> {
    let outcome = service.assign(&payload.text, &user_id).await?;

    let (status, bucket_id, task_id, message) = match outcome.status {
        AssignStatus::Assigned { bucket_id, task_id } => {
            ("assigned", Some(bucket_id), Some(task_id), None)
        }
        AssignStatus::Skipped => ("skipped", None, None, None),
        AssignStatus::Unclassified => ("unclassified", None, None, Some(UNCLASSIFIED_MESSAGE)),
    };

    Ok(Json(AssignTaskResp {
        status,
        bucket_id,
        task_id,
        message,
        buckets: outcome.buckets,
    }))
}

/// GET `/users/{user_id}/tasks/{task_id}`
pub async fn get_task(
    State(service): State<OrganizerService>,
    Path((user_id, task_id)): Path<(String, String)>,
) -> Result<Json<TaskView>, AppError> {
    service
        .get_task(&user_id, &task_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("task `{}` not found", task_id)))
}

/// PATCH `/users/{user_id}/tasks/{task_id}`: partial edit and/or move.
pub async fn update_task(
    State(service): State<OrganizerService>,
    Path((user_id, task_id)): Path<(String, String)>,
    Json(payload): Json<TaskUpdate>,
) -> Result<Json<Vec<BucketView>>, AppError> {
    Ok(Json(service.update_task(&user_id, &task_id, payload).await?))
}

/// DELETE `/users/{user_id}/tasks/{task_id}`: mark complete (removes it).
pub async fn complete_task(
    State(service): State<OrganizerService>,
    Path((user_id, task_id)): Path<(String, String)>,
) -> Result<Json<Vec<BucketView>>, AppError> {
    Ok(Json(service.complete_task(&user_id, &task_id).await?))
}
