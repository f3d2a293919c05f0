//! Defines routes for all bucket, task and calendar operations.
//!
//! ## Structure
//! - **Bucket-level endpoints**
//!   - `GET    /users/{user_id}/buckets`: list buckets with their tasks
//!   - `POST   /users/{user_id}/buckets`: create an empty bucket
//!   - `PATCH  /users/{user_id}/buckets/{bucket_id}`: rename
//!   - `DELETE /users/{user_id}/buckets/{bucket_id}`: delete (cascades to tasks)
//!
//! - **Task-level endpoints**
//!   - `POST   /users/{user_id}/tasks`: classify and assign free-form text
//!   - `GET    /users/{user_id}/tasks/{task_id}`: fetch one task
//!   - `PATCH  /users/{user_id}/tasks/{task_id}`: edit fields / move
//!   - `DELETE /users/{user_id}/tasks/{task_id}`: complete
//!
//! - **Calendar endpoints**
//!   - `GET    /users/{user_id}/calendar`
//!   - `DELETE /users/{user_id}/calendar/tasks/{task_id}`

use crate::{
    handlers::{
        bucket_handlers::{create_bucket, delete_bucket, list_buckets, rename_bucket},
        calendar_handlers::{delete_task as delete_calendar_task, load_calendar},
        health_handlers::{healthz, readyz},
        task_handlers::{assign_task, complete_task, get_task, update_task},
    },
    services::organizer_service::OrganizerService,
};
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

/// Build and return the router for all organizer routes.
///
/// The router carries shared state (`OrganizerService`) to all handlers.
pub fn routes() -> Router<OrganizerService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Bucket-level routes
        .route(
            "/users/{user_id}/buckets",
            get(list_buckets).post(create_bucket),
        )
        .route(
            "/users/{user_id}/buckets/{bucket_id}",
            patch(rename_bucket).delete(delete_bucket),
        )
        // Task-level routes
        .route("/users/{user_id}/tasks", post(assign_task))
        .route(
            "/users/{user_id}/tasks/{task_id}",
            get(get_task).patch(update_task).delete(complete_task),
        )
        // Calendar routes
        .route("/users/{user_id}/calendar", get(load_calendar))
        .route(
            "/users/{user_id}/calendar/tasks/{task_id}",
            delete(delete_calendar_task),
        )
}
