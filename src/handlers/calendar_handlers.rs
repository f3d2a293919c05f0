//! HTTP handlers for the calendar view.

use crate::{
    errors::AppError,
    models::views::CalendarDay,
    services::organizer_service::OrganizerService,
};
use axum::{
    Json,
    extract::{Path, State},
};

/// GET `/users/{user_id}/calendar`
pub async fn load_calendar(
    State(service): State<OrganizerService>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<CalendarDay>>, AppError> {
    Ok(Json(service.load_calendar(&user_id).await?))
}

/// DELETE `/users/{user_id}/calendar/tasks/{task_id}`: returns the calendar.
pub async fn delete_task(
    State(service): State<OrganizerService>,
    Path((user_id, task_id)): Path<(String, String)>,
) -> Result<Json<Vec<CalendarDay>>, AppError> {
    Ok(Json(
        service.delete_task_from_calendar(&user_id, &task_id).await?,
    ))
}
