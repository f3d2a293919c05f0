//! HTTP handlers for bucket operations. Every route carries the owning user
//! id in its path; ids the user does not own come back as the unchanged
//! bucket list.

use crate::{
    errors::AppError,
    models::views::BucketView,
    services::organizer_service::OrganizerService,
};
use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

/// Body for `POST` (create) and `PATCH` (rename) on buckets.
#[derive(Debug, Deserialize)]
pub struct BucketNameReq {
    pub name: String,
}

/// GET `/users/{user_id}/buckets`
pub async fn list_buckets(
    State(service): State<OrganizerService>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<BucketView>>, AppError> {
    Ok(Json(service.load_buckets(&user_id).await?))
}

/// POST `/users/{user_id}/buckets`: create an empty bucket.
pub async fn create_bucket(
    State(service): State<OrganizerService>,
    Path(user_id): Path<String>,
    Json(payload): Json<BucketNameReq>,
) -> Result<Json<Vec<BucketView>>, AppError> {
    Ok(Json(
        service.create_empty_bucket(&user_id, &payload.name).await?,
    ))
}

/// PATCH `/users/{user_id}/buckets/{bucket_id}`: rename.
pub async fn rename_bucket(
    State(service): State<OrganizerService>,
    Path((user_id, bucket_id)): Path<(String, String)>,
    Json(payload): Json<BucketNameReq>,
) -> Result<Json<Vec<BucketView>>, AppError> {
    Ok(Json(
        service
            .rename_bucket(&user_id, &bucket_id, &payload.name)
            .await?,
    ))
}

/// DELETE `/users/{user_id}/buckets/{bucket_id}`: delete bucket and its tasks.
pub async fn delete_bucket(
    State(service): State<OrganizerService>,
    Path((user_id, bucket_id)): Path<(String, String)>,
) -> Result<Json<Vec<BucketView>>, AppError> {
    Ok(Json(service.delete_bucket(&user_id, &bucket_id).await?))
}
