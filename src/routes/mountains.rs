//! Mountain registry HTTP endpoints.
//!
//! - GET /api/v1/mountains
//! - GET /api/v1/mountains/:mountain_id

use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

use crate::errors::AppError;
use crate::models::Mountain;
use crate::services::registry::MountainRegistry;

/// List all mountains in the registry.
#[utoipa::path(
    get,
    path = "/api/v1/mountains",
    tag = "Mountains",
    responses(
        (status = 200, description = "All registered mountains", body = Vec<Mountain>),
    )
)]
pub async fn list_mountains(State(registry): State<Arc<MountainRegistry>>) -> Json<Vec<Mountain>> {
    Json(registry.list().to_vec())
}

/// Get a single mountain by its slug id.
#[utoipa::path(
    get,
    path = "/api/v1/mountains/{mountain_id}",
    tag = "Mountains",
    params(
        ("mountain_id" = String, Path, description = "Mountain slug, e.g. \"yarigatake\""),
    ),
    responses(
        (status = 200, description = "The mountain", body = Mountain),
        (status = 404, description = "Unknown mountain id", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_mountain(
    State(registry): State<Arc<MountainRegistry>>,
    Path(mountain_id): Path<String>,
) -> Result<Json<Mountain>, AppError> {
    registry
        .get(&mountain_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Mountain '{}' not found", mountain_id)))
}
