use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::services::registry::MountainRegistry;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status ("ok" when healthy)
    pub status: String,
    /// API version
    pub version: String,
    /// Number of mountains in the registry
    pub mountains: usize,
}

/// Health check endpoint.
///
/// Returns the API status, version and registry size. The service has no
/// database; an empty registry is the only startup condition worth flagging,
/// reported as "degraded" (still 200).
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_check(State(registry): State<Arc<MountainRegistry>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: if registry.is_empty() {
            "degraded".to_string()
        } else {
            "ok".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        mountains: registry.len(),
    })
}
