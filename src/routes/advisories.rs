//! Advisory HTTP endpoints.
//!
//! - GET /api/v1/advisories/:mountain_id: advisory grid for one mountain
//! - GET /api/v1/advisories: advisory grids for every registered mountain
//!
//! Advisories are always produced: a provider failure degrades to a
//! synthetic forecast (visible in `report.meta.source`), never to an error
//! response.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::models::{DifficultyTier, Mountain};
use crate::services::advisory::{self, AdvisoryReport};
use crate::services::cache::MemoryCache;
use crate::services::open_meteo::OpenMeteoClient;
use crate::services::registry::MountainRegistry;

/// Shared application state for advisory endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) registry: Arc<MountainRegistry>,
    pub(crate) client: OpenMeteoClient,
    pub(crate) cache: Arc<MemoryCache>,
}

/// Advisory response for a single mountain.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdvisoryResponse {
    /// Mountain slug id
    pub mountain_id: String,
    /// Mountain display name
    pub name: String,
    /// Difficulty tier the thresholds were taken from
    pub tier: DifficultyTier,
    /// Advisory grid, detail grid and provenance metadata
    pub report: AdvisoryReport,
}

/// Bulk advisory response for all registered mountains.
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkAdvisoryResponse {
    pub advisories: Vec<AdvisoryResponse>,
}

fn advisory_response(mountain: &Mountain, report: AdvisoryReport) -> AdvisoryResponse {
    AdvisoryResponse {
        mountain_id: mountain.id.clone(),
        name: mountain.name.clone(),
        tier: mountain.tier,
        report,
    }
}

/// Get the 4-day advisory grid for one mountain.
///
/// Each cell is "good", "caution", "poor" or null (no forecast data for
/// that slot). The parallel detail grid carries the numeric inputs behind
/// every category for display of "why this score".
#[utoipa::path(
    get,
    path = "/api/v1/advisories/{mountain_id}",
    tag = "Advisories",
    params(
        ("mountain_id" = String, Path, description = "Mountain slug, e.g. \"yarigatake\""),
    ),
    responses(
        (status = 200, description = "Advisory and detail grids", body = AdvisoryResponse),
        (status = 404, description = "Unknown mountain id", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_mountain_advisory(
    State(state): State<AppState>,
    Path(mountain_id): Path<String>,
) -> Result<Json<AdvisoryResponse>, AppError> {
    let mountain = state
        .registry
        .get(&mountain_id)
        .ok_or_else(|| AppError::NotFound(format!("Mountain '{}' not found", mountain_id)))?;

    let report = advisory::resolve_advisory(
        &state.client,
        state.cache.as_ref(),
        mountain,
        advisory::today_local(),
    )
    .await;

    Ok(Json(advisory_response(mountain, report)))
}

/// Get advisory grids for every registered mountain.
///
/// Provider fetches run in parallel; a failure for one mountain degrades
/// that mountain to a synthetic forecast without affecting the others.
#[utoipa::path(
    get,
    path = "/api/v1/advisories",
    tag = "Advisories",
    responses(
        (status = 200, description = "Advisories for all mountains", body = BulkAdvisoryResponse),
    )
)]
pub async fn list_advisories(State(state): State<AppState>) -> Json<BulkAdvisoryResponse> {
    let today = advisory::today_local();

    let tasks: Vec<_> = state
        .registry
        .list()
        .iter()
        .map(|mountain| {
            let client = &state.client;
            let cache = state.cache.as_ref();
            async move {
                let report = advisory::resolve_advisory(client, cache, mountain, today).await;
                advisory_response(mountain, report)
            }
        })
        .collect();

    let advisories = futures::future::join_all(tasks).await;

    Json(BulkAdvisoryResponse { advisories })
}
