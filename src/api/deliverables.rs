//! Deliverables read endpoint

use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::{debug, info};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::DeliverablesPayload;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeliverablesQuery {
    /// Filter by phone number
    pub phone: Option<String>,
}

/// GET /deliverables
///
/// Serves the cached group for the phone (or the unfiltered group) when
/// present; otherwise fetches from the upstream table, caches the result,
/// and returns it.
#[utoipa::path(
    get,
    path = "/deliverables",
    tag = "Deliverables",
    params(DeliverablesQuery),
    responses(
        (status = 200, description = "Deliverable records", body = DeliverablesPayload),
        (status = 500, description = "Upstream or internal failure", body = crate::api::types::ApiErrorResponse),
    ),
)]
pub async fn list_deliverables(
    State(state): State<AppState>,
    Query(query): Query<DeliverablesQuery>,
) -> Result<Json<DeliverablesPayload>, ApiError> {
    let phone = query.phone.as_deref().filter(|p| !p.is_empty());

    if let Some(cached) = state.cache.group(phone).await? {
        debug!(phone = ?phone, "cache hit");
        return Ok(Json(cached));
    }

    let request_id = Uuid::new_v4();
    info!(%request_id, phone = ?phone, "cache miss, fetching deliverables upstream");

    let records = state.deliverables.list(phone).await?;
    let payload = DeliverablesPayload::new(records);

    state.cache.store_group(phone, &payload).await?;

    Ok(Json(payload))
}
