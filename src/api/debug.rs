//! Diagnostic endpoints

use axum::http::{HeaderMap, header};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::types::Json;

#[derive(Debug, Serialize, ToSchema)]
pub struct DebugOriginResponse {
    pub origin: Option<String>,
}

/// GET /debug-origin
///
/// Echoes the caller's Origin header, for diagnosing CORS issues from the
/// frontend side.
#[utoipa::path(
    get,
    path = "/debug-origin",
    tag = "Debug",
    responses(
        (status = 200, description = "Declared request origin", body = DebugOriginResponse),
    ),
)]
pub async fn debug_origin(headers: HeaderMap) -> Json<DebugOriginResponse> {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(String::from);

    Json(DebugOriginResponse { origin })
}
