//! Airtable webhook endpoints that keep the cache warm

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;
use utoipa::ToSchema;

use crate::api::middleware::RequireWebhookSecret;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::DeliverableRecord;

/// Body of a single record-changed event
#[derive(Debug, Deserialize, ToSchema)]
pub struct AirtableEventRequest {
    pub record_id: Option<String>,
    pub phone: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub fields: Option<Map<String, Value>>,
}

/// Body of a warmup load
#[derive(Debug, Deserialize, ToSchema)]
pub struct WarmupRequest {
    /// Full record list; must be a JSON array
    #[schema(value_type = Option<Vec<Object>>)]
    pub records: Option<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    pub status: String,
}

impl WebhookAck {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WarmupResponse {
    pub status: String,
    pub phones_loaded: usize,
    pub records_loaded: usize,
}

/// POST /airtable/event
///
/// Applies a single changed record to its phone group in the cache.
#[utoipa::path(
    post,
    path = "/airtable/event",
    tag = "Webhooks",
    request_body = AirtableEventRequest,
    params(("x-airtable-secret" = String, Header, description = "Shared webhook secret")),
    responses(
        (status = 200, description = "Record applied (or dropped for lack of a phone field)", body = WebhookAck),
        (status = 400, description = "Missing record_id, phone or fields", body = crate::api::types::ApiErrorResponse),
        (status = 401, description = "Invalid secret", body = crate::api::types::ApiErrorResponse),
        (status = 500, description = "Internal failure", body = crate::api::types::ApiErrorResponse),
    ),
)]
pub async fn airtable_event(
    _auth: RequireWebhookSecret,
    State(state): State<AppState>,
    Json(body): Json<AirtableEventRequest>,
) -> Result<Json<WebhookAck>, ApiError> {
    let record_id = match body.record_id {
        Some(id) if !id.is_empty() => id,
        _ => return Err(missing_event_fields()),
    };

    if body.phone.as_deref().is_none_or(str::is_empty) {
        return Err(missing_event_fields());
    }

    let fields = match body.fields {
        Some(fields) if !fields.is_empty() => fields,
        _ => return Err(missing_event_fields()),
    };

    let applied = state
        .cache
        .update_record(DeliverableRecord::new(record_id, fields))
        .await?;

    info!(applied, "processed airtable event");

    Ok(Json(WebhookAck::ok()))
}

/// POST /airtable/warmup
///
/// Clears the whole cache and reloads it from the supplied record list,
/// one entry per phone group.
#[utoipa::path(
    post,
    path = "/airtable/warmup",
    tag = "Webhooks",
    request_body = WarmupRequest,
    params(("x-airtable-secret" = String, Header, description = "Shared webhook secret")),
    responses(
        (status = 200, description = "Cache reloaded", body = WarmupResponse),
        (status = 400, description = "Missing or invalid records list", body = crate::api::types::ApiErrorResponse),
        (status = 401, description = "Invalid secret", body = crate::api::types::ApiErrorResponse),
        (status = 500, description = "Internal failure", body = crate::api::types::ApiErrorResponse),
    ),
)]
pub async fn airtable_warmup(
    _auth: RequireWebhookSecret,
    State(state): State<AppState>,
    Json(body): Json<WarmupRequest>,
) -> Result<Json<WarmupResponse>, ApiError> {
    let Some(Value::Array(items)) = body.records else {
        return Err(ApiError::bad_request("Missing or invalid records list"));
    };

    let total = items.len();
    let records: Vec<DeliverableRecord> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    let summary = state.cache.warm(records).await?;

    info!(
        phones_loaded = summary.phones_loaded,
        records_loaded = total,
        records_dropped = summary.records_dropped,
        "cache warmed"
    );

    Ok(Json(WarmupResponse {
        status: "ok".to_string(),
        phones_loaded: summary.phones_loaded,
        records_loaded: total,
    }))
}

fn missing_event_fields() -> ApiError {
    ApiError::bad_request("Missing record_id, phone or fields")
}
