//! Webhook shared-secret authentication

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;

/// Header carrying the shared webhook secret
pub const WEBHOOK_SECRET_HEADER: &str = "x-airtable-secret";

/// Extractor that requires a valid `x-airtable-secret` header.
///
/// Rejects with 401 when the header is missing, does not match the
/// configured secret, or no secret is configured at all.
#[derive(Debug, Clone)]
pub struct RequireWebhookSecret;

impl FromRequestParts<AppState> for RequireWebhookSecret {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(configured) = state.webhook_secret.as_deref() else {
            debug!("webhook call rejected: no secret configured");
            return Err(ApiError::unauthorized("Webhook secret is not configured"));
        };

        let provided = parts
            .headers
            .get(WEBHOOK_SECRET_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Invalid secret"))?;

        if !constant_time_compare(provided, configured) {
            return Err(ApiError::unauthorized("Invalid secret"));
        }

        Ok(RequireWebhookSecret)
    }
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut result = 0u8;

    for i in 0..a.len() {
        result |= a_bytes[i] ^ b_bytes[i];
    }

    result == 0
}
