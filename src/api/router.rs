use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    response::Redirect,
    routing::{get, post},
};
use regex::Regex;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::docs::ApiDoc;
use super::state::AppState;
use super::{debug, deliverables, health, webhooks};
use crate::config::CorsConfig;

/// Create the application router with CORS, tracing and API docs.
pub fn create_router(state: AppState, cors_config: &CorsConfig) -> Router {
    Router::new()
        .route("/deliverables", get(deliverables::list_deliverables))
        .route("/airtable/event", post(webhooks::airtable_event))
        .route("/airtable/warmup", post(webhooks::airtable_warmup))
        .route("/debug-origin", get(debug::debug_origin))
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .route("/", get(|| async { Redirect::permanent("/docs") }))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}

/// Build the CORS layer from the configured origin patterns.
///
/// Credentialed requests are allowed only for origins matching one of the
/// compiled patterns; invalid patterns are skipped with a warning.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let patterns: Arc<Vec<Regex>> = Arc::new(
        config
            .allowed_origin_patterns
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    warn!(pattern = %pattern, error = %e, "invalid CORS origin pattern, skipping");
                    None
                }
            })
            .collect(),
    );

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request_parts| {
                origin
                    .to_str()
                    .map(|origin| patterns.iter().any(|regex| regex.is_match(origin)))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-airtable-secret"),
        ])
        .allow_credentials(true)
}
