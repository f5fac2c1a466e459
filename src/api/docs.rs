//! OpenAPI document for the deliverables API

use utoipa::OpenApi;

use crate::api::types::ApiErrorResponse;
use crate::api::webhooks::{AirtableEventRequest, WarmupRequest, WarmupResponse, WebhookAck};
use crate::api::{debug::DebugOriginResponse, health::HealthResponse};
use crate::domain::{DeliverableRecord, DeliverablesPayload};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Deliverables Gateway",
        description = "Airtable-backed deliverables API with an in-process cache",
        license(name = "MIT")
    ),
    paths(
        crate::api::deliverables::list_deliverables,
        crate::api::webhooks::airtable_event,
        crate::api::webhooks::airtable_warmup,
        crate::api::debug::debug_origin,
        crate::api::health::health_check,
    ),
    components(schemas(
        DeliverableRecord,
        DeliverablesPayload,
        AirtableEventRequest,
        WarmupRequest,
        WarmupResponse,
        WebhookAck,
        DebugOriginResponse,
        HealthResponse,
        ApiErrorResponse,
    )),
    tags(
        (name = "Deliverables", description = "Cached reads of deliverable records"),
        (name = "Webhooks", description = "Airtable-triggered cache maintenance"),
        (name = "Health", description = "Service probes"),
        (name = "Debug", description = "Diagnostics"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_includes_all_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/deliverables"));
        assert!(paths.iter().any(|p| p.as_str() == "/airtable/event"));
        assert!(paths.iter().any(|p| p.as_str() == "/airtable/warmup"));
        assert!(paths.iter().any(|p| p.as_str() == "/debug-origin"));
    }
}
