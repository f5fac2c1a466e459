use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::AirtableConfig;
use crate::domain::{DeliverableRecord, DeliverableSource, DomainError};

const DEFAULT_AIRTABLE_BASE_URL: &str = "https://api.airtable.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Upstream rows carry the phone prefixed with this marker; the filter
/// formula must match the full stored value.
const PHONE_FILTER_PREFIX: &str = "TIKTOK USA ";

/// Field projection requested on every listing
const DELIVERABLE_FIELDS: [&str; 14] = [
    "EntregableID",
    "Dia de Entregable",
    "Name (from 1 Cuenta)",
    "Crewstr",
    "Celular",
    "Sound Link",
    "Text to use on post",
    "Link Cover Image",
    "Short Hooks Images",
    "Link To Short hook Image",
    "Book - Author - Tropes",
    "Hashtags for post",
    "Numero de Post",
    "LINK PARA REPORTAR EL POST",
];

/// Airtable REST client for listing deliverable records.
///
/// Credentials and identifiers come from [`AirtableConfig`]; missing ones
/// surface as configuration errors at call time rather than at startup.
#[derive(Debug, Clone)]
pub struct AirtableClient {
    client: reqwest::Client,
    base_url: String,
    config: AirtableConfig,
}

impl AirtableClient {
    pub fn new(config: AirtableConfig) -> Self {
        Self::with_base_url(config, DEFAULT_AIRTABLE_BASE_URL)
    }

    pub fn with_base_url(config: AirtableConfig, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
            config,
        }
    }

    fn records_url(&self) -> Result<String, DomainError> {
        let base_id = require(&self.config.base_id, "BASE_ID")?;
        let table_id = require(&self.config.table_id, "TABLE_ID")?;

        Ok(format!("{}/v0/{}/{}", self.base_url, base_id, table_id))
    }

    /// Builds the `filterByFormula` expression scoping results to a phone.
    fn phone_formula(&self, phone: &str) -> Result<String, DomainError> {
        let phone_field = require(&self.config.phone_field, "PHONE_FIELD")?;

        Ok(format!(
            "{{{}}} = '{}{}'",
            phone_field, PHONE_FILTER_PREFIX, phone
        ))
    }

    fn list_query(&self, phone: Option<&str>) -> Result<Vec<(String, String)>, DomainError> {
        let mut query = Vec::new();

        if let Some(view_id) = &self.config.view_id {
            query.push(("view".to_string(), view_id.clone()));
        }

        if let Some(phone) = phone {
            query.push(("filterByFormula".to_string(), self.phone_formula(phone)?));
        }

        for field in DELIVERABLE_FIELDS {
            query.push(("fields[]".to_string(), field.to_string()));
        }

        Ok(query)
    }
}

fn require<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, DomainError> {
    value
        .as_deref()
        .ok_or_else(|| DomainError::configuration(format!("{} is not set", name)))
}

#[derive(Debug, Deserialize)]
struct ListRecordsResponse {
    #[serde(default)]
    records: Vec<DeliverableRecord>,
    offset: Option<String>,
}

#[async_trait]
impl DeliverableSource for AirtableClient {
    async fn list(&self, phone: Option<&str>) -> Result<Vec<DeliverableRecord>, DomainError> {
        let pat = require(&self.config.pat, "AIRTABLE_PAT")?;
        let url = self.records_url()?;
        let query = self.list_query(phone)?;

        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut request = self.client.get(&url).bearer_auth(pat).query(&query);

            if let Some(cursor) = &offset {
                request = request.query(&[("offset", cursor.as_str())]);
            }

            let response = request.send().await.map_err(|e| {
                DomainError::provider("airtable", format!("Request failed: {}", e))
            })?;

            if !response.status().is_success() {
                let status = response.status();
                let error_body = response.text().await.unwrap_or_default();
                return Err(DomainError::provider(
                    "airtable",
                    format!("HTTP {}: {}", status, error_body),
                ));
            }

            let page: ListRecordsResponse = response.json().await.map_err(|e| {
                DomainError::provider("airtable", format!("Failed to parse response: {}", e))
            })?;

            records.extend(page.records);

            match page.offset {
                Some(cursor) => offset = Some(cursor),
                None => break,
            }
        }

        debug!(count = records.len(), phone = ?phone, "listed deliverable records");

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> AirtableConfig {
        AirtableConfig {
            pat: Some("pat-test".to_string()),
            base_id: Some("appBase".to_string()),
            table_id: Some("tblTable".to_string()),
            view_id: Some("viwView".to_string()),
            phone_field: Some("Celular".to_string()),
            webhook_secret: None,
        }
    }

    #[test]
    fn test_phone_formula() {
        let client = AirtableClient::new(test_config());
        assert_eq!(
            client.phone_formula("555").unwrap(),
            "{Celular} = 'TIKTOK USA 555'"
        );
    }

    #[test]
    fn test_list_query_without_phone_has_no_formula() {
        let client = AirtableClient::new(test_config());
        let query = client.list_query(None).unwrap();

        assert!(query.iter().all(|(k, _)| k != "filterByFormula"));
        assert_eq!(
            query.iter().filter(|(k, _)| k == "fields[]").count(),
            DELIVERABLE_FIELDS.len()
        );
    }

    #[tokio::test]
    async fn test_missing_pat_is_a_configuration_error() {
        let mut config = test_config();
        config.pat = None;
        let client = AirtableClient::new(config);

        let err = client.list(None).await.unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_missing_phone_field_fails_only_the_filtered_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/appBase/tblTable"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
            .mount(&server)
            .await;

        let mut config = test_config();
        config.phone_field = None;
        let client = AirtableClient::with_base_url(config, server.uri());

        assert!(client.list(None).await.is_ok());

        let err = client.list(Some("555")).await.unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_list_sends_filter_view_and_auth() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v0/appBase/tblTable"))
            .and(bearer_token("pat-test"))
            .and(query_param("view", "viwView"))
            .and(query_param("filterByFormula", "{Celular} = 'TIKTOK USA 555'"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [
                    {"id": "rec1", "createdTime": "2024-05-01T12:00:00.000Z",
                     "fields": {"Celular": "TIKTOK USA 555"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AirtableClient::with_base_url(test_config(), server.uri());
        let records = client.list(Some("555")).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "rec1");
    }

    #[tokio::test]
    async fn test_list_follows_offset_pagination() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v0/appBase/tblTable"))
            .and(query_param("offset", "itrNext"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [{"id": "rec2", "fields": {}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v0/appBase/tblTable"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [{"id": "rec1", "fields": {}}],
                "offset": "itrNext"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AirtableClient::with_base_url(test_config(), server.uri());
        let records = client.list(None).await.unwrap();

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rec1", "rec2"]);
    }

    #[tokio::test]
    async fn test_upstream_error_propagates_as_provider_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v0/appBase/tblTable"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client = AirtableClient::with_base_url(test_config(), server.uri());
        let err = client.list(None).await.unwrap_err();

        match err {
            DomainError::Provider { provider, message } => {
                assert_eq!(provider, "airtable");
                assert!(message.contains("503"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
