//! Deliverable record entities
//!
//! Upstream field sets are configured externally and may change, so `fields`
//! is an open mapping rather than a fixed schema.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// A single deliverable record as returned by the upstream table service.
///
/// The gateway never creates or deletes these upstream; it only caches
/// copies keyed by phone number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeliverableRecord {
    /// Opaque upstream record id
    pub id: String,

    /// Upstream creation timestamp, echoed verbatim when present
    #[serde(rename = "createdTime", default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,

    /// Named attributes of the record
    #[serde(default)]
    #[schema(value_type = Object)]
    pub fields: Map<String, Value>,
}

impl DeliverableRecord {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            created_time: None,
            fields,
        }
    }

    /// Extracts the phone number from the named field.
    ///
    /// Numeric values are stringified; empty strings and other value types
    /// count as absent.
    pub fn phone(&self, phone_field: &str) -> Option<String> {
        match self.fields.get(phone_field)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// The cached and served wire shape: a list of deliverable records.
///
/// Invariant: `id` is unique within `records`; `upsert` replaces in place
/// by id, otherwise appends.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct DeliverablesPayload {
    pub records: Vec<DeliverableRecord>,
}

impl DeliverablesPayload {
    pub fn new(records: Vec<DeliverableRecord>) -> Self {
        Self { records }
    }

    /// Replaces the record with a matching id, or appends it.
    pub fn upsert(&mut self, record: DeliverableRecord) {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
