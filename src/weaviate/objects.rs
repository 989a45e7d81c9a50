// ABOUTME: Serde types for the Weaviate objects and batch APIs
// ABOUTME: Covers paginated listing, single and named vectors, and batch outcomes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One object as listed by the source or submitted to the target batch API.
///
/// Listing responses carry extra fields (creation timestamps, deprecation notes);
/// those are dropped on read so the batch payload contains exactly what the
/// migration needs: class, identifier, properties, and vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub class: String,
    pub id: Uuid,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vectors: Option<BTreeMap<String, Vec<f32>>>,
}

/// One page from `GET /v1/objects`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectsPage {
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,
    /// Reported by the service for the first page only; informational.
    #[serde(default, rename = "totalResults")]
    pub total_results: Option<i64>,
}

/// Request body for `POST /v1/batch/objects`.
#[derive(Debug, Serialize)]
pub struct BatchRequest<'a> {
    pub objects: &'a [ObjectRecord],
}

/// Per-object outcome inside a batch response.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResultItem {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub result: BatchResultStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchResultStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub errors: Option<BatchErrors>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchErrors {
    #[serde(default)]
    pub error: Vec<BatchErrorMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchErrorMessage {
    #[serde(default)]
    pub message: String,
}

impl BatchResultItem {
    /// Error text when the service marked this object FAILED, `None` otherwise.
    pub fn failure_message(&self) -> Option<String> {
        if self.result.status.as_deref() != Some("FAILED") {
            return None;
        }
        let detail = self
            .result
            .errors
            .as_ref()
            .and_then(|errs| errs.error.first())
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "no error detail reported".to_string());
        Some(detail)
    }
}
