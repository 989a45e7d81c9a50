// ABOUTME: Serde types for the Weaviate schema document
// ABOUTME: Class definitions are carried opaquely so vector config round-trips

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Full schema document as returned by `GET /v1/schema`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub classes: Vec<CollectionDef>,
}

/// One class definition from the schema document.
///
/// Only the class name is interpreted; everything else (properties, vectorizer,
/// vector index config, replication settings) is kept in `definition` and written
/// back to the target byte-for-byte.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionDef {
    #[serde(rename = "class", default)]
    pub name: String,
    #[serde(flatten)]
    pub definition: Map<String, Value>,
}

impl CollectionDef {
    /// Name for log lines; the service can in principle return a class document
    /// without a name.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "unknown"
        } else {
            &self.name
        }
    }

    /// True when the document carries a usable class name.
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}
