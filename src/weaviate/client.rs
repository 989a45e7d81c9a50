// ABOUTME: Thin typed client over the Weaviate REST and GraphQL endpoints
// ABOUTME: Handles auth headers, status checking, pagination, and batch writes

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use uuid::Uuid;

use crate::weaviate::objects::{BatchRequest, BatchResultItem, ObjectRecord, ObjectsPage};
use crate::weaviate::schema::{CollectionDef, Schema};

/// Client for one Weaviate instance, identified by its REST base URL.
///
/// The API key is attached to every request as both a bearer token and an
/// `X-API-KEY` header; deployments differ in which one they read.
#[derive(Debug, Clone)]
pub struct WeaviateClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeaviateClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe `GET /v1/.well-known/ready`; errors when the instance is
    /// unreachable or reports itself not ready.
    pub async fn check_ready(&self) -> Result<()> {
        let response = self
            .get("/v1/.well-known/ready")
            .send()
            .await
            .with_context(|| format!("Could not reach Weaviate at {}", self.base_url))?;
        if !response.status().is_success() {
            bail!(
                "Weaviate at {} is not ready (status {})",
                self.base_url,
                response.status()
            );
        }
        Ok(())
    }

    /// Fetch the full schema document.
    pub async fn fetch_schema(&self) -> Result<Schema> {
        let response = self
            .get("/v1/schema")
            .send()
            .await
            .with_context(|| format!("Schema request to {} failed", self.base_url))?;
        let response = ensure_success(response, "Schema fetch").await?;
        response
            .json::<Schema>()
            .await
            .context("Failed to parse schema document")
    }

    /// Create one collection from a full class document.
    pub async fn create_collection(&self, def: &CollectionDef) -> Result<()> {
        let response = self
            .post("/v1/schema")
            .json(def)
            .send()
            .await
            .with_context(|| format!("Create request to {} failed", self.base_url))?;
        ensure_success(response, &format!("Creation of '{}'", def.display_name())).await?;
        Ok(())
    }

    /// Delete one collection by name.
    pub async fn delete_collection(&self, class: &str) -> Result<()> {
        let response = self
            .delete(&format!("/v1/schema/{}", class))
            .send()
            .await
            .with_context(|| format!("Delete request to {} failed", self.base_url))?;
        ensure_success(response, &format!("Deletion of '{}'", class)).await?;
        Ok(())
    }

    /// Delete every collection this instance currently has. Returns the number
    /// removed. Any single failure aborts the wipe.
    pub async fn delete_all_collections(&self) -> Result<usize> {
        let schema = self.fetch_schema().await?;
        let mut removed = 0;
        for class in &schema.classes {
            if !class.is_named() {
                continue;
            }
            self.delete_collection(&class.name).await?;
            removed += 1;
        }
        Ok(removed)
    }

    /// One page of objects for a class, vectors included. `after` is the id of
    /// the last object of the previous page (Weaviate cursor pagination); the
    /// listing is exhausted when a page comes back shorter than `limit`.
    pub async fn list_objects(
        &self,
        class: &str,
        after: Option<&Uuid>,
        limit: usize,
    ) -> Result<ObjectsPage> {
        let response = self
            .get("/v1/objects")
            .query(&objects_query(class, after, limit))
            .send()
            .await
            .with_context(|| format!("Object listing request to {} failed", self.base_url))?;
        let response =
            ensure_success(response, &format!("Object listing for '{}'", class)).await?;
        response
            .json::<ObjectsPage>()
            .await
            .with_context(|| format!("Failed to parse object listing for '{}'", class))
    }

    /// Submit one batch of objects; returns the service's per-object outcomes.
    pub async fn insert_batch(&self, objects: &[ObjectRecord]) -> Result<Vec<BatchResultItem>> {
        let response = self
            .post("/v1/batch/objects")
            .json(&BatchRequest { objects })
            .send()
            .await
            .with_context(|| format!("Batch request to {} failed", self.base_url))?;
        let response = ensure_success(response, "Batch insert").await?;
        response
            .json::<Vec<BatchResultItem>>()
            .await
            .context("Failed to parse batch response")
    }

    /// Authoritative object count for a class, via the GraphQL Aggregate API.
    pub async fn count_objects(&self, class: &str) -> Result<u64> {
        let body = serde_json::json!({ "query": aggregate_query(class) });
        let response = self
            .post("/v1/graphql")
            .json(&body)
            .send()
            .await
            .with_context(|| format!("GraphQL request to {} failed", self.base_url))?;
        let response =
            ensure_success(response, &format!("Aggregate count for '{}'", class)).await?;
        let payload: Value = response
            .json()
            .await
            .context("Failed to parse aggregate response")?;
        parse_aggregate_count(&payload, class)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.auth(self.http.get(self.url(path)))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.auth(self.http.post(self.url(path)))
    }

    fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.auth(self.http.delete(self.url(path)))
    }

    fn auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("X-API-KEY", self.api_key.as_str())
    }
}

/// Pass the response through when 2xx, otherwise turn status and body into an
/// error so callers get the service's own message.
async fn ensure_success(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    bail!("{} failed with status {}: {}", what, status, body.trim())
}

fn objects_query(class: &str, after: Option<&Uuid>, limit: usize) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("class", class.to_string()),
        ("limit", limit.to_string()),
        ("include", "vector".to_string()),
    ];
    if let Some(cursor) = after {
        query.push(("after", cursor.to_string()));
    }
    query
}

fn aggregate_query(class: &str) -> String {
    format!("{{ Aggregate {{ {} {{ meta {{ count }} }} }} }}", class)
}

fn parse_aggregate_count(payload: &Value, class: &str) -> Result<u64> {
    if let Some(first) = payload
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
    {
        let message = first
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown GraphQL error");
        bail!("Aggregate query for '{}' failed: {}", class, message);
    }
    payload["data"]["Aggregate"][class][0]["meta"]["count"]
        .as_u64()
        .ok_or_else(|| anyhow!("Unexpected aggregate response shape for '{}'", class))
}
