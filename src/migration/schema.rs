// ABOUTME: Schema cloning stage - wipes the target and recreates source classes
// ABOUTME: Schema fetch failures are fatal, per-class creation failures are not

use anyhow::{Context, Result};

use crate::utils::sanitize_identifier;
use crate::weaviate::{CollectionDef, WeaviateClient};

/// Outcome of the schema cloning stage.
#[derive(Debug, Clone)]
pub struct SchemaCloneReport {
    /// Every class listed by the source, including ones whose creation failed.
    /// Data streaming is driven by this list.
    pub classes: Vec<CollectionDef>,
    pub created: usize,
    pub failed: usize,
}

/// Clone the source schema into the target.
///
/// Deletes every existing target collection first (irreversible), then fetches
/// the source schema and recreates each class. A failure wiping the target or
/// fetching the schema aborts the whole run; a failure creating one class is
/// logged and the remaining classes are still attempted.
pub async fn clone_schema(
    source: &WeaviateClient,
    target: &WeaviateClient,
) -> Result<SchemaCloneReport> {
    tracing::info!("Deleting existing collections on target...");
    let removed = target
        .delete_all_collections()
        .await
        .context("Failed to wipe target schema")?;
    tracing::info!("Removed {} collection(s) from target", removed);

    tracing::info!("Fetching schema from source...");
    let schema = source
        .fetch_schema()
        .await
        .context("Failed to fetch schema from source")?;
    tracing::info!("Found {} collection(s) in source", schema.classes.len());

    let mut created = 0;
    let mut failed = 0;
    for def in &schema.classes {
        let name = sanitize_identifier(def.display_name());
        match target.create_collection(def).await {
            Ok(()) => {
                tracing::info!("✓ Created collection '{}'", name);
                created += 1;
            }
            Err(e) => {
                tracing::error!("✗ Failed to create collection '{}': {:#}", name, e);
                failed += 1;
            }
        }
    }

    Ok(SchemaCloneReport {
        classes: schema.classes,
        created,
        failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn empty_target() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/schema"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "classes": [] })),
            )
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_schema_fetch_failure_creates_nothing() {
        let source = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/schema"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&source)
            .await;

        let target = empty_target().await;
        Mock::given(method("POST"))
            .and(path("/v1/schema"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&target)
            .await;

        let source_client = WeaviateClient::new(&source.uri(), "k").unwrap();
        let target_client = WeaviateClient::new(&target.uri(), "k").unwrap();

        let err = clone_schema(&source_client, &target_client)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to fetch schema from source"));
    }

    #[tokio::test]
    async fn test_per_class_creation_failure_continues() {
        let source = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/schema"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "classes": [ { "class": "Article" }, { "class": "Author" } ]
            })))
            .mount(&source)
            .await;

        let target = empty_target().await;
        // First creation is rejected, second succeeds.
        Mock::given(method("POST"))
            .and(path("/v1/schema"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid class"))
            .up_to_n_times(1)
            .mount(&target)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/schema"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&target)
            .await;

        let source_client = WeaviateClient::new(&source.uri(), "k").unwrap();
        let target_client = WeaviateClient::new(&target.uri(), "k").unwrap();

        let report = clone_schema(&source_client, &target_client).await.unwrap();
        assert_eq!(report.classes.len(), 2);
        assert_eq!(report.created, 1);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn test_target_is_wiped_before_creation() {
        let source = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/schema"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "classes": [ { "class": "Article" } ]
            })))
            .mount(&source)
            .await;

        let target = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/schema"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "classes": [ { "class": "Stale" } ]
            })))
            .mount(&target)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v1/schema/Stale"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&target)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/schema"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&target)
            .await;

        let source_client = WeaviateClient::new(&source.uri(), "k").unwrap();
        let target_client = WeaviateClient::new(&target.uri(), "k").unwrap();

        let report = clone_schema(&source_client, &target_client).await.unwrap();
        assert_eq!(report.created, 1);
        assert_eq!(report.failed, 0);
    }
}
