// ABOUTME: Migrate command implementation - the full three-stage pipeline
// ABOUTME: Clones schema, streams every object with vectors, compares counts

use anyhow::{bail, Context, Result};
use std::io::{self, Write};

use crate::config::Config;
use crate::migration::{self, StreamStats};
use crate::utils::sanitize_identifier;
use crate::weaviate::WeaviateClient;

/// Run the full migration from source to target.
///
/// The pipeline runs strictly top to bottom:
/// 1. Connects to both clusters and probes readiness
/// 2. Prompts for confirmation (unless `skip_confirmation` is true); the
///    target schema is deleted irreversibly
/// 3. Clones the schema (wipe target, recreate every source class)
/// 4. Streams every object of every listed class, vectors included, in
///    fixed-size batches
/// 5. Compares per-class object counts as a coarse sanity signal
///
/// Per-class and per-object failures are logged and skipped; only a
/// configuration error, an unreachable cluster, a failed target wipe, or a
/// failed source schema fetch abort the run.
///
/// # Arguments
///
/// * `config` - Resolved connection parameters and batch size
/// * `skip_confirmation` - Skip the destructive-action prompt (`--yes`)
///
/// # Errors
///
/// This function will return an error if:
/// - Either cluster is unreachable or not ready
/// - The user declines the confirmation prompt
/// - The target schema cannot be wiped
/// - The source schema cannot be fetched (nothing is copied in that case)
///
/// # Examples
///
/// ```no_run
/// # use anyhow::Result;
/// # use weaviate_cloud_migrator::{commands, config::Config};
/// # async fn example() -> Result<()> {
/// let config = Config::from_env()?;
/// commands::migrate(&config, true).await?;
/// # Ok(())
/// # }
/// ```
pub async fn migrate(config: &Config, skip_confirmation: bool) -> Result<()> {
    tracing::info!("Starting migration...");

    tracing::info!(
        "Connecting to source at {} (gRPC port {})...",
        config.source.rest_url(),
        config.source.grpc_port
    );
    let source = WeaviateClient::new(&config.source.rest_url(), &config.source.api_key)?;
    source
        .check_ready()
        .await
        .context("Source Weaviate is not reachable")?;

    tracing::info!("Connecting to target at {}...", config.target.rest_url);
    let target = WeaviateClient::new(&config.target.rest_url, &config.target.api_key)?;
    target
        .check_ready()
        .await
        .context("Target Weaviate is not reachable")?;

    if !skip_confirmation && !confirm_wipe(&config.target.rest_url)? {
        bail!("Migration cancelled by user");
    }

    tracing::info!("Step 1/3: Cloning schema...");
    let report = migration::clone_schema(&source, &target).await?;

    tracing::info!("Step 2/3: Streaming objects (batch size {})...", config.batch_size);
    let mut totals = StreamStats::default();
    let mut aborted = 0;
    for def in report.classes.iter().filter(|d| d.is_named()) {
        let name = sanitize_identifier(&def.name);
        tracing::info!("→ Migrating collection '{}'", name);
        match migration::stream_collection(&source, &target, &def.name, config.batch_size).await {
            Ok(stats) => {
                tracing::info!(
                    "✓ '{}': {} inserted, {} failed",
                    name,
                    stats.inserted,
                    stats.failed
                );
                totals.submitted += stats.submitted;
                totals.inserted += stats.inserted;
                totals.failed += stats.failed;
            }
            Err(e) => {
                tracing::error!("✗ Error migrating collection '{}': {:#}", name, e);
                aborted += 1;
            }
        }
    }

    tracing::info!("Step 3/3: Sanity check:");
    let counts = migration::count_comparison(&source, &target, &report.classes).await;
    let mismatches = counts.iter().filter(|r| !r.matches()).count();

    tracing::info!("");
    tracing::info!("========================================");
    tracing::info!("Migration Summary");
    tracing::info!("========================================");
    tracing::info!(
        "Collections: {} created, {} failed to create",
        report.created,
        report.failed
    );
    tracing::info!(
        "Objects: {} read, {} inserted, {} failed",
        totals.submitted,
        totals.inserted,
        totals.failed
    );
    if aborted > 0 {
        tracing::warn!("⚠ {} collection(s) aborted mid-stream", aborted);
    }
    if mismatches > 0 {
        tracing::warn!("⚠ {} collection(s) have differing counts", mismatches);
    } else {
        tracing::info!("✓ Counts match for all {} collection(s)", counts.len());
    }
    tracing::info!("========================================");
    tracing::info!("");
    tracing::info!("🎉 Migration complete");

    Ok(())
}

/// Show what is about to be wiped and ask for confirmation.
fn confirm_wipe(target_url: &str) -> Result<bool> {
    println!();
    println!("This will DELETE every collection on the target and recreate it from source:");
    println!("  target: {}", target_url);
    println!();
    print!("Proceed with migration? [y/N]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read user input")?;

    Ok(input.trim().to_lowercase() == "y")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SourceEndpoint, TargetEndpoint};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(source: &MockServer, target: &MockServer) -> Config {
        let addr = source.address();
        Config {
            source: SourceEndpoint {
                host: addr.ip().to_string(),
                http_port: addr.port(),
                grpc_port: 50051,
                api_key: "sk".to_string(),
            },
            target: TargetEndpoint {
                rest_url: target.uri(),
                api_key: "tk".to_string(),
            },
            batch_size: 10,
        }
    }

    async fn mount_ready(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v1/.well-known/ready"))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_migrate_runs_all_three_stages() {
        let source = MockServer::start().await;
        let target = MockServer::start().await;
        mount_ready(&source).await;
        mount_ready(&target).await;

        Mock::given(method("GET"))
            .and(path("/v1/schema"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "classes": [ { "class": "Article", "vectorizer": "none" } ]
            })))
            .mount(&source)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/objects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "objects": [ {
                    "class": "Article",
                    "id": "00000000-0000-0000-0000-000000000001",
                    "properties": { "title": "only one" },
                    "vector": [0.5, 0.5]
                } ]
            })))
            .mount(&source)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "Aggregate": { "Article": [ { "meta": { "count": 1 } } ] } }
            })))
            .mount(&source)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/schema"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "classes": [] })),
            )
            .mount(&target)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/schema"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&target)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/batch/objects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "id": "00000000-0000-0000-0000-000000000001",
                  "result": { "status": "SUCCESS" } }
            ])))
            .expect(1)
            .mount(&target)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "Aggregate": { "Article": [ { "meta": { "count": 1 } } ] } }
            })))
            .expect(1)
            .mount(&target)
            .await;

        let config = config_for(&source, &target);
        migrate(&config, true).await.unwrap();
    }

    #[tokio::test]
    async fn test_schema_fetch_failure_stops_before_any_copy() {
        let source = MockServer::start().await;
        let target = MockServer::start().await;
        mount_ready(&source).await;
        mount_ready(&target).await;

        Mock::given(method("GET"))
            .and(path("/v1/schema"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&source)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/schema"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "classes": [] })),
            )
            .mount(&target)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/schema"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&target)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/batch/objects"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&target)
            .await;

        let config = config_for(&source, &target);
        let err = migrate(&config, true).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to fetch schema from source"));
    }

    #[tokio::test]
    async fn test_unreachable_source_fails_before_touching_target() {
        let source = MockServer::start().await;
        let target = MockServer::start().await;
        // No ready mock on source: 404 from the mock server counts as not ready.
        mount_ready(&target).await;

        Mock::given(method("GET"))
            .and(path("/v1/schema"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&target)
            .await;

        let config = config_for(&source, &target);
        let err = migrate(&config, true).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Source Weaviate is not reachable"));
    }
}
