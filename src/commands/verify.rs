// ABOUTME: Verify command implementation - compare per-class object counts
// ABOUTME: Read-only; exits nonzero when any collection's counts differ

use anyhow::{Context, Result};

use crate::config::Config;
use crate::migration;
use crate::weaviate::WeaviateClient;

/// Compare per-collection object counts between source and target.
///
/// This is the sanity-check stage of the migration run standalone. It is
/// read-only: no schema or data is modified on either side.
///
/// # Errors
///
/// Returns an error if either cluster is unreachable, if the source schema
/// cannot be listed, or if any collection's counts differ, so scripts can
/// gate on the exit status.
pub async fn verify(config: &Config) -> Result<()> {
    tracing::info!("Starting count verification...");

    tracing::info!("Connecting to source at {}...", config.source.rest_url());
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

    tracing::info!("Listing source collections...");
    let schema = source
        .fetch_schema()
        .await
        .context("Failed to fetch schema from source")?;

    if schema.classes.is_empty() {
        tracing::warn!("⚠ No collections found on source");
        return Ok(());
    }

    tracing::info!("Comparing counts for {} collection(s)...", schema.classes.len());
    let reports = migration::count_comparison(&source, &target, &schema.classes).await;
    let mismatches = reports.iter().filter(|r| !r.matches()).count();

    tracing::info!("");
    tracing::info!("========================================");
    tracing::info!("Verification Summary");
    tracing::info!("========================================");
    tracing::info!("Total collections: {}", reports.len());
    tracing::info!("✓ Matches: {}", reports.len() - mismatches);
    tracing::info!("✗ Mismatches: {}", mismatches);
    tracing::info!("========================================");

    if mismatches > 0 {
        anyhow::bail!("{} collection(s) differ between source and target", mismatches);
    }

    tracing::info!("✓ All collection counts match");
    Ok(())
}
