// ABOUTME: Schema command implementation - clone the schema without data
// ABOUTME: Wipes the target and recreates every source class, nothing else

use anyhow::{bail, Context, Result};
use std::io::{self, Write};

use crate::config::Config;
use crate::migration;
use crate::weaviate::WeaviateClient;

/// Clone the source schema into the target without copying any objects.
///
/// Same destructive first stage as `migrate` (the target schema is wiped), so
/// the same confirmation prompt applies unless `skip_confirmation` is set.
pub async fn schema(config: &Config, skip_confirmation: bool) -> Result<()> {
    tracing::info!("Starting schema clone...");

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
        bail!("Schema clone cancelled by user");
    }

    let report = migration::clone_schema(&source, &target).await?;

    tracing::info!("");
    tracing::info!(
        "Schema clone finished: {} created, {} failed (of {} listed)",
        report.created,
        report.failed,
        report.classes.len()
    );
    Ok(())
}

fn confirm_wipe(target_url: &str) -> Result<bool> {
    println!();
    println!("This will DELETE every collection on the target and recreate it from source:");
    println!("  target: {}", target_url);
    println!();
    print!("Proceed with schema clone? [y/N]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read user input")?;

    Ok(input.trim().to_lowercase() == "y")
}
