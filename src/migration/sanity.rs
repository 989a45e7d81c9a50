// ABOUTME: Post-migration sanity check comparing per-class object counts
// ABOUTME: Count lookups fall back to 0 on failure and never fail the run

use crate::utils::sanitize_identifier;
use crate::weaviate::{CollectionDef, WeaviateClient};

/// Source and target counts for one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountReport {
    pub class: String,
    pub source: u64,
    pub target: u64,
}

impl CountReport {
    pub fn matches(&self) -> bool {
        self.source == self.target
    }
}

/// Compare object counts between source and target for every named class.
///
/// Emits exactly one report line per class. Either side's count falls back to
/// 0 when the lookup fails; this is a coarse signal only, it compares totals
/// and never identifiers or vectors.
pub async fn count_comparison(
    source: &WeaviateClient,
    target: &WeaviateClient,
    classes: &[CollectionDef],
) -> Vec<CountReport> {
    let mut reports = Vec::new();
    for def in classes {
        if !def.is_named() {
            continue;
        }
        let class = sanitize_identifier(&def.name);
        let source_count = count_or_zero(source, &def.name, "source").await;
        let target_count = count_or_zero(target, &def.name, "target").await;

        if source_count == target_count {
            tracing::info!("{}: {} → {}", class, source_count, target_count);
        } else {
            tracing::warn!(
                "⚠ {}: {} → {} (counts differ)",
                class,
                source_count,
                target_count
            );
        }
        reports.push(CountReport {
            class: def.name.clone(),
            source: source_count,
            target: target_count,
        });
    }
    reports
}

async fn count_or_zero(client: &WeaviateClient, class: &str, side: &str) -> u64 {
    match client.count_objects(class).await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(
                "Could not count '{}' on {}: {:#}",
                sanitize_identifier(class),
                side,
                e
            );
            0
        }
    }
}
