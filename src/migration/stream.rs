// ABOUTME: Data streaming stage - pages source objects into batched target writes
// ABOUTME: Per-object failures are logged and skipped, page failures abort the class

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use uuid::Uuid;

use crate::weaviate::{ObjectRecord, WeaviateClient};

/// Tally for one collection's stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamStats {
    /// Objects read from the source and handed to the batcher.
    pub submitted: u64,
    /// Objects the target accepted.
    pub inserted: u64,
    /// Objects the target rejected or that were lost with a failed batch.
    pub failed: u64,
}

/// Fixed-capacity write buffer against the target batch API.
///
/// Flushes automatically when full; `finish` flushes the remainder. Failures
/// never propagate out of the batcher: rejected objects are logged with their
/// id and counted, and streaming continues.
pub struct ObjectBatcher<'a> {
    target: &'a WeaviateClient,
    capacity: usize,
    buffer: Vec<ObjectRecord>,
    stats: StreamStats,
}

impl<'a> ObjectBatcher<'a> {
    pub fn new(target: &'a WeaviateClient, capacity: usize) -> Self {
        Self {
            target,
            capacity,
            buffer: Vec::with_capacity(capacity),
            stats: StreamStats::default(),
        }
    }

    pub async fn push(&mut self, object: ObjectRecord) {
        self.stats.submitted += 1;
        self.buffer.push(object);
        if self.buffer.len() >= self.capacity {
            self.flush().await;
        }
    }

    /// Flush the remaining buffer and return the final tally.
    pub async fn finish(mut self) -> StreamStats {
        self.flush().await;
        self.stats
    }

    async fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.buffer);
        self.buffer = Vec::with_capacity(self.capacity);

        match self.target.insert_batch(&batch).await {
            Ok(outcomes) => {
                let mut failed = 0u64;
                for outcome in &outcomes {
                    if let Some(message) = outcome.failure_message() {
                        failed += 1;
                        match outcome.id {
                            Some(id) => {
                                tracing::warn!("Could not insert object {}: {}", id, message)
                            }
                            None => tracing::warn!(
                                "Could not insert object (id not reported): {}",
                                message
                            ),
                        }
                    }
                }
                self.stats.failed += failed;
                self.stats.inserted += (batch.len() as u64).saturating_sub(failed);
            }
            Err(e) => {
                // The whole batch was lost; count every buffered object as failed.
                tracing::warn!(
                    "Batch of {} object(s) was not accepted: {:#}",
                    batch.len(),
                    e
                );
                for object in &batch {
                    tracing::debug!("  object {} lost with its batch", object.id);
                }
                self.stats.failed += batch.len() as u64;
            }
        }
    }
}

/// Stream every object of one source class into the target.
///
/// Pages with cursor pagination (`batch_size` doubles as the page size), vectors
/// included. A page failure aborts this collection only: buffered objects are
/// flushed best-effort and the error is returned for the caller to log.
pub async fn stream_collection(
    source: &WeaviateClient,
    target: &WeaviateClient,
    class: &str,
    batch_size: usize,
) -> Result<StreamStats> {
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}: {pos} objects")
            .unwrap(),
    );
    progress.set_message(format!("Migrating {}", class));

    let mut batcher = ObjectBatcher::new(target, batch_size);
    let mut after: Option<Uuid> = None;

    loop {
        let page = match source.list_objects(class, after.as_ref(), batch_size).await {
            Ok(page) => page,
            Err(e) => {
                batcher.finish().await;
                progress.finish_and_clear();
                return Err(e)
                    .with_context(|| format!("Object iteration for '{}' failed", class));
            }
        };

        let page_len = page.objects.len();
        if page_len == 0 {
            break;
        }
        after = page.objects.last().map(|o| o.id);

        for object in page.objects {
            batcher.push(object).await;
            progress.inc(1);
        }

        // A short page means the listing is exhausted.
        if page_len < batch_size {
            break;
        }
    }

    let stats = batcher.finish().await;
    progress.finish_with_message(format!("Migrated {}: {} objects", class, stats.submitted));
    Ok(stats)
}
