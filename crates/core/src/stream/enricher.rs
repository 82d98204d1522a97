//! Detail enricher - refines display fields of ranked streams.
//!
//! Streams are processed in fixed-size chunks: every detail fetch of a
//! chunk runs concurrently, chunks run one after another with a short
//! pause in between. A stream is only ever written by the fetch it owns and
//! the list is never reordered.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::config::EnrichmentConfig;
use crate::metrics;
use crate::provider::{FileProvider, SessionToken};

use super::StreamResult;

/// Statistics from an enrichment operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentStats {
    /// Detail records applied.
    pub enriched: u32,
    /// Provider had no detail record.
    pub missing: u32,
    /// Detail fetches that failed.
    pub failed: u32,
    /// Streams whose resolution label changed.
    pub upgraded: u32,
    /// Chunks fully processed.
    pub chunks: u32,
}

/// Enriches streams with per-file detail records.
pub struct DetailEnricher {
    provider: Arc<dyn FileProvider>,
    config: EnrichmentConfig,
}

impl DetailEnricher {
    pub fn new(provider: Arc<dyn FileProvider>, config: EnrichmentConfig) -> Self {
        Self { provider, config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Enrich streams in place.
    ///
    /// Failed or missing detail fetches leave the stream's estimates as
    /// they were. Dropping the returned future between chunks keeps every
    /// chunk finished so far.
    pub async fn enrich(&self, streams: &mut [StreamResult], token: &SessionToken) -> EnrichmentStats {
        let mut stats = EnrichmentStats::default();

        if !self.config.enabled || streams.is_empty() {
            return stats;
        }

        let chunk_size = self.config.chunk_size.max(1);
        let delay = Duration::from_millis(self.config.chunk_delay_ms);
        let chunk_count = streams.len().div_ceil(chunk_size);

        debug!(
            streams = streams.len(),
            chunks = chunk_count,
            "Enriching streams"
        );

        for (index, chunk) in streams.chunks_mut(chunk_size).enumerate() {
            let outcomes = join_all(
                chunk
                    .iter()
                    .map(|stream| self.provider.file_details(&stream.ident, token)),
            )
            .await;

            for (stream, outcome) in chunk.iter_mut().zip(outcomes) {
                match outcome {
                    Ok(Some(details)) => {
                        let before = stream.resolution.clone();
                        stream.apply_details(&details);
                        if stream.resolution != before {
                            stats.upgraded += 1;
                        }
                        stats.enriched += 1;
                        metrics::ENRICHMENT_FETCHES.with_label_values(&["ok"]).inc();
                    }
                    Ok(None) => {
                        stats.missing += 1;
                        metrics::ENRICHMENT_FETCHES
                            .with_label_values(&["missing"])
                            .inc();
                    }
                    Err(e) => {
                        warn!(ident = %stream.ident, error = %e, "Detail fetch failed");
                        stats.failed += 1;
                        metrics::ENRICHMENT_FETCHES
                            .with_label_values(&["error"])
                            .inc();
                    }
                }
            }
            stats.chunks += 1;

            if index + 1 < chunk_count && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        debug!(
            enriched = stats.enriched,
            missing = stats.missing,
            failed = stats.failed,
            upgraded = stats.upgraded,
            "Enrichment complete"
        );

        stats
    }
}
