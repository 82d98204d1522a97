//! Scheduling of the per-query provider searches.
//!
//! A failed query contributes no candidates; it never aborts the others.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::config::{FanOutMode, SearchConfig};
use crate::metrics;
use crate::provider::{FileProvider, ProviderError, RawCandidate, SessionToken};

/// Outcome of running every query.
#[derive(Debug, Default)]
pub struct FanOutReport {
    /// Candidates of all successful queries, in query order.
    pub candidates: Vec<RawCandidate>,
    /// Failed queries with their errors.
    pub failures: Vec<(String, ProviderError)>,
    /// Number of queries attempted.
    pub attempted: usize,
}

impl FanOutReport {
    fn collect(results: Vec<(String, Result<Vec<RawCandidate>, ProviderError>)>) -> Self {
        let mut report = FanOutReport {
            attempted: results.len(),
            ..Default::default()
        };
        for (query, result) in results {
            match result {
                Ok(mut found) => {
                    metrics::QUERIES_TOTAL.with_label_values(&["ok"]).inc();
                    debug!(query = %query, results = found.len(), "Query complete");
                    report.candidates.append(&mut found);
                }
                Err(e) => {
                    metrics::QUERIES_TOTAL.with_label_values(&["error"]).inc();
                    warn!(query = %query, error = %e, "Query failed");
                    report.failures.push((query, e));
                }
            }
        }
        report
    }

    /// True when there were queries and none of them succeeded.
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.failures.len() == self.attempted
    }
}

/// Strategy for running a batch of queries against a provider.
#[async_trait]
pub trait QueryFanOut: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &str;

    async fn run(
        &self,
        provider: &dyn FileProvider,
        queries: &[String],
        token: &SessionToken,
    ) -> FanOutReport;
}

/// One query at a time with a fixed pause in between.
pub struct SequentialFanOut {
    delay: Duration,
}

impl SequentialFanOut {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl QueryFanOut for SequentialFanOut {
    fn name(&self) -> &str {
        "sequential"
    }

    async fn run(
        &self,
        provider: &dyn FileProvider,
        queries: &[String],
        token: &SessionToken,
    ) -> FanOutReport {
        let mut results = Vec::with_capacity(queries.len());
        for (i, query) in queries.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            results.push((query.clone(), provider.search(query, token).await));
        }
        FanOutReport::collect(results)
    }
}

/// Up to `max_concurrent` queries in flight, results kept in query order.
pub struct ConcurrentFanOut {
    max_concurrent: usize,
}

impl ConcurrentFanOut {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
        }
    }
}

#[async_trait]
impl QueryFanOut for ConcurrentFanOut {
    fn name(&self) -> &str {
        "concurrent"
    }

    async fn run(
        &self,
        provider: &dyn FileProvider,
        queries: &[String],
        token: &SessionToken,
    ) -> FanOutReport {
        let results = stream::iter(queries.iter().cloned())
            .map(|query| async move {
                let result = provider.search(&query, token).await;
                (query, result)
            })
            .buffered(self.max_concurrent)
            .collect::<Vec<_>>()
            .await;
        FanOutReport::collect(results)
    }
}

/// Build the strategy selected in the configuration.
pub fn fan_out_from_config(config: &SearchConfig) -> Arc<dyn QueryFanOut> {
    match config.fan_out {
        FanOutMode::Sequential => Arc::new(SequentialFanOut::new(Duration::from_millis(
            config.query_delay_ms,
        ))),
        FanOutMode::Concurrent => Arc::new(ConcurrentFanOut::new(config.max_concurrent_queries)),
    }
}
