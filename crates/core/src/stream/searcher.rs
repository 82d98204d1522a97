//! The stream search entry points.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{Config, SearchConfig};
use crate::matching::{
    build_queries, rank, CandidateFilter, MatchScorer, ScoredCandidate, ShowDescriptor, SortMethod,
};
use crate::metrics;
use crate::provider::{Credentials, FileProvider, RawCandidate, SessionToken};

use super::dedup::deduplicate_candidates;
use super::enricher::DetailEnricher;
use super::fan_out::{fan_out_from_config, QueryFanOut};
use super::{FileMeta, SearchError, StreamResult};

/// Finds and ranks playable streams for a descriptor.
pub struct StreamSearcher {
    provider: Arc<dyn FileProvider>,
    fan_out: Arc<dyn QueryFanOut>,
    enricher: DetailEnricher,
    search: SearchConfig,
    label: String,
    public_url: String,
}

impl StreamSearcher {
    /// Create a searcher with the fan-out strategy selected in `config`.
    pub fn new(provider: Arc<dyn FileProvider>, config: &Config) -> Self {
        Self {
            fan_out: fan_out_from_config(&config.search),
            enricher: DetailEnricher::new(provider.clone(), config.enrichment.clone()),
            provider,
            search: config.search.clone(),
            label: config.provider.label.clone(),
            public_url: config.server.public_url.clone(),
        }
    }

    /// Replace the fan-out strategy.
    pub fn with_fan_out(mut self, fan_out: Arc<dyn QueryFanOut>) -> Self {
        self.fan_out = fan_out;
        self
    }

    pub fn provider(&self) -> &Arc<dyn FileProvider> {
        &self.provider
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }

    /// Log in and search streams for a descriptor.
    ///
    /// `sort_method` falls back to the configured default.
    pub async fn search_streams(
        &self,
        descriptor: &ShowDescriptor,
        credentials: &Credentials,
        sort_method: Option<SortMethod>,
    ) -> Result<Vec<StreamResult>, SearchError> {
        let start = Instant::now();
        let method = sort_method.unwrap_or(self.search.sort_method);

        let result = match self.provider.login(credentials).await {
            Ok(token) => self.search_with_token(descriptor, &token, method).await,
            Err(e) => Err(SearchError::from(e)),
        };

        let label = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::SEARCHES_TOTAL.with_label_values(&[label]).inc();
        metrics::SEARCH_DURATION
            .with_label_values(&[label])
            .observe(start.elapsed().as_secs_f64());

        match &result {
            Ok(streams) => info!(
                names = ?descriptor.names(),
                kind = %descriptor.kind,
                streams = streams.len(),
                sort = %method,
                duration_ms = start.elapsed().as_millis() as u64,
                "Stream search complete"
            ),
            Err(e) => warn!(names = ?descriptor.names(), error = %e, "Stream search failed"),
        }

        result
    }

    /// Search streams with an existing session.
    pub async fn search_with_token(
        &self,
        descriptor: &ShowDescriptor,
        token: &SessionToken,
        method: SortMethod,
    ) -> Result<Vec<StreamResult>, SearchError> {
        let start = Instant::now();
        let queries = build_queries(descriptor, self.search.year_variants);
        if queries.is_empty() {
            debug!("Descriptor has no names, nothing to search");
            return Ok(Vec::new());
        }

        debug!(
            queries = ?queries,
            strategy = self.fan_out.name(),
            "Running provider queries"
        );
        let report = self
            .fan_out
            .run(self.provider.as_ref(), &queries, token)
            .await;
        if report.all_failed() {
            return Err(SearchError::AllQueriesFailed(report.attempted));
        }

        let candidates = deduplicate_candidates(report.candidates);
        metrics::CANDIDATES_FOUND
            .with_label_values(&[])
            .observe(candidates.len() as f64);

        let ranked = self.rank_candidates(descriptor, &queries, candidates, method);
        let mut streams: Vec<StreamResult> = ranked
            .iter()
            .map(|scored| StreamResult::from_scored(scored, &self.label, &self.public_url, token))
            .collect();

        self.enrich_within_deadline(&mut streams, token, start).await;

        metrics::RESULTS_RETURNED
            .with_label_values(&[])
            .observe(streams.len() as f64);
        Ok(streams)
    }

    /// Score, filter and rank candidates. Pure and synchronous.
    pub fn rank_candidates(
        &self,
        descriptor: &ShowDescriptor,
        queries: &[String],
        candidates: Vec<RawCandidate>,
        method: SortMethod,
    ) -> Vec<ScoredCandidate> {
        let scorer = MatchScorer::new(descriptor, queries);
        let filter = CandidateFilter::new(descriptor, self.search.year_tolerance);
        let total = candidates.len();

        let kept: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|candidate| scorer.score(candidate))
            .filter(|scored| filter.include(scored))
            .collect();

        debug!(candidates = total, kept = kept.len(), "Filtered candidates");
        rank(kept, method, self.search.max_results)
    }

    /// Enrich streams, stopping at the search deadline.
    ///
    /// Streams enriched before the deadline keep their refined fields; the
    /// rest keep their estimates.
    async fn enrich_within_deadline(
        &self,
        streams: &mut [StreamResult],
        token: &SessionToken,
        started: Instant,
    ) {
        if !self.enricher.is_enabled() || streams.is_empty() {
            return;
        }

        if self.search.deadline_ms == 0 {
            self.enricher.enrich(streams, token).await;
            return;
        }

        let deadline = Duration::from_millis(self.search.deadline_ms);
        let remaining = deadline.saturating_sub(started.elapsed());
        if remaining.is_zero() {
            warn!("Search deadline reached before enrichment");
            return;
        }

        if tokio::time::timeout(remaining, self.enricher.enrich(streams, token))
            .await
            .is_err()
        {
            warn!(
                deadline_ms = self.search.deadline_ms,
                "Enrichment cut short by search deadline"
            );
        }
    }

    /// Free-text provider search without scoring, filtering or ranking.
    pub async fn direct_search(
        &self,
        query: &str,
        credentials: &Credentials,
    ) -> Result<Vec<RawCandidate>, SearchError> {
        let token = self.provider.login(credentials).await?;
        let found = self.provider.search(query, &token).await?;
        debug!(query = %query, results = found.len(), "Direct search complete");
        Ok(found)
    }

    /// Detail view of one provider file; `None` when the provider has no
    /// record for it.
    pub async fn file_meta(
        &self,
        ident: &str,
        credentials: &Credentials,
    ) -> Result<Option<FileMeta>, SearchError> {
        let token = self.provider.login(credentials).await?;
        let details = self.provider.file_details(ident, &token).await?;
        Ok(details.map(|d| FileMeta::from_details(&d, self.provider.file_page_url(ident))))
    }

    /// A single stream for a file picked by ident.
    ///
    /// Only the login can fail; a failed detail fetch leaves the stream
    /// with just its playback URL.
    pub async fn direct_stream(
        &self,
        ident: &str,
        credentials: &Credentials,
    ) -> Result<StreamResult, SearchError> {
        let token = self.provider.login(credentials).await?;
        let details = match self.provider.file_details(ident, &token).await {
            Ok(details) => details,
            Err(e) => {
                warn!(ident = %ident, error = %e, "Detail fetch for direct stream failed");
                None
            }
        };
        Ok(StreamResult::direct(
            ident,
            details.as_ref(),
            &self.label,
            &self.public_url,
            &token,
        ))
    }
}
