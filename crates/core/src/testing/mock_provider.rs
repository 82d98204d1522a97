//! Mock file provider for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::provider::{
    Credentials, FileDetails, FileProvider, ProviderError, RawCandidate, SessionToken,
};

/// A query handler that produces results dynamically based on the query.
type QueryHandler = Box<dyn Fn(&str) -> Option<Vec<RawCandidate>> + Send + Sync>;

fn duplicate(error: &ProviderError) -> ProviderError {
    match error {
        ProviderError::ConnectionFailed(m) => ProviderError::ConnectionFailed(m.clone()),
        ProviderError::Timeout => ProviderError::Timeout,
        ProviderError::Api(m) => ProviderError::Api(m.clone()),
        ProviderError::MalformedResponse(m) => ProviderError::MalformedResponse(m.clone()),
        ProviderError::Authentication(m) => ProviderError::Authentication(m.clone()),
    }
}

/// Mock implementation of the FileProvider trait.
///
/// Provides controllable behavior for testing:
/// - Per-query search results, or a handler computing them
/// - Per-ident detail records and playback links
/// - Failing queries, failing detail fetches and login errors
/// - An artificial delay on every call
/// - Recorded queries and detail calls for assertions
///
/// # Example
///
/// ```rust,ignore
/// use sharestream_core::testing::{MockFileProvider, fixtures};
///
/// let provider = MockFileProvider::new();
/// provider.set_results("Miracle man", vec![
///     fixtures::candidate("a", "Miracle.man.2024.1080p.mkv"),
/// ]).await;
/// provider.fail_query("Miracle man 2024").await;
///
/// let token = provider.login(&Credentials::new("user", "pass")).await?;
/// let found = provider.search("Miracle man", &token).await?;
/// assert_eq!(found.len(), 1);
/// assert_eq!(provider.recorded_queries().await, vec!["Miracle man"]);
/// ```
pub struct MockFileProvider {
    results: Arc<RwLock<HashMap<String, Vec<RawCandidate>>>>,
    query_handler: Arc<RwLock<Option<QueryHandler>>>,
    failing_queries: Arc<RwLock<HashSet<String>>>,
    details: Arc<RwLock<HashMap<String, FileDetails>>>,
    failing_details: Arc<RwLock<HashSet<String>>>,
    links: Arc<RwLock<HashMap<String, String>>>,
    login_error: Arc<RwLock<Option<ProviderError>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    queries: Arc<RwLock<Vec<String>>>,
    detail_calls: Arc<RwLock<Vec<String>>>,
    logins: Arc<RwLock<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl std::fmt::Debug for MockFileProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockFileProvider")
            .field("results", &"<results>")
            .field("query_handler", &"<handler>")
            .field("details", &"<details>")
            .field("queries", &"<queries>")
            .finish()
    }
}

impl Default for MockFileProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks concurrent calls while alive.
struct InFlight<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, max: &AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        max.fetch_max(now, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockFileProvider {
    /// Create a new mock provider with no results.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(HashMap::new())),
            query_handler: Arc::new(RwLock::new(None)),
            failing_queries: Arc::new(RwLock::new(HashSet::new())),
            details: Arc::new(RwLock::new(HashMap::new())),
            failing_details: Arc::new(RwLock::new(HashSet::new())),
            links: Arc::new(RwLock::new(HashMap::new())),
            login_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
            queries: Arc::new(RwLock::new(Vec::new())),
            detail_calls: Arc::new(RwLock::new(Vec::new())),
            logins: Arc::new(RwLock::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the results returned for an exact query string.
    pub async fn set_results(&self, query: &str, results: Vec<RawCandidate>) {
        self.results.write().await.insert(query.to_string(), results);
    }

    /// Compute results from the query for queries without fixed results.
    pub async fn set_query_handler<F>(&self, handler: F)
    where
        F: Fn(&str) -> Option<Vec<RawCandidate>> + Send + Sync + 'static,
    {
        *self.query_handler.write().await = Some(Box::new(handler));
    }

    /// Make a query fail with an API error.
    pub async fn fail_query(&self, query: &str) {
        self.failing_queries.write().await.insert(query.to_string());
    }

    /// Set the detail record for its ident.
    pub async fn set_details(&self, details: FileDetails) {
        self.details
            .write()
            .await
            .insert(details.ident.clone(), details);
    }

    /// Make the detail fetch for an ident fail.
    pub async fn fail_details(&self, ident: &str) {
        self.failing_details.write().await.insert(ident.to_string());
    }

    /// Set the playback link for an ident.
    pub async fn set_link(&self, ident: &str, link: &str) {
        self.links
            .write()
            .await
            .insert(ident.to_string(), link.to_string());
    }

    /// Make every login fail with this error.
    pub async fn set_login_error(&self, error: ProviderError) {
        *self.login_error.write().await = Some(error);
    }

    /// Delay every call by this duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Queries searched so far, in call order.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Idents whose details were requested, in call order.
    pub async fn recorded_detail_calls(&self) -> Vec<String> {
        self.detail_calls.read().await.clone()
    }

    /// Logins attempted so far.
    pub async fn recorded_logins(&self) -> Vec<String> {
        self.logins.read().await.clone()
    }

    /// Highest number of calls that were in progress at once.
    pub async fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl FileProvider for MockFileProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn salted_password(&self, login: &str, password: &str) -> Result<String, ProviderError> {
        if let Some(error) = self.login_error.read().await.as_ref() {
            return Err(duplicate(error));
        }
        Ok(format!("salted-{}-{}", login, password))
    }

    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, ProviderError> {
        self.logins.write().await.push(credentials.login.clone());
        if let Some(error) = self.login_error.read().await.as_ref() {
            return Err(duplicate(error));
        }
        Ok(SessionToken(format!("mock-token-{}", credentials.login)))
    }

    async fn search(
        &self,
        query: &str,
        _token: &SessionToken,
    ) -> Result<Vec<RawCandidate>, ProviderError> {
        self.queries.write().await.push(query.to_string());
        let _guard = InFlight::enter(&self.in_flight, &self.max_in_flight);
        self.pause().await;

        if self.failing_queries.read().await.contains(query) {
            return Err(ProviderError::Api(format!("mock failure for {}", query)));
        }
        if let Some(results) = self.results.read().await.get(query) {
            return Ok(results.clone());
        }
        if let Some(handler) = self.query_handler.read().await.as_ref() {
            return Ok(handler(query).unwrap_or_default());
        }
        Ok(Vec::new())
    }

    async fn file_details(
        &self,
        ident: &str,
        _token: &SessionToken,
    ) -> Result<Option<FileDetails>, ProviderError> {
        self.detail_calls.write().await.push(ident.to_string());
        let _guard = InFlight::enter(&self.in_flight, &self.max_in_flight);
        self.pause().await;

        if self.failing_details.read().await.contains(ident) {
            return Err(ProviderError::Timeout);
        }
        Ok(self.details.read().await.get(ident).cloned())
    }

    async fn file_link(&self, ident: &str, _token: &SessionToken) -> Result<String, ProviderError> {
        self.links
            .read()
            .await
            .get(ident)
            .cloned()
            .ok_or_else(|| ProviderError::Api(format!("No link for {}", ident)))
    }
}
