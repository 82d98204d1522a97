use thiserror::Error;

use crate::provider::ProviderError;

/// Errors surfaced by a stream search.
///
/// Per-query and per-item failures never show up here; they are logged
/// and degrade to fewer or less detailed results.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("All {0} provider queries failed")]
    AllQueriesFailed(usize),

    #[error("Provider error: {0}")]
    Provider(#[source] ProviderError),
}

impl SearchError {
    /// Label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::Authentication(_) => "auth_failed",
            SearchError::AllQueriesFailed(_) => "all_queries_failed",
            SearchError::Provider(_) => "provider_error",
        }
    }
}

impl From<ProviderError> for SearchError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Authentication(message) => SearchError::Authentication(message),
            other => SearchError::Provider(other),
        }
    }
}
