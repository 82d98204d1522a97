//! Metadata lookup for stream requests.
//!
//! Requests usually name a title by identifier rather than by name. A
//! `MetadataResolver` turns such a `MediaId` into the `ShowDescriptor` the
//! search engine works from.

mod media_id;
mod tmdb;

pub use media_id::MediaId;
pub use tmdb::TmdbResolver;

use async_trait::async_trait;
use thiserror::Error;

use crate::matching::{MediaKind, ShowDescriptor};

/// Errors that can occur while resolving a title.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Resolver not configured (missing API key, etc.).
    #[error("Resolver not configured: {0}")]
    NotConfigured(String),
}

/// Resolves a title identifier to localized names, year and episode.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// Resolver name for logging.
    fn name(&self) -> &str;

    /// Describe the title behind `id`.
    ///
    /// Returns `Ok(None)` when the title is unknown or the id does not fit
    /// the kind, e.g. a series id without season and episode.
    async fn describe(
        &self,
        kind: MediaKind,
        id: &MediaId,
    ) -> Result<Option<ShowDescriptor>, MetadataError>;
}
