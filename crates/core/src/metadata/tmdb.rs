//! TMDB (The Movie Database) resolver.
//!
//! Names are fetched in Czech and Slovak, plus English for titles whose
//! original language is not English, so that filenames uploaded under any
//! of those names can be matched.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{MediaId, MetadataError, MetadataResolver};
use crate::config::MetadataConfig;
use crate::matching::{MediaKind, ShowDescriptor};
use crate::metrics;

/// Localized languages requested for every title, primary first.
const LANGUAGES: [&str; 2] = ["cs", "sk"];

/// A movie or TV record as returned by TMDB.
///
/// Movie and TV payloads use different field names for the same data.
#[derive(Debug, Clone, Default, Deserialize)]
struct TmdbTitle {
    #[serde(default, alias = "name")]
    title: Option<String>,
    #[serde(default, alias = "original_name")]
    original_title: Option<String>,
    #[serde(default, alias = "first_air_date")]
    release_date: Option<String>,
    #[serde(default)]
    original_language: Option<String>,
}

impl TmdbTitle {
    fn year(&self) -> Option<u32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok())
    }

    fn is_english(&self) -> bool {
        self.original_language.as_deref() == Some("en")
    }
}

/// `/find/{imdb_id}` response.
#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    movie_results: Vec<TmdbTitle>,
    #[serde(default)]
    tv_results: Vec<TmdbTitle>,
}

impl FindResponse {
    fn first(self, kind: MediaKind) -> Option<TmdbTitle> {
        match kind {
            MediaKind::Movie => self.movie_results.into_iter().next(),
            MediaKind::Series => self.tv_results.into_iter().next(),
        }
    }
}

/// Build the descriptor from the per-language records.
///
/// Names run Czech, Slovak, English, original; duplicates collapse.
fn assemble(
    kind: MediaKind,
    id: &MediaId,
    primary: TmdbTitle,
    secondary: Option<TmdbTitle>,
    english: Option<TmdbTitle>,
) -> Option<ShowDescriptor> {
    let names: Vec<String> = [
        primary.title.clone(),
        secondary.and_then(|t| t.title),
        english.and_then(|t| t.title),
        primary.original_title.clone(),
    ]
    .into_iter()
    .flatten()
    .collect();

    match kind {
        MediaKind::Movie => {
            let descriptor = ShowDescriptor::movie(names, primary.year());
            (!descriptor.localized_names.is_empty()).then_some(descriptor)
        }
        MediaKind::Series => {
            let episode = id.episode()?;
            let descriptor = ShowDescriptor::episode(names, episode.season, episode.episode);
            (!descriptor.localized_names.is_empty()).then_some(descriptor)
        }
    }
}

/// TMDB-backed metadata resolver.
pub struct TmdbResolver {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for TmdbResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbResolver")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl TmdbResolver {
    /// Create a new resolver.
    pub fn new(config: &MetadataConfig) -> Result<Self, MetadataError> {
        if config.tmdb_api_key.is_empty() {
            return Err(MetadataError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url: config.tmdb_base_url.trim_end_matches('/').to_string(),
            api_key: config.tmdb_api_key.clone(),
        })
    }

    /// GET a TMDB resource; 404 yields `None`.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        language: Option<&str>,
    ) -> Result<Option<T>, MetadataError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("TMDB request: path='{}', language={:?}", path, language);

        let mut request = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params);
        if let Some(language) = language {
            request = request.query(&[("language", language)]);
        }

        let response = request.send().await?;

        let status = response.status();
        if status == 404 {
            return Ok(None);
        }
        if status == 401 {
            return Err(MetadataError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response
            .json()
            .await
            .map_err(|e| MetadataError::Parse(format!("Failed to parse TMDB response: {}", e)))?;
        Ok(Some(body))
    }

    /// Fetch the record for `id` in one language (`None` = TMDB default).
    async fn fetch(
        &self,
        kind: MediaKind,
        id: &MediaId,
        language: Option<&str>,
    ) -> Result<Option<TmdbTitle>, MetadataError> {
        match id {
            MediaId::Imdb { id, .. } => {
                let found: Option<FindResponse> = self
                    .get(
                        &format!("/find/{}", id),
                        &[("external_source", "imdb_id")],
                        language,
                    )
                    .await?;
                Ok(found.and_then(|f| f.first(kind)))
            }
            MediaId::Tmdb { id, .. } => {
                let path = match kind {
                    MediaKind::Movie => format!("/movie/{}", id),
                    MediaKind::Series => format!("/tv/{}", id),
                };
                self.get(&path, &[], language).await
            }
        }
    }

    /// Fetch an optional extra name; failures only cost that name.
    async fn fetch_extra(
        &self,
        kind: MediaKind,
        id: &MediaId,
        language: Option<&str>,
    ) -> Option<TmdbTitle> {
        match self.fetch(kind, id, language).await {
            Ok(title) => title,
            Err(e) => {
                warn!(id = %id, language = ?language, error = %e, "TMDB name lookup failed");
                None
            }
        }
    }

    async fn resolve(
        &self,
        kind: MediaKind,
        id: &MediaId,
    ) -> Result<Option<ShowDescriptor>, MetadataError> {
        if kind == MediaKind::Series && id.episode().is_none() {
            debug!(id = %id, "Series id without season and episode");
            return Ok(None);
        }

        let Some(primary) = self.fetch(kind, id, Some(LANGUAGES[0])).await? else {
            return Ok(None);
        };
        let secondary = self.fetch_extra(kind, id, Some(LANGUAGES[1])).await;
        let english = if primary.is_english() {
            None
        } else {
            self.fetch_extra(kind, id, None).await
        };

        Ok(assemble(kind, id, primary, secondary, english))
    }
}

#[async_trait]
impl MetadataResolver for TmdbResolver {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn describe(
        &self,
        kind: MediaKind,
        id: &MediaId,
    ) -> Result<Option<ShowDescriptor>, MetadataError> {
        let result = self.resolve(kind, id).await;
        metrics::record_external("tmdb", "describe", &result);
        result
    }
}
