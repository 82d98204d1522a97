use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::matching::SortMethod;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub metadata: Option<MetadataConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Externally reachable base URL, used to build playback links.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: default_public_url(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    61613
}

fn default_public_url() -> String {
    "http://localhost:61613".to_string()
}

/// File provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// API base URL (e.g., "https://webshare.cz/api")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Results requested per query
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
    /// Prefix of every stream display name
    #[serde(default = "default_label")]
    pub label: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            search_limit: default_search_limit(),
            label: default_label(),
        }
    }
}

fn default_base_url() -> String {
    "https://webshare.cz/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_search_limit() -> u32 {
    100
}

fn default_label() -> String {
    "Webshare".to_string()
}

/// How the per-query provider searches are scheduled
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FanOutMode {
    /// One query at a time with a delay in between
    #[default]
    Sequential,
    /// Up to `max_concurrent_queries` at once
    Concurrent,
}

/// Search and ranking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub sort_method: SortMethod,
    #[serde(default)]
    pub fan_out: FanOutMode,
    #[serde(default = "default_query_delay_ms")]
    pub query_delay_ms: u64,
    #[serde(default = "default_max_concurrent_queries")]
    pub max_concurrent_queries: usize,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Accepted distance in years between requested and filename year (0 or 1)
    #[serde(default = "default_year_tolerance")]
    pub year_tolerance: u32,
    /// Also search "{name} {year}" for movies
    #[serde(default)]
    pub year_variants: bool,
    /// Overall deadline for enrichment in milliseconds, 0 disables it
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            sort_method: SortMethod::default(),
            fan_out: FanOutMode::default(),
            query_delay_ms: default_query_delay_ms(),
            max_concurrent_queries: default_max_concurrent_queries(),
            max_results: default_max_results(),
            year_tolerance: default_year_tolerance(),
            year_variants: false,
            deadline_ms: default_deadline_ms(),
        }
    }
}

fn default_query_delay_ms() -> u64 {
    100
}

fn default_max_concurrent_queries() -> usize {
    4
}

fn default_max_results() -> usize {
    100
}

fn default_year_tolerance() -> u32 {
    1
}

fn default_deadline_ms() -> u64 {
    20_000
}

/// Detail-fetch enrichment configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnrichmentConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Detail fetches running at once
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Pause between chunks in milliseconds
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            chunk_size: default_chunk_size(),
            chunk_delay_ms: default_chunk_delay_ms(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_chunk_size() -> usize {
    15
}

fn default_chunk_delay_ms() -> u64 {
    25
}

/// Metadata lookup configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    /// TMDB API key (v3)
    pub tmdb_api_key: String,
    #[serde(default = "default_tmdb_base_url")]
    pub tmdb_base_url: String,
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub search: SearchConfig,
    pub enrichment: EnrichmentConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SanitizedMetadataConfig>,
}

/// Sanitized metadata config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedMetadataConfig {
    pub tmdb_base_url: String,
    pub tmdb_api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            provider: config.provider.clone(),
            search: config.search.clone(),
            enrichment: config.enrichment.clone(),
            metadata: config.metadata.as_ref().map(|m| SanitizedMetadataConfig {
                tmdb_base_url: m.tmdb_base_url.clone(),
                tmdb_api_key_configured: !m.tmdb_api_key.is_empty(),
            }),
        }
    }
}
