pub mod config;
pub mod matching;
pub mod metadata;
pub mod metrics;
pub mod parser;
pub mod provider;
pub mod quality;
pub mod stream;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, EnrichmentConfig,
    FanOutMode, MetadataConfig, ProviderConfig, SanitizedConfig, SearchConfig, ServerConfig,
};
pub use matching::{
    build_queries, clean_title, normalize, rank, CandidateFilter, Exclusion, MatchScorer,
    MediaKind, ScoredCandidate, ShowDescriptor, SortMethod,
};
pub use metadata::{MediaId, MetadataError, MetadataResolver, TmdbResolver};
pub use parser::{
    extract_language, extract_season_episode, parse_release_name, ParsedFilename, SeasonEpisode,
};
pub use provider::{
    salt_password, Credentials, FileDetails, FileProvider, ProviderError, RawCandidate,
    SessionToken, WebshareClient,
};
pub use quality::{estimate_speed_from_size, format_speed, resolution_priority, resolve_resolution};
pub use stream::{
    DetailEnricher, EnrichmentStats, FileMeta, QueryFanOut, SearchError, StreamResult,
    StreamSearcher,
};
