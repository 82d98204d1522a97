//! Stream search orchestration.
//!
//! `StreamSearcher` sequences query generation, the provider fan-out,
//! deduplication, scoring, filtering, ranking and enrichment into the final
//! list of `StreamResult`s.

mod dedup;
mod enricher;
mod error;
mod fan_out;
mod file_meta;
mod result;
mod searcher;

pub use dedup::deduplicate_candidates;
pub use enricher::{DetailEnricher, EnrichmentStats};
pub use error::SearchError;
pub use fan_out::{
    fan_out_from_config, ConcurrentFanOut, FanOutReport, QueryFanOut, SequentialFanOut,
};
pub use file_meta::FileMeta;
pub use result::{playback_url, StreamResult};
pub use searcher::StreamSearcher;
