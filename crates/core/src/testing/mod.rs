//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external service
//! traits, allowing the whole search pipeline to be exercised without a
//! real file provider or metadata service.
//!
//! # Example
//!
//! ```rust,ignore
//! use sharestream_core::testing::{fixtures, MockFileProvider};
//! use sharestream_core::{Config, ShowDescriptor, StreamSearcher};
//!
//! let provider = Arc::new(MockFileProvider::new());
//! provider.set_results("Miracle man", vec![
//!     fixtures::candidate("a", "Miracle.man.2024.1080p.mkv"),
//! ]).await;
//!
//! let searcher = StreamSearcher::new(provider, &Config::default());
//! let streams = searcher
//!     .search_streams(&ShowDescriptor::movie(["Miracle man"], None), &credentials, None)
//!     .await?;
//! ```

mod mock_metadata;
mod mock_provider;

pub use mock_metadata::MockMetadataResolver;
pub use mock_provider::MockFileProvider;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::matching::ScoredCandidate;
    use crate::parser::{parse_release_name, ParsedFilename};
    use crate::provider::{FileDetails, RawCandidate, SessionToken};
    use crate::quality::resolve_resolution;
    use crate::stream::StreamResult;

    /// Create a test candidate with reasonable defaults (1 GB, no votes).
    pub fn candidate(ident: &str, name: &str) -> RawCandidate {
        candidate_with(ident, name, 1_000_000_000, 0, 0)
    }

    /// Create a test candidate with explicit size and votes.
    pub fn candidate_with(
        ident: &str,
        name: &str,
        size: u64,
        pos_votes: u32,
        neg_votes: u32,
    ) -> RawCandidate {
        RawCandidate {
            ident: ident.to_string(),
            name: name.to_string(),
            size,
            pos_votes,
            neg_votes,
            img: None,
            protected: false,
        }
    }

    /// Create a scored candidate with fixed match scores.
    ///
    /// Strong and weak flags follow the usual thresholds; the resolution is
    /// `"SD"` and can be overwritten by the test.
    pub fn scored(
        ident: &str,
        title_match: f64,
        name_match: f64,
        pos_votes: u32,
        size: u64,
    ) -> ScoredCandidate {
        ScoredCandidate {
            candidate: candidate_with(ident, &format!("{}.mkv", ident), size, pos_votes, 0),
            parsed: ParsedFilename::default(),
            title_match,
            name_match,
            strong_match: title_match > crate::matching::STRONG_MATCH_THRESHOLD,
            weak_match: name_match > crate::matching::WEAK_MATCH_THRESHOLD,
            title_year: None,
            query_title_year: None,
            resolution: "SD".to_string(),
        }
    }

    /// Create a strong-match stream result as it looks before enrichment.
    pub fn stream_result(ident: &str, filename: &str, size: u64) -> StreamResult {
        let scored = ScoredCandidate {
            candidate: candidate_with(ident, filename, size, 0, 0),
            parsed: parse_release_name(filename),
            title_match: 1.0,
            name_match: 1.0,
            strong_match: true,
            weak_match: true,
            title_year: None,
            query_title_year: None,
            resolution: resolve_resolution(filename, size, None, None),
        };
        StreamResult::from_scored(
            &scored,
            "Webshare",
            "http://localhost:61613",
            &SessionToken("tok".to_string()),
        )
    }

    /// Create a detail record.
    pub fn details(
        ident: &str,
        filename: &str,
        width: Option<u32>,
        height: Option<u32>,
        bitrate: Option<u64>,
    ) -> FileDetails {
        FileDetails {
            ident: ident.to_string(),
            filename: filename.to_string(),
            size: 1_000_000_000,
            pos_votes: 0,
            neg_votes: 0,
            description: None,
            stripe: None,
            bitrate,
            width,
            height,
            protected: false,
        }
    }
}
