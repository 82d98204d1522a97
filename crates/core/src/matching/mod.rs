//! Query generation, title matching, filtering and ranking.
//!
//! Everything in here is pure and synchronous: given the same descriptor
//! and candidates it always produces the same ordered output.

mod filter;
mod normalize;
mod query;
mod ranker;
mod scorer;

pub use filter::{CandidateFilter, Exclusion};
pub use normalize::{clean_title, normalize};
pub use query::{build_queries, MediaKind, ShowDescriptor};
pub use ranker::{compare, rank, SortMethod};
pub use scorer::{MatchScorer, ScoredCandidate, STRONG_MATCH_THRESHOLD, WEAK_MATCH_THRESHOLD};
