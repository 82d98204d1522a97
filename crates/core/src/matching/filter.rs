//! Business-rule filtering of scored candidates.

use tracing::trace;

use crate::parser::SeasonEpisode;

use super::query::{MediaKind, ShowDescriptor};
use super::scorer::ScoredCandidate;

/// Why a candidate was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Password-protected file.
    Protected,
    /// Neither a strong nor a weak match.
    NoMatch,
    /// Filename year too far from the requested year.
    YearMismatch,
    /// Episode file in a movie search.
    EpisodeInMovie,
    /// Different season/episode than requested.
    WrongEpisode,
}

impl Exclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exclusion::Protected => "protected",
            Exclusion::NoMatch => "no_match",
            Exclusion::YearMismatch => "year_mismatch",
            Exclusion::EpisodeInMovie => "episode_in_movie",
            Exclusion::WrongEpisode => "wrong_episode",
        }
    }
}

/// Decides which scored candidates may be offered.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    kind: MediaKind,
    season_episode: Option<SeasonEpisode>,
    year_tolerance: u32,
}

impl CandidateFilter {
    pub fn new(descriptor: &ShowDescriptor, year_tolerance: u32) -> Self {
        Self {
            kind: descriptor.kind,
            season_episode: descriptor.season_episode(),
            year_tolerance,
        }
    }

    /// First rule the candidate breaks, if any.
    pub fn exclusion(&self, scored: &ScoredCandidate) -> Option<Exclusion> {
        if scored.candidate.protected {
            return Some(Exclusion::Protected);
        }
        if !scored.strong_match && !scored.weak_match {
            return Some(Exclusion::NoMatch);
        }
        let years_agree = match (scored.title_year, scored.query_title_year) {
            (Some(title), Some(query)) => title.abs_diff(query) <= self.year_tolerance,
            (None, None) => true,
            _ => false,
        };
        if !years_agree {
            return Some(Exclusion::YearMismatch);
        }
        match self.kind {
            // Multi-part movies ("Part 2") carry a season/episode tag too.
            MediaKind::Movie
                if scored.parsed.season_episode.is_some()
                    && !scored.candidate.name.to_lowercase().contains("part") =>
            {
                Some(Exclusion::EpisodeInMovie)
            }
            MediaKind::Series
                if self.season_episode.is_some()
                    && scored.parsed.season_episode != self.season_episode =>
            {
                Some(Exclusion::WrongEpisode)
            }
            _ => None,
        }
    }

    pub fn include(&self, scored: &ScoredCandidate) -> bool {
        match self.exclusion(scored) {
            Some(reason) => {
                trace!(ident = %scored.candidate.ident, reason = reason.as_str(), "Excluded candidate");
                false
            }
            None => true,
        }
    }
}
