//! Deterministic ordering of filtered candidates.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::quality::resolution_priority;

use super::scorer::ScoredCandidate;

/// Secondary ordering applied within a match tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMethod {
    /// Title match, then positive votes, then size.
    #[default]
    Votes,
    /// Size, then title match, then positive votes.
    Filesize,
    /// Resolution priority, then title match, size and positive votes.
    Resolution,
}

impl std::fmt::Display for SortMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMethod::Votes => write!(f, "votes"),
            SortMethod::Filesize => write!(f, "filesize"),
            SortMethod::Resolution => write!(f, "resolution"),
        }
    }
}

impl std::str::FromStr for SortMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "votes" => Ok(SortMethod::Votes),
            "filesize" => Ok(SortMethod::Filesize),
            "resolution" => Ok(SortMethod::Resolution),
            other => Err(format!("unknown sort method: {}", other)),
        }
    }
}

fn by_match(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.title_match.total_cmp(&a.title_match)
}

fn by_votes(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.candidate.pos_votes.cmp(&a.candidate.pos_votes)
}

fn by_size(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.candidate.size.cmp(&a.candidate.size)
}

fn by_resolution(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    resolution_priority(&b.resolution).cmp(&resolution_priority(&a.resolution))
}

/// Total order: strong tier first, then the sort method, then the rounded
/// filename match between two weak candidates.
pub fn compare(a: &ScoredCandidate, b: &ScoredCandidate, method: SortMethod) -> Ordering {
    let tier = b.strong_match.cmp(&a.strong_match);
    if tier != Ordering::Equal {
        return tier;
    }

    let within = match method {
        SortMethod::Votes => by_match(a, b)
            .then_with(|| by_votes(a, b))
            .then_with(|| by_size(a, b)),
        SortMethod::Filesize => by_size(a, b)
            .then_with(|| by_match(a, b))
            .then_with(|| by_votes(a, b)),
        SortMethod::Resolution => by_resolution(a, b)
            .then_with(|| by_match(a, b))
            .then_with(|| by_size(a, b))
            .then_with(|| by_votes(a, b)),
    };

    within.then_with(|| {
        if !a.strong_match && !b.strong_match {
            b.fulltext_match().total_cmp(&a.fulltext_match())
        } else {
            Ordering::Equal
        }
    })
}

/// Sort candidates best first and keep at most `max_results`.
///
/// The sort is stable, so fully tied candidates keep their input order.
pub fn rank(
    mut candidates: Vec<ScoredCandidate>,
    method: SortMethod,
    max_results: usize,
) -> Vec<ScoredCandidate> {
    candidates.sort_by(|a, b| compare(a, b, method));
    candidates.truncate(max_results);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::scored;

    fn idents(ranked: &[ScoredCandidate]) -> Vec<&str> {
        ranked.iter().map(|c| c.candidate.ident.as_str()).collect()
    }

    #[test]
    fn test_strong_tier_always_first() {
        let weak = scored("weak", 0.4, 0.9, 1000, 50_000_000_000);
        let strong = scored("strong", 0.6, 0.1, 0, 1);
        let ranked = rank(vec![weak, strong], SortMethod::Filesize, 100);
        assert_eq!(idents(&ranked), vec!["strong", "weak"]);
    }

    #[test]
    fn test_votes_ordering() {
        let ranked = rank(
            vec![
                scored("low-match", 0.7, 0.5, 100, 10),
                scored("few-votes", 0.9, 0.5, 1, 10),
                scored("many-votes", 0.9, 0.5, 5, 10),
                scored("bigger", 0.9, 0.5, 5, 20),
            ],
            SortMethod::Votes,
            100,
        );
        assert_eq!(
            idents(&ranked),
            vec!["bigger", "many-votes", "few-votes", "low-match"]
        );
    }

    #[test]
    fn test_filesize_ordering() {
        let ranked = rank(
            vec![
                scored("small", 1.0, 0.5, 100, 10),
                scored("large-low", 0.6, 0.5, 0, 30),
                scored("large-high", 0.8, 0.5, 0, 30),
            ],
            SortMethod::Filesize,
            100,
        );
        assert_eq!(idents(&ranked), vec!["large-high", "large-low", "small"]);
    }

    #[test]
    fn test_resolution_ordering() {
        let mut uhd = scored("uhd", 0.6, 0.5, 0, 10);
        uhd.resolution = "2160p".into();
        let mut hd = scored("hd", 0.9, 0.5, 0, 10);
        hd.resolution = "720p".into();
        let mut custom = scored("custom", 0.9, 0.5, 0, 10);
        custom.resolution = "1920x1080".into();
        let mut sd = scored("sd", 1.0, 0.5, 0, 10);
        sd.resolution = "SD".into();

        let ranked = rank(vec![sd, hd, uhd, custom], SortMethod::Resolution, 100);
        assert_eq!(idents(&ranked), vec!["uhd", "custom", "hd", "sd"]);
    }

    #[test]
    fn test_weak_pairs_fall_back_to_fulltext() {
        let ranked = rank(
            vec![
                scored("a", 0.2, 0.41, 0, 10),
                scored("b", 0.2, 0.68, 0, 10),
            ],
            SortMethod::Votes,
            100,
        );
        assert_eq!(idents(&ranked), vec!["b", "a"]);
    }

    #[test]
    fn test_ties_keep_input_order_and_ranking_is_idempotent() {
        let input = vec![
            scored("first", 0.8, 0.5, 3, 10),
            scored("second", 0.8, 0.5, 3, 10),
            scored("third", 0.9, 0.5, 0, 10),
        ];
        let once = rank(input, SortMethod::Votes, 100);
        assert_eq!(idents(&once), vec!["third", "first", "second"]);
        let twice = rank(once.clone(), SortMethod::Votes, 100);
        assert_eq!(idents(&twice), idents(&once));
    }

    #[test]
    fn test_truncation() {
        let input: Vec<_> = (0..150)
            .map(|i| scored(&format!("c{}", i), 0.9, 0.5, i, 10))
            .collect();
        let ranked = rank(input, SortMethod::Votes, 100);
        assert_eq!(ranked.len(), 100);
        assert_eq!(ranked[0].candidate.ident, "c149");
    }

    #[test]
    fn test_sort_method_parsing() {
        assert_eq!("votes".parse::<SortMethod>().unwrap(), SortMethod::Votes);
        assert_eq!("FileSize".parse::<SortMethod>().unwrap(), SortMethod::Filesize);
        assert_eq!("resolution".parse::<SortMethod>().unwrap(), SortMethod::Resolution);
        assert!("seeders".parse::<SortMethod>().is_err());
        assert_eq!(SortMethod::default(), SortMethod::Votes);
        assert_eq!(SortMethod::Filesize.to_string(), "filesize");
    }
}
