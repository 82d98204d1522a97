//! Deduplication of provider results by ident.

use std::collections::HashSet;

use crate::provider::RawCandidate;

/// Drop repeated idents, keeping the first occurrence in query order.
///
/// The same file is usually returned by several queries (localized and
/// original title); only one copy may reach scoring.
pub fn deduplicate_candidates(raw: Vec<RawCandidate>) -> Vec<RawCandidate> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    raw.into_iter()
        .filter(|candidate| seen.insert(candidate.ident.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::candidate_with;

    #[test]
    fn test_duplicates_removed_first_kept() {
        let raw = vec![
            candidate_with("a", "Movie.CZ.mkv", 10, 1, 0),
            candidate_with("b", "Movie.EN.mkv", 20, 2, 0),
            candidate_with("a", "Movie.CZ.mkv", 10, 5, 0),
            candidate_with("c", "Movie.SK.mkv", 30, 3, 0),
            candidate_with("b", "Movie.EN.mkv", 20, 2, 0),
        ];
        let unique = deduplicate_candidates(raw);
        let idents: Vec<_> = unique.iter().map(|c| c.ident.as_str()).collect();
        assert_eq!(idents, vec!["a", "b", "c"]);
        assert_eq!(unique[0].pos_votes, 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(deduplicate_candidates(Vec::new()).is_empty());
    }
}
