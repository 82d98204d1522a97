//! Season/episode extraction from free-text filenames.

use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Season and episode numbers carried by a filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeasonEpisode {
    pub season: u32,
    pub episode: u32,
}

impl SeasonEpisode {
    pub fn new(season: u32, episode: u32) -> Self {
        Self { season, episode }
    }
}

/// A single extraction strategy.
struct Strategy {
    name: &'static str,
    regex: Regex,
    extract: fn(&Captures<'_>) -> Option<SeasonEpisode>,
}

/// `S01E03`, `S01 E03`, `Season 1 Episode 3`, `1x03`, `1 × 03`.
///
/// Three digits on both sides of an `x` is a frame size (`720x480`).
fn standard(caps: &Captures<'_>) -> Option<SeasonEpisode> {
    let (season, episode) = match (caps.get(1), caps.get(2)) {
        (Some(s), Some(e)) => (s, e),
        _ => {
            let (s, e) = (caps.get(3)?, caps.get(4)?);
            if s.as_str().len() == 3 && e.as_str().len() == 3 {
                return None;
            }
            (s, e)
        }
    };
    Some(SeasonEpisode::new(
        season.as_str().parse().ok()?,
        episode.as_str().parse().ok()?,
    ))
}

/// Episode-only and part markers imply season 1.
fn first_season(caps: &Captures<'_>) -> Option<SeasonEpisode> {
    let episode = caps.get(1)?.as_str().parse().ok()?;
    Some(SeasonEpisode::new(1, episode))
}

/// Strategies in specificity order; the first match wins.
static STRATEGIES: Lazy<Vec<Strategy>> = Lazy::new(|| {
    vec![
        Strategy {
            name: "standard",
            regex: Regex::new(
                r"(?i)(?:^|[^a-zA-Z0-9])(?:(?:s|season\s*)(\d{1,3})(?:\s*(?:\.|-|_|\s|$))?\s*(?:episode\s*|ep|e)(\d{1,3})|(\d{1,3})(?:x|\s*×\s*)(\d{1,3}))(?:[^a-zA-Z0-9]|$)",
            )
            .expect("standard season/episode pattern"),
            extract: standard,
        },
        Strategy {
            name: "episode_only",
            regex: Regex::new(r"(?i)(?:^|[^a-zA-Z0-9])(?:episode|ep|e|#)\s*(\d{1,3})(?:[^a-zA-Z0-9]|$)")
                .expect("episode-only pattern"),
            extract: first_season,
        },
        Strategy {
            name: "part",
            regex: Regex::new(r"(?i)(?:^|[^a-zA-Z0-9])(?:part|pt)\s*\.?\s*(\d{1,2})(?:[^a-zA-Z0-9]|$)")
                .expect("part pattern"),
            extract: first_season,
        },
    ]
});

/// Extract season/episode from a filename.
///
/// Returns `None` when no strategy matches; never fails.
pub fn extract_season_episode(filename: &str) -> Option<SeasonEpisode> {
    STRATEGIES.iter().find_map(|strategy| {
        strategy
            .regex
            .captures(filename)
            .and_then(|caps| (strategy.extract)(&caps))
    })
}

/// Byte offset where the first season/episode marker starts, if any.
///
/// Used by the release-name parser to cut the title.
pub(crate) fn marker_position(filename: &str) -> Option<(usize, usize)> {
    let strategy = STRATEGIES.first()?;
    let caps = strategy.regex.captures(filename)?;
    (strategy.extract)(&caps)?;
    let m = caps.get(0)?;
    let lead = m
        .as_str()
        .char_indices()
        .find(|(_, c)| c.is_ascii_alphanumeric())
        .map(|(i, _)| i)
        .unwrap_or(0);
    Some((m.start() + lead, m.end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn se(season: u32, episode: u32) -> Option<SeasonEpisode> {
        Some(SeasonEpisode::new(season, episode))
    }

    #[test]
    fn test_strategy_order_is_specificity_first() {
        let order: Vec<&str> = STRATEGIES.iter().map(|s| s.name).collect();
        assert_eq!(order, vec!["standard", "episode_only", "part"]);
    }

    #[test]
    fn test_standard_sxxexx() {
        assert_eq!(extract_season_episode("Show.S01E03.720p.mkv"), se(1, 3));
        assert_eq!(extract_season_episode("show s12e103 web"), se(12, 103));
        assert_eq!(extract_season_episode("Show S100E01"), se(100, 1));
    }

    #[test]
    fn test_standard_with_separators() {
        assert_eq!(extract_season_episode("720p S01 E03 Miracle man.avi"), se(1, 3));
        assert_eq!(extract_season_episode("Show.S02.E05.mkv"), se(2, 5));
        assert_eq!(extract_season_episode("Show S02-E05"), se(2, 5));
        assert_eq!(extract_season_episode("Show S02EP05"), se(2, 5));
    }

    #[test]
    fn test_long_form() {
        assert_eq!(
            extract_season_episode("Show Season 1 Episode 3 (2019)"),
            se(1, 3)
        );
    }

    #[test]
    fn test_cross_format() {
        assert_eq!(extract_season_episode("Pernikovy tata 01x14.mkv"), se(1, 14));
        assert_eq!(extract_season_episode("Show 3 × 07"), se(3, 7));
    }

    #[test]
    fn test_three_digit_seasons_in_both_forms() {
        assert_eq!(extract_season_episode("Show S100E05.mkv"), se(100, 5));
        assert_eq!(extract_season_episode("Show 100x05.mkv"), se(100, 5));
        assert_eq!(extract_season_episode("Show 100x105.mkv"), None);
    }

    #[test]
    fn test_zero_padding_is_stripped() {
        assert_eq!(extract_season_episode("S001E003"), se(1, 3));
    }

    #[test]
    fn test_episode_only_assumes_first_season() {
        assert_eq!(extract_season_episode("Show Episode 4.mkv"), se(1, 4));
        assert_eq!(extract_season_episode("Show Ep 12"), se(1, 12));
        assert_eq!(extract_season_episode("Show #7"), se(1, 7));
        assert_eq!(extract_season_episode("Show E05.avi"), se(1, 5));
    }

    #[test]
    fn test_part_assumes_first_season() {
        assert_eq!(
            extract_season_episode("Harry Potter and the Deathly Hallows - Part 1 (2010)"),
            se(1, 1)
        );
        assert_eq!(extract_season_episode("Kill.Bill.Pt.2.mkv"), se(1, 2));
    }

    #[test]
    fn test_standard_wins_over_looser_patterns() {
        assert_eq!(extract_season_episode("Show Part 2 S03E04"), se(3, 4));
    }

    #[test]
    fn test_resolution_is_not_an_episode() {
        assert_eq!(extract_season_episode("Movie 1280x720.mkv"), None);
        assert_eq!(extract_season_episode("Movie.720x480.avi"), None);
    }

    #[test]
    fn test_words_do_not_match() {
        assert_eq!(extract_season_episode("The Matrix 1999 1080p.mkv"), None);
        assert_eq!(extract_season_episode("Departed.2006.mkv"), None);
        assert_eq!(extract_season_episode("Wonder Woman 1984 2020"), None);
        assert_eq!(extract_season_episode(""), None);
    }

    #[test]
    fn test_marker_position_points_at_marker() {
        let name = "Show.Name.S01E02.mkv";
        let (start, _) = marker_position(name).unwrap();
        assert_eq!(&name[start..start + 6], "S01E02");
        assert!(marker_position("Movie.2019.mkv").is_none());
        assert!(marker_position("Movie.720x480.avi").is_none());
    }
}
