//! Title identifiers accepted by stream requests.

use std::fmt;

use crate::parser::SeasonEpisode;

/// A title identifier, optionally pointing at one episode.
///
/// Accepted forms: `tt1234567`, `tt1234567:2:5`, `tmdb:123`, `tmdb:123:2:5`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaId {
    Imdb {
        id: String,
        episode: Option<SeasonEpisode>,
    },
    Tmdb {
        id: u32,
        episode: Option<SeasonEpisode>,
    },
}

fn parse_episode(parts: &[&str]) -> Option<Option<SeasonEpisode>> {
    match parts {
        [] => Some(None),
        [season, episode] => Some(Some(SeasonEpisode::new(
            season.parse().ok()?,
            episode.parse().ok()?,
        ))),
        _ => None,
    }
}

impl MediaId {
    /// Parse an identifier; anything unrecognized yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.trim().split(':').collect();
        match parts.as_slice() {
            ["tmdb", id, rest @ ..] => Some(MediaId::Tmdb {
                id: id.parse().ok()?,
                episode: parse_episode(rest)?,
            }),
            [id, rest @ ..] if is_imdb_id(id) => Some(MediaId::Imdb {
                id: id.to_string(),
                episode: parse_episode(rest)?,
            }),
            _ => None,
        }
    }

    pub fn episode(&self) -> Option<SeasonEpisode> {
        match self {
            MediaId::Imdb { episode, .. } | MediaId::Tmdb { episode, .. } => *episode,
        }
    }
}

fn is_imdb_id(id: &str) -> bool {
    id.len() > 2
        && id.starts_with("tt")
        && id[2..].chars().all(|c| c.is_ascii_digit())
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaId::Imdb { id, .. } => write!(f, "{}", id)?,
            MediaId::Tmdb { id, .. } => write!(f, "tmdb:{}", id)?,
        }
        if let Some(se) = self.episode() {
            write!(f, ":{}:{}", se.season, se.episode)?;
        }
        Ok(())
    }
}
