//! Search-query generation from a show descriptor.

use serde::{Deserialize, Serialize};

use crate::parser::SeasonEpisode;

/// What kind of title is being searched for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Movie,
    Series,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Series => write!(f, "series"),
        }
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaKind::Movie),
            "series" => Ok(MediaKind::Series),
            other => Err(format!("unknown media kind: {}", other)),
        }
    }
}

/// The title being searched for, as resolved by a metadata lookup.
///
/// `localized_names` runs from the primary localized name to the original
/// title, which is always last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowDescriptor {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub localized_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl ShowDescriptor {
    /// Describe a movie.
    pub fn movie<I, S>(names: I, year: Option<u32>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: MediaKind::Movie,
            localized_names: dedup_names(names),
            year,
            season: None,
            episode: None,
        }
    }

    /// Describe a single series episode.
    pub fn episode<I, S>(names: I, season: u32, episode: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: MediaKind::Series,
            localized_names: dedup_names(names),
            year: None,
            season: Some(season),
            episode: Some(episode),
        }
    }

    pub fn with_year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn is_movie(&self) -> bool {
        self.kind == MediaKind::Movie
    }

    /// Requested season/episode, only when both are known.
    pub fn season_episode(&self) -> Option<SeasonEpisode> {
        match (self.season, self.episode) {
            (Some(season), Some(episode)) => Some(SeasonEpisode::new(season, episode)),
            _ => None,
        }
    }

    /// Distinct non-empty names in descriptor order.
    ///
    /// Descriptors deserialized from requests are not deduplicated on the
    /// way in, so every consumer goes through here.
    pub fn names(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for name in &self.localized_names {
            let name = name.trim();
            if !name.is_empty() && !seen.contains(&name) {
                seen.push(name);
            }
        }
        seen
    }
}

fn dedup_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = name.into().trim().to_string();
        if !name.is_empty() && !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// Build the ordered list of search queries for a descriptor.
///
/// Series episodes yield `"{name} S01E02"` then `"{name} 01x02"` per name.
/// Movies yield each bare name, followed by `"{name} {year}"` when
/// `year_variants` is set and the year is known. The first query is always
/// built from the primary name and the last from the original title.
pub fn build_queries(descriptor: &ShowDescriptor, year_variants: bool) -> Vec<String> {
    let names = descriptor.names();
    match (descriptor.kind, descriptor.season_episode()) {
        (MediaKind::Series, Some(se)) => names
            .iter()
            .flat_map(|name| {
                [
                    format!("{} S{:02}E{:02}", name, se.season, se.episode),
                    format!("{} {:02}x{:02}", name, se.season, se.episode),
                ]
            })
            .collect(),
        (MediaKind::Movie, _) if year_variants => names
            .iter()
            .flat_map(|name| {
                let mut queries = vec![name.to_string()];
                if let Some(year) = descriptor.year {
                    queries.push(format!("{} {}", name, year));
                }
                queries
            })
            .collect(),
        _ => names.iter().map(|name| name.to_string()).collect(),
    }
}
