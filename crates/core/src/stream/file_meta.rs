//! Detail view of a single provider file, for clients browsing direct
//! search hits.

use humansize::{format_size, DECIMAL};
use serde::{Deserialize, Serialize};

use crate::parser::{extract_language, parse_release_name, SeasonEpisode};
use crate::provider::FileDetails;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub ident: String,
    /// Parsed title with an `SxxEyy` suffix for episodes.
    pub name: String,
    pub filename: String,
    /// Multi-line summary: filename, language, votes, size, uploader text.
    pub description: String,
    /// Preview strip image, used as both poster and background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_episode: Option<SeasonEpisode>,
    pub protected: bool,
}

impl FileMeta {
    pub fn from_details(details: &FileDetails, website: Option<String>) -> Self {
        let parsed = parse_release_name(&details.filename);
        let title = if parsed.title.is_empty() {
            details.filename.as_str()
        } else {
            parsed.title.as_str()
        };
        let name = match parsed.season_episode {
            Some(se) => format!("{} S{:02}E{:02}", title, se.season, se.episode),
            None => title.to_string(),
        };

        let language = extract_language(&details.filename);
        let mut lines = vec![details.filename.clone()];
        if let Some(language) = &language {
            lines.push(format!("🌐 {}", language));
        }
        lines.push(format!("👍 {} 👎 {}", details.pos_votes, details.neg_votes));
        lines.push(format!("💾 {}", format_size(details.size, DECIMAL)));
        if let Some(text) = &details.description {
            lines.push(text.clone());
        }

        Self {
            ident: details.ident.clone(),
            name,
            filename: details.filename.clone(),
            description: lines.join("\n"),
            poster: details.stripe.clone(),
            website,
            size: details.size,
            language,
            season_episode: parsed.season_episode,
            protected: details.protected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::details;

    #[test]
    fn test_episode_meta() {
        let mut record = details("ep1", "Chernobyl.S01E02.CZ.1080p.mkv", None, None, None);
        record.pos_votes = 4;
        record.neg_votes = 1;
        record.stripe = Some("https://img.example/s.jpg".into());
        record.description = Some("Druhy dil".into());

        let meta = FileMeta::from_details(&record, Some("https://files.example/ep1".into()));

        assert_eq!(meta.name, "Chernobyl S01E02");
        assert_eq!(meta.season_episode, Some(SeasonEpisode::new(1, 2)));
        assert_eq!(meta.poster.as_deref(), Some("https://img.example/s.jpg"));
        assert_eq!(meta.website.as_deref(), Some("https://files.example/ep1"));
        assert_eq!(
            meta.description,
            "Chernobyl.S01E02.CZ.1080p.mkv\n🌐 CZ\n👍 4 👎 1\n💾 1 GB\nDruhy dil"
        );
    }

    #[test]
    fn test_movie_meta_without_extras() {
        let meta = FileMeta::from_details(
            &details("m1", "Pelisky.1999.avi", None, None, None),
            None,
        );
        assert_eq!(meta.name, "Pelisky");
        assert_eq!(meta.season_episode, None);
        assert_eq!(meta.poster, None);
        assert_eq!(meta.description, "Pelisky.1999.avi\n👍 0 👎 0\n💾 1 GB");
    }
}
