//! The externally visible stream record.

use humansize::{format_size, DECIMAL};
use serde::{Deserialize, Serialize};

use crate::matching::ScoredCandidate;
use crate::parser::{parse_release_name, ParsedFilename};
use crate::provider::{FileDetails, SessionToken};
use crate::quality::{estimate_speed_from_size, format_speed, resolve_resolution};

/// Prefix of every binge-group key.
const BINGE_GROUP_PREFIX: &str = "sharestream";

/// Binge-group key: `prefix|language|resolution|source`.
///
/// Multi-language tags are joined with `+` so the key keeps exactly four
/// `|`-separated segments.
fn binge_group_key(parsed: &ParsedFilename) -> String {
    format!(
        "{}|{}|{}|{}",
        BINGE_GROUP_PREFIX,
        parsed.language.as_deref().unwrap_or_default().replace('|', "+"),
        parsed.resolution.as_deref().unwrap_or_default(),
        parsed.source.as_deref().unwrap_or_default(),
    )
}

/// A playable stream offered to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamResult {
    pub ident: String,
    /// Provider label plus match mark and resolution, e.g. `"Webshare ✅ 1080p"`.
    pub display_name: String,
    /// Multi-line summary: filename, language, votes, size, speed.
    pub description: String,
    pub playback_url: String,
    pub resolution: String,
    /// Minimum download speed, e.g. `"5.4 Mbps"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth_hint: Option<String>,
    /// Groups streams of the same language, resolution and source so players
    /// can auto-advance to the next episode.
    pub binge_group_key: String,
    pub provider: String,
    pub filename: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub pos_votes: u32,
    pub neg_votes: u32,
    pub strong_match: bool,
}

/// Playback URL served by this process for a provider file.
pub fn playback_url(public_url: &str, ident: &str, token: &SessionToken) -> String {
    format!(
        "{}/play/{}?token={}",
        public_url.trim_end_matches('/'),
        urlencoding::encode(ident),
        urlencoding::encode(token.as_str())
    )
}

impl StreamResult {
    /// Build the pre-enrichment record for a ranked candidate.
    pub fn from_scored(
        scored: &ScoredCandidate,
        provider: &str,
        public_url: &str,
        token: &SessionToken,
    ) -> Self {
        let candidate = &scored.candidate;
        let parsed = &scored.parsed;
        let binge_group_key = binge_group_key(parsed);

        let mut result = Self {
            ident: candidate.ident.clone(),
            display_name: String::new(),
            description: String::new(),
            playback_url: playback_url(public_url, &candidate.ident, token),
            resolution: scored.resolution.clone(),
            bandwidth_hint: Some(estimate_speed_from_size(candidate.size)),
            binge_group_key,
            provider: provider.to_string(),
            filename: candidate.name.clone(),
            size: candidate.size,
            language: parsed.language.clone(),
            pos_votes: candidate.pos_votes,
            neg_votes: candidate.neg_votes,
            strong_match: scored.strong_match,
        };
        result.refresh();
        result
    }

    /// Stream for a file picked directly by ident, outside any ranked search.
    ///
    /// With a detail record the display fields are filled from it; without
    /// one the stream carries only the ident and the playback URL.
    pub fn direct(
        ident: &str,
        details: Option<&FileDetails>,
        provider: &str,
        public_url: &str,
        token: &SessionToken,
    ) -> Self {
        let filename = details.map(|d| d.filename.clone()).unwrap_or_default();
        let size = details.map(|d| d.size).unwrap_or(0);
        let parsed = parse_release_name(&filename);

        let mut result = Self {
            ident: ident.to_string(),
            display_name: String::new(),
            description: String::new(),
            playback_url: playback_url(public_url, ident, token),
            resolution: resolve_resolution(&filename, size, None, None),
            bandwidth_hint: None,
            binge_group_key: binge_group_key(&parsed),
            provider: provider.to_string(),
            filename: if filename.is_empty() {
                ident.to_string()
            } else {
                filename
            },
            size,
            language: parsed.language,
            pos_votes: details.map(|d| d.pos_votes).unwrap_or(0),
            neg_votes: details.map(|d| d.neg_votes).unwrap_or(0),
            strong_match: false,
        };
        match details {
            Some(details) => {
                result.bandwidth_hint = Some(estimate_speed_from_size(size));
                result.apply_details(details);
            }
            None => result.refresh(),
        }
        result
    }

    /// Fold a detail record into the display fields.
    ///
    /// The resolution is re-resolved with the reported dimensions and the
    /// speed hint switches to the measured bitrate when there is one.
    pub fn apply_details(&mut self, details: &FileDetails) {
        let filename = if details.filename.is_empty() {
            self.filename.as_str()
        } else {
            details.filename.as_str()
        };
        self.resolution = resolve_resolution(filename, self.size, details.width, details.height);
        if let Some(bitrate) = details.bitrate {
            self.bandwidth_hint = Some(format_speed(bitrate));
        }
        self.refresh();
    }

    /// Rebuild `display_name` and `description` from the other fields.
    pub fn refresh(&mut self) {
        let mark = if self.strong_match { " ✅" } else { "" };
        self.display_name = format!("{}{} {}", self.provider, mark, self.resolution);

        let mut lines = vec![self.filename.clone()];
        if let Some(language) = &self.language {
            lines.push(format!("🌐 {}", language));
        }
        lines.push(format!("👍 {} 👎 {}", self.pos_votes, self.neg_votes));
        lines.push(format!("💾 {}", format_size(self.size, DECIMAL)));
        if let Some(speed) = &self.bandwidth_hint {
            lines.push(format!("⚡ {}", speed));
        }
        self.description = lines.join("\n");
    }
}
