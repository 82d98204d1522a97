//! Free-text filename parsing.
//!
//! Nothing in here fails: filenames that cannot be interpreted degrade to
//! `None` fields so one odd name never breaks a batch.

mod language;
mod release;
mod season_episode;

pub use language::{canonical_code, extract_language};
pub use release::{parse_release_name, ParsedFilename};
pub use season_episode::{extract_season_episode, SeasonEpisode};

/// Container extensions recognised across the parsers (upper-case).
pub(crate) const VIDEO_EXTENSIONS: &[&str] = &[
    "MKV", "MP4", "AVI", "MOV", "WMV", "FLV", "WEBM", "M4V", "TS", "MTS", "M2TS", "VOB", "OGM",
    "OGV", "ASF", "RM", "RMVB", "3GP", "3G2", "F4V", "F4P", "F4A", "F4B",
];
