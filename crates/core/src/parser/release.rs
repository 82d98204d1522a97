//! Release-name parsing: title, year, resolution and source from a filename.

use serde::{Deserialize, Serialize};

use super::language::{canonical_code, extract_language};
use super::season_episode::{extract_season_episode, marker_position, SeasonEpisode};
use super::VIDEO_EXTENSIONS;

/// Everything the parser can read out of a raw filename.
///
/// Missing pieces stay `None`; a filename that cannot be interpreted at all
/// yields its cleaned stem as the title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFilename {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_episode: Option<SeasonEpisode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

const CODEC_AND_TAGS: &[&str] = &[
    "X264", "X265", "H264", "H265", "HEVC", "AVC", "XVID", "DIVX", "AAC", "AC3", "EAC3", "DTS",
    "DD5", "DDP5", "ATMOS", "TRUEHD", "HDR", "HDR10", "DV", "10BIT", "8BIT", "REMASTERED",
    "EXTENDED", "UNRATED", "UNCUT", "PROPER", "REPACK", "INTERNAL", "LIMITED", "COMPLETE",
    "DUBBED", "SUBBED", "TITULKY", "DABING", "MULTI", "DUAL",
];

#[derive(Debug)]
struct Token<'a> {
    start: usize,
    end: usize,
    text: &'a str,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    for (idx, ch) in text.char_indices() {
        if ch.is_alphanumeric() {
            start.get_or_insert(idx);
        } else if let Some(s) = start.take() {
            tokens.push(Token {
                start: s,
                end: idx,
                text: &text[s..idx],
            });
        }
    }
    if let Some(s) = start {
        tokens.push(Token {
            start: s,
            end: text.len(),
            text: &text[s..],
        });
    }
    tokens
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && VIDEO_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext)) =>
        {
            stem
        }
        _ => name,
    }
}

/// Drop a leading `[Group]` tag.
fn strip_group_prefix(name: &str) -> &str {
    let trimmed = name.trim_start();
    if trimmed.starts_with('[') {
        if let Some(close) = trimmed.find(']') {
            let rest = trimmed[close + 1..].trim_start();
            if !rest.is_empty() {
                return rest;
            }
        }
    }
    trimmed
}

fn year_value(token: &str) -> Option<u32> {
    if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok().filter(|y| (1900..=2099).contains(y))
}

fn resolution_label(upper: &str) -> Option<&'static str> {
    match upper {
        "2160P" | "4K" | "UHD" => Some("2160p"),
        "1440P" => Some("1440p"),
        "1080P" | "1080I" | "FHD" => Some("1080p"),
        "720P" => Some("720p"),
        "576P" => Some("576p"),
        "480P" => Some("480p"),
        "360P" => Some("360p"),
        _ => None,
    }
}

/// Source label for the token at `idx`, looking one token ahead for
/// split spellings such as `WEB-DL` and `Blu-Ray`.
fn source_label(tokens: &[Token<'_>], idx: usize) -> Option<&'static str> {
    let upper = tokens[idx].text.to_ascii_uppercase();
    let next = tokens
        .get(idx + 1)
        .map(|t| t.text.to_ascii_uppercase())
        .unwrap_or_default();
    match upper.as_str() {
        "BLURAY" => Some("BluRay"),
        "BLU" if next == "RAY" => Some("BluRay"),
        "WEB" if next == "DL" => Some("WEB-DL"),
        "WEB" if next == "RIP" => Some("WEBRip"),
        "WEBDL" => Some("WEB-DL"),
        "WEBRIP" => Some("WEBRip"),
        "WEB" => Some("WEB"),
        "HDTV" => Some("HDTV"),
        "DVDRIP" => Some("DVDRip"),
        "DVD" => Some("DVD"),
        "BDRIP" => Some("BDRip"),
        "BRRIP" => Some("BRRip"),
        "HDRIP" => Some("HDRip"),
        "TVRIP" => Some("TVRip"),
        "REMUX" | "BDREMUX" => Some("Remux"),
        "CAM" | "HDCAM" => Some("CAM"),
        _ => None,
    }
}

fn is_tag(tokens: &[Token<'_>], idx: usize) -> bool {
    let upper = tokens[idx].text.to_ascii_uppercase();
    if CODEC_AND_TAGS.contains(&upper.as_str()) {
        return true;
    }
    // "H.264"
    upper == "H"
        && tokens
            .get(idx + 1)
            .is_some_and(|t| t.text == "264" || t.text == "265")
}

/// Upper-case language code after the first word, e.g. `Pelisky.CZ`.
fn is_language_tag(tokens: &[Token<'_>], idx: usize) -> bool {
    let text = tokens[idx].text;
    idx > 0 && text.chars().all(|c| !c.is_lowercase()) && canonical_code(text).is_some()
}

fn clean_segment(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| if c == '.' || c == '_' { ' ' } else { c })
        .collect();
    spaced
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '(' | ')' | '[' | ']' | ',' | '+'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a raw filename into its release components.
pub fn parse_release_name(filename: &str) -> ParsedFilename {
    let stem = strip_group_prefix(strip_extension(filename.trim()));
    let tokens = tokenize(stem);

    let mut resolution = None;
    let mut source = None;
    let mut year_candidates: Vec<(usize, u32)> = Vec::new();
    // (start, end) of every non-year marker
    let mut markers: Vec<(usize, usize)> = Vec::new();

    for (idx, token) in tokens.iter().enumerate() {
        let upper = token.text.to_ascii_uppercase();
        if let Some(year) = year_value(token.text) {
            if idx > 0 {
                year_candidates.push((idx, year));
            }
        } else if let Some(label) = resolution_label(&upper) {
            resolution.get_or_insert(label);
            markers.push((token.start, token.end));
        } else if let Some(label) = source_label(&tokens, idx) {
            source.get_or_insert(label);
            markers.push((token.start, token.end));
        } else if is_tag(&tokens, idx) || is_language_tag(&tokens, idx) {
            markers.push((token.start, token.end));
        }
    }

    if let Some(se_marker) = marker_position(stem) {
        markers.push(se_marker);
    }

    let first_marker = markers.iter().map(|(start, _)| *start).min();

    let year_before_marker = year_candidates
        .iter()
        .rev()
        .find(|(idx, _)| first_marker.is_none_or(|m| tokens[*idx].start < m))
        .copied();
    let year = year_before_marker
        .or_else(|| year_candidates.first().copied())
        .map(|(_, y)| y);

    let cut = match (first_marker, year_before_marker) {
        (Some(m), Some((idx, _))) => Some(m.min(tokens[idx].start)),
        (Some(m), None) => Some(m),
        (None, Some((idx, _))) => Some(tokens[idx].start),
        (None, None) => None,
    };

    let mut title = clean_segment(cut.map_or(stem, |c| &stem[..c]));
    if title.is_empty() {
        // Marker at the very start: the title follows the last marker.
        let tail = markers
            .iter()
            .map(|(_, end)| *end)
            .chain(year_before_marker.map(|(idx, _)| tokens[idx].end))
            .max()
            .unwrap_or(0);
        title = clean_segment(&stem[tail.min(stem.len())..]);
    }
    if title.is_empty() {
        title = clean_segment(stem);
    }

    ParsedFilename {
        title,
        year,
        season_episode: extract_season_episode(filename),
        resolution: resolution.map(str::to_string),
        source: source.map(str::to_string),
        language: extract_language(filename),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_movie() {
        let parsed = parse_release_name("The.LongTrain.1999.1080p.BluRay.x264-[YTS.AG].mkv");
        assert_eq!(parsed.title, "The LongTrain");
        assert_eq!(parsed.year, Some(1999));
        assert_eq!(parsed.resolution.as_deref(), Some("1080p"));
        assert_eq!(parsed.source.as_deref(), Some("BluRay"));
        assert_eq!(parsed.season_episode, None);
        assert_eq!(parsed.language, None);
    }

    #[test]
    fn test_plain_title_with_year() {
        let parsed = parse_release_name("Miracle man 2024.avi");
        assert_eq!(parsed.title, "Miracle man");
        assert_eq!(parsed.year, Some(2024));
    }

    #[test]
    fn test_title_containing_a_year() {
        let parsed = parse_release_name("Wonder.Woman.1984.2020.1080p.WEB-DL.mkv");
        assert_eq!(parsed.title, "Wonder Woman 1984");
        assert_eq!(parsed.year, Some(2020));
        assert_eq!(parsed.source.as_deref(), Some("WEB-DL"));

        let query = parse_release_name("Wonder Woman 1984");
        assert_eq!(query.year, Some(1984));
        assert_eq!(query.title, "Wonder Woman");
    }

    #[test]
    fn test_year_as_title() {
        let parsed = parse_release_name("1917.2019.2160p.UHD.BluRay.mkv");
        assert_eq!(parsed.title, "1917");
        assert_eq!(parsed.year, Some(2019));
        assert_eq!(parsed.resolution.as_deref(), Some("2160p"));

        let bare = parse_release_name("2012.mkv");
        assert_eq!(bare.title, "2012");
        assert_eq!(bare.year, None);
    }

    #[test]
    fn test_bracketed_year_and_part() {
        let parsed = parse_release_name(
            "Harry Potter and the Deathly Hallows - Part 1 (2010) (2160p BluRay x265 10bit HDR Tigole).mkv",
        );
        assert_eq!(parsed.title, "Harry Potter and the Deathly Hallows - Part 1");
        assert_eq!(parsed.year, Some(2010));
        assert_eq!(parsed.resolution.as_deref(), Some("2160p"));
    }

    #[test]
    fn test_series_episode() {
        let parsed = parse_release_name("Breaking.Bad.S02E05.720p.HDTV.x264.mkv");
        assert_eq!(parsed.title, "Breaking Bad");
        assert_eq!(parsed.season_episode, Some(SeasonEpisode::new(2, 5)));
        assert_eq!(parsed.source.as_deref(), Some("HDTV"));
        assert_eq!(parsed.year, None);
    }

    #[test]
    fn test_markers_before_title() {
        let parsed = parse_release_name("720p S01 E03 Miracle man.avi");
        assert_eq!(parsed.title, "Miracle man");
        assert_eq!(parsed.season_episode, Some(SeasonEpisode::new(1, 3)));
    }

    #[test]
    fn test_language_tag_cuts_title() {
        let parsed = parse_release_name("Pelisky.CZ.EN.avi");
        assert_eq!(parsed.title, "Pelisky");
        assert_eq!(parsed.language.as_deref(), Some("CZ|EN"));
    }

    #[test]
    fn test_group_prefix_and_underscores() {
        let parsed = parse_release_name("[Group] Some_Show_Name_-_S01E02_[1080p].mkv");
        assert_eq!(parsed.title, "Some Show Name");
        assert_eq!(parsed.resolution.as_deref(), Some("1080p"));
    }

    #[test]
    fn test_unparseable_name_keeps_stem() {
        let parsed = parse_release_name("???.mkv");
        assert_eq!(parsed.title, "???");
        let empty = parse_release_name("");
        assert_eq!(empty.title, "");
        assert_eq!(empty.year, None);
    }
}
