//! Resolution labels and bandwidth hints.
//!
//! Resolution is resolved with a three-level fallback: tokens in the
//! filename, then provider-reported dimensions, then a file-size guess.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Pixel tokens matched anywhere in the lower-cased filename.
const PIXEL_TOKENS: &[(&str, &str)] = &[
    ("2160p", "2160p"),
    ("1440p", "1440p"),
    ("1080p", "1080p"),
    ("720p", "720p"),
    ("480p", "480p"),
    ("360p", "360p"),
];

/// Short tokens that must stand alone, otherwise "hd" would match "hdtv"
/// and "hdr".
const WORD_TOKENS: &[(&str, &str)] = &[
    ("4k", "2160p"),
    ("uhd", "2160p"),
    ("fhd", "1080p"),
    ("hd", "720p"),
];

static DIMENSIONS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{3,4})x(\d{3,4})").unwrap());

const GB: u64 = 1_000_000_000;
const MB: u64 = 1_000_000;

fn height_label(height: u32) -> Option<&'static str> {
    match height {
        h if h >= 2160 => Some("2160p"),
        h if h >= 1440 => Some("1440p"),
        h if h >= 1080 => Some("1080p"),
        h if h >= 720 => Some("720p"),
        h if h >= 480 => Some("480p"),
        h if h >= 360 => Some("360p"),
        _ => None,
    }
}

fn has_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token == word)
}

/// Resolution label from the filename alone.
pub fn resolution_from_filename(filename: &str) -> Option<String> {
    let name = filename.to_lowercase();

    // Ordered best first, word tokens ranked alongside their pixel label.
    for (pixel, label) in PIXEL_TOKENS {
        if name.contains(pixel)
            || WORD_TOKENS
                .iter()
                .any(|(word, word_label)| word_label == label && has_word(&name, word))
        {
            return Some((*label).to_string());
        }
    }

    DIMENSIONS
        .captures(&name)
        .map(|caps| format!("{}x{}", &caps[1], &caps[2]))
}

/// Resolve a display resolution.
///
/// A filename token wins over provider dimensions, which win over the
/// size heuristic. Never fails; the last resort is `"SD"`.
pub fn resolve_resolution(
    filename: &str,
    size: u64,
    width: Option<u32>,
    height: Option<u32>,
) -> String {
    if let Some(label) = resolution_from_filename(filename) {
        return label;
    }

    if let (Some(width), Some(height)) = (width, height) {
        return match height_label(height) {
            Some(label) => label.to_string(),
            None => format!("{}x{}", width, height),
        };
    }

    match size {
        s if s > 8 * GB => "2160p",
        s if s > 3 * GB => "1080p",
        s if s > 1_500 * MB => "720p",
        s if s > 500 * MB => "480p",
        _ => "SD",
    }
    .to_string()
}

/// Sort priority of a resolution label, higher is better.
///
/// `WxH` labels are bucketed by height; anything unrecognised is 1.
pub fn resolution_priority(resolution: &str) -> u8 {
    let res = resolution.to_lowercase();
    if res.is_empty() {
        return 0;
    }
    if res.contains("2160p") || res.contains("4k") {
        return 10;
    }
    for (token, priority) in [("1440p", 9), ("1080p", 8), ("720p", 7), ("480p", 6), ("360p", 5)] {
        if res.contains(token) {
            return priority;
        }
    }
    if let Some(caps) = DIMENSIONS.captures(&res) {
        let height: u32 = caps[2].parse().unwrap_or(0);
        return match height {
            h if h >= 2160 => 10,
            h if h >= 1440 => 9,
            h if h >= 1080 => 8,
            h if h >= 720 => 7,
            h if h >= 480 => 6,
            h if h >= 360 => 5,
            _ => 4,
        };
    }
    1
}

/// Minimum download speed for a bitrate, with a 1.2x safety margin.
///
/// `4_500_000` bps becomes `"5.4 Mbps"`.
pub fn format_speed(bitrate: u64) -> String {
    let mbps = bitrate as f64 / 1_000_000.0 * 1.2;
    let rounded = (mbps * 10.0).round() / 10.0;
    format!("{} Mbps", rounded)
}

/// Coarse speed hint when no bitrate is known.
pub fn estimate_speed_from_size(size: u64) -> String {
    let mbps = match size {
        s if s > 8 * GB => 25,
        s if s > 4 * GB => 15,
        s if s > 2 * GB => 10,
        s if s > GB => 8,
        s if s > 500 * MB => 5,
        s if s > 200 * MB => 3,
        _ => 2,
    };
    format!("{} Mbps", mbps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_token_wins() {
        assert_eq!(
            resolve_resolution("Movie.1080p.mkv", 100, Some(3840), Some(2160)),
            "1080p"
        );
        assert_eq!(resolve_resolution("Movie.4K.HDR.mkv", 0, None, None), "2160p");
        assert_eq!(resolve_resolution("Movie UHD.mkv", 0, None, None), "2160p");
        assert_eq!(resolve_resolution("Movie.FHD.mkv", 0, None, None), "1080p");
        assert_eq!(resolve_resolution("Movie HD.avi", 0, None, None), "720p");
    }

    #[test]
    fn test_short_tokens_need_boundaries() {
        // "hd" inside a word must not count
        assert_eq!(
            resolve_resolution("Movie.HDR.avi", 600 * MB, None, None),
            "480p"
        );
        assert_eq!(
            resolve_resolution("Show.HDTV.avi", 100 * MB, None, None),
            "SD"
        );
    }

    #[test]
    fn test_dimensions_in_filename_verbatim() {
        assert_eq!(
            resolve_resolution("clip_432x240.mp4", 9 * GB, None, None),
            "432x240"
        );
    }

    #[test]
    fn test_api_dimensions() {
        assert_eq!(
            resolve_resolution("Movie.mkv", 100, Some(1920), Some(1080)),
            "1080p"
        );
        assert_eq!(
            resolve_resolution("Movie.mkv", 100, Some(1280), Some(536)),
            "480p"
        );
        assert_eq!(
            resolve_resolution("Movie.mkv", 9 * GB, Some(320), Some(240)),
            "320x240"
        );
        // one dimension alone is not enough
        assert_eq!(resolve_resolution("Movie.mkv", 100, None, Some(1080)), "SD");
    }

    #[test]
    fn test_size_fallback() {
        assert_eq!(resolve_resolution("Movie.mkv", 3_100 * MB, None, None), "1080p");
        assert_eq!(resolve_resolution("Movie.mkv", 600 * MB, None, None), "480p");
        assert_eq!(resolve_resolution("Movie.mkv", 9 * GB, None, None), "2160p");
        assert_eq!(resolve_resolution("Movie.mkv", 1_600 * MB, None, None), "720p");
        assert_eq!(resolve_resolution("Movie.mkv", 500 * MB, None, None), "SD");
    }

    #[test]
    fn test_resolution_priority() {
        assert_eq!(resolution_priority("2160p"), 10);
        assert_eq!(resolution_priority("4K"), 10);
        assert_eq!(resolution_priority("1440p"), 9);
        assert_eq!(resolution_priority("1080p"), 8);
        assert_eq!(resolution_priority("720p"), 7);
        assert_eq!(resolution_priority("480p"), 6);
        assert_eq!(resolution_priority("360p"), 5);
        assert_eq!(resolution_priority("1920x1080"), 8);
        assert_eq!(resolution_priority("432x240"), 4);
        assert_eq!(resolution_priority("SD"), 1);
        assert_eq!(resolution_priority(""), 0);
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(4_500_000), "5.4 Mbps");
        assert_eq!(format_speed(10_000_000), "12 Mbps");
        assert_eq!(format_speed(1_234_567), "1.5 Mbps");
    }

    #[test]
    fn test_estimate_speed_from_size() {
        assert_eq!(estimate_speed_from_size(9 * GB), "25 Mbps");
        assert_eq!(estimate_speed_from_size(5 * GB), "15 Mbps");
        assert_eq!(estimate_speed_from_size(3 * GB), "10 Mbps");
        assert_eq!(estimate_speed_from_size(1_500 * MB), "8 Mbps");
        assert_eq!(estimate_speed_from_size(700 * MB), "5 Mbps");
        assert_eq!(estimate_speed_from_size(300 * MB), "3 Mbps");
        assert_eq!(estimate_speed_from_size(100 * MB), "2 Mbps");
    }
}
