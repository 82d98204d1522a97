//! Accent- and punctuation-insensitive text folding for title comparison.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Words that mark subtitle releases and carry no title information.
const NOISE_WORDS: &[&str] = &["subtitles", "titulky"];

/// Trim, lower-case and strip diacritics.
///
/// `"Pelíšky"` becomes `"pelisky"`.
pub fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Normalize a title for similarity scoring.
///
/// Drops the subtitle noise words, turns every character that is neither a
/// letter nor a digit (in any script) into a space and collapses runs of
/// whitespace before normalizing.
pub fn clean_title(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_noise = NOISE_WORDS
        .iter()
        .fold(lowered, |acc, word| acc.replace(word, " "));

    let spaced: String = without_noise
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    normalize(&spaced.split_whitespace().collect::<Vec<_>>().join(" "))
}
