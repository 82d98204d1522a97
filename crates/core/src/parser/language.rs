//! Language tag detection in free-text filenames.
//!
//! Detection is an ordered cascade of strategies. The first four return as
//! soon as they match; the positional strategy unions every match it finds.
//! All matching happens on an upper-cased copy of the filename.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::VIDEO_EXTENSIONS;

/// Spelling variants mapped to canonical codes.
const LANGUAGE_VARIANTS: &[(&str, &str)] = &[
    ("CZECH", "CZ"),
    ("CZ", "CZ"),
    ("CZE", "CZ"),
    ("CS", "CZ"),
    ("CES", "CZ"),
    ("ČEŠTINA", "CZ"),
    ("ČESKY", "CZ"),
    ("CZDAB", "CZ"),
    ("ENGLISH", "EN"),
    ("EN", "EN"),
    ("ENG", "EN"),
    ("SLOVAK", "SK"),
    ("SK", "SK"),
    ("SLO", "SK"),
    ("SLK", "SK"),
    ("SLOVENČINA", "SK"),
    ("SKDAB", "SK"),
];

const SUBTITLE_KEYWORDS: &[&str] = &["TITULKY", "SUBS", "SUB", "TIT"];
const AUDIO_KEYWORDS: &[&str] = &["DABING", "AUDIO", "DUB"];

/// Boundary before a token: start of string or a non-alphanumeric char.
///
/// Non-ASCII chars never count as boundaries here; `prepare` has already
/// turned the non-alphanumeric ones into spaces.
const LEAD: &str = "(?:^|[^A-Z0-9\u{80}-\u{10FFFF}])";
/// Boundary after a token.
const TRAIL: &str = "(?:[^A-Z0-9\u{80}-\u{10FFFF}]|$)";

/// Map a single upper-cased token to its canonical code.
pub fn canonical_code(token: &str) -> Option<&'static str> {
    LANGUAGE_VARIANTS
        .iter()
        .find(|(variant, _)| *variant == token)
        .map(|(_, code)| *code)
}

/// Alternation of variants, longest first so longer spellings win.
static CODES: Lazy<String> = Lazy::new(|| {
    let mut variants: Vec<&str> = LANGUAGE_VARIANTS.iter().map(|(v, _)| *v).collect();
    variants.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    variants.join("|")
});

static KEYWORDS: Lazy<String> = Lazy::new(|| {
    let mut keywords: Vec<&str> = SUBTITLE_KEYWORDS
        .iter()
        .chain(AUDIO_KEYWORDS)
        .copied()
        .collect();
    keywords.sort_by(|a, b| b.len().cmp(&a.len()));
    keywords.join("|")
});

fn compile(pattern: String) -> Regex {
    Regex::new(&pattern).expect("language pattern")
}

static COMMA_PAIR: Lazy<Regex> = Lazy::new(|| {
    compile(format!(
        "{LEAD}({codes}),({codes}){TRAIL}",
        codes = CODES.as_str()
    ))
});

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| {
    compile(format!(
        r"{LEAD}({codes})\s+({codes})(?:\s+({codes}))?{TRAIL}",
        codes = CODES.as_str()
    ))
});

static KEYWORD_ADJACENT: Lazy<Regex> = Lazy::new(|| {
    compile(format!(
        r"{LEAD}(?:({kw})[\s_.]+({codes})|({codes})[\s_.]+({kw})){TRAIL}",
        codes = CODES.as_str(),
        kw = KEYWORDS.as_str()
    ))
});

static KEYWORD_CONCATENATED: Lazy<Regex> = Lazy::new(|| {
    compile(format!(
        r"{LEAD}(?:({codes})({kw})|({kw})({codes})){TRAIL}",
        codes = CODES.as_str(),
        kw = KEYWORDS.as_str()
    ))
});

/// Positional patterns, all applied; group 1 holds one or more codes.
static POSITIONAL: Lazy<Vec<Regex>> = Lazy::new(|| {
    let codes = CODES.as_str();
    let extensions = VIDEO_EXTENSIONS.join("|");
    vec![
        // codes right before the container extension: ".CZ.EN.mkv"
        compile(format!(
            r"{LEAD}((?:{codes})(?:\.(?:{codes}))*)\.(?:{extensions})$"
        )),
        // bracketed: "[CZ]", "(CZ,EN)", "[EN/SK]"
        compile(format!(
            r"[\[(]((?:{codes})(?:[\s,._/\-]+(?:{codes}))*)[\])]"
        )),
        // delimited runs: ".CZ.", "-CZ-EN_", " SK" at the end
        compile(format!(
            r"(?:^|[\[(.\s_\-])((?:{codes})(?:[._\-](?:{codes}))*)(?:[.)\]\-_\s]|$)"
        )),
        // "DUAL-CZ", "MULTI.EN"
        compile(format!(r"(?:DUAL|MULTI)[\-.\s]({codes}){TRAIL}")),
    ]
});

/// Outcome of one strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LanguageMatch {
    codes: BTreeSet<&'static str>,
    subtitles: bool,
}

impl LanguageMatch {
    fn audio(codes: BTreeSet<&'static str>) -> Option<Self> {
        (!codes.is_empty()).then_some(Self {
            codes,
            subtitles: false,
        })
    }

    fn render(&self) -> String {
        let joined = self.codes.iter().copied().collect::<Vec<_>>().join("|");
        if self.subtitles {
            format!("{} titulky", joined)
        } else {
            joined
        }
    }
}

type StrategyFn = fn(&str) -> Option<LanguageMatch>;

/// The cascade, in the order it is tried.
const STRATEGIES: &[(&str, StrategyFn)] = &[
    ("comma_pair", comma_pair),
    ("whitespace_run", whitespace_run),
    ("keyword_adjacent", keyword_adjacent),
    ("keyword_concatenated", keyword_concatenated),
    ("positional", positional),
];

fn codes_in(text: &str) -> BTreeSet<&'static str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter_map(canonical_code)
        .collect()
}

fn comma_pair(upper: &str) -> Option<LanguageMatch> {
    let caps = COMMA_PAIR.captures(upper)?;
    LanguageMatch::audio(codes_in(caps.get(0)?.as_str()))
}

fn whitespace_run(upper: &str) -> Option<LanguageMatch> {
    let caps = WHITESPACE_RUN.captures(upper)?;
    LanguageMatch::audio(codes_in(caps.get(0)?.as_str()))
}

fn tagged(code: &str, keyword: &str) -> Option<LanguageMatch> {
    let code = canonical_code(code)?;
    Some(LanguageMatch {
        codes: BTreeSet::from([code]),
        subtitles: !AUDIO_KEYWORDS.contains(&keyword),
    })
}

fn keyword_adjacent(upper: &str) -> Option<LanguageMatch> {
    let caps = KEYWORD_ADJACENT.captures(upper)?;
    match (caps.get(1), caps.get(2)) {
        (Some(kw), Some(code)) => tagged(code.as_str(), kw.as_str()),
        _ => tagged(caps.get(3)?.as_str(), caps.get(4)?.as_str()),
    }
}

fn keyword_concatenated(upper: &str) -> Option<LanguageMatch> {
    let caps = KEYWORD_CONCATENATED.captures(upper)?;
    match (caps.get(1), caps.get(2)) {
        (Some(code), Some(kw)) => tagged(code.as_str(), kw.as_str()),
        _ => tagged(caps.get(4)?.as_str(), caps.get(3)?.as_str()),
    }
}

fn positional(upper: &str) -> Option<LanguageMatch> {
    let codes: BTreeSet<&'static str> = POSITIONAL
        .iter()
        .flat_map(|regex| regex.captures_iter(upper))
        .filter_map(|caps| caps.get(1))
        .flat_map(|m| codes_in(m.as_str()))
        .collect();
    LanguageMatch::audio(codes)
}

/// Upper-cased copy in which the only non-ASCII chars left are letters and
/// digits, so a diacritic inside a word never acts as a token boundary.
fn prepare(filename: &str) -> String {
    filename
        .to_uppercase()
        .chars()
        .map(|c| {
            if c.is_ascii() || c.is_alphanumeric() {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// Detect the language tag of a filename.
///
/// Returns canonical codes sorted and joined with `|` (`"CZ|EN"`), a single
/// code with a ` titulky` suffix when the filename marks subtitles
/// (`"CZ titulky"`), or `None` when nothing matches.
pub fn extract_language(filename: &str) -> Option<String> {
    if filename.is_empty() {
        return None;
    }
    let upper = prepare(filename);
    STRATEGIES
        .iter()
        .find_map(|(_, strategy)| strategy(&upper))
        .map(|found| found.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang(name: &str) -> Option<String> {
        extract_language(name)
    }

    #[test]
    fn test_strategy_order() {
        let order: Vec<&str> = STRATEGIES.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            order,
            vec![
                "comma_pair",
                "whitespace_run",
                "keyword_adjacent",
                "keyword_concatenated",
                "positional"
            ]
        );
    }

    #[test]
    fn test_canonical_code() {
        assert_eq!(canonical_code("CZE"), Some("CZ"));
        assert_eq!(canonical_code("ČESKY"), Some("CZ"));
        assert_eq!(canonical_code("SLO"), Some("SK"));
        assert_eq!(canonical_code("ENGLISH"), Some("EN"));
        assert_eq!(canonical_code("DE"), None);
    }

    #[test]
    fn test_two_codes_sorted_regardless_of_order() {
        assert_eq!(lang("Movie.CZ.EN.mkv").as_deref(), Some("CZ|EN"));
        assert_eq!(lang("Movie.EN.CZ.mkv").as_deref(), Some("CZ|EN"));
        assert_eq!(
            lang("The.LongTrain.1999.1080p.BluRay.x264-[YTS.AG].EN.CZ.mkv").as_deref(),
            Some("CZ|EN")
        );
    }

    #[test]
    fn test_no_language() {
        assert_eq!(lang("The.LongTrain.1999.1080p.BluRay.x264-[YTS.AG].mkv"), None);
        assert_eq!(lang("Encanto.2021.mkv"), None);
        assert_eq!(lang(""), None);
    }

    #[test]
    fn test_codes_inside_words_are_ignored() {
        assert_eq!(lang("Physics.Lesson.mkv"), None);
        assert_eq!(lang("Skyfall.2012.mkv"), None);
        assert_eq!(lang("Endgame.mkv"), None);
    }

    #[test]
    fn test_codes_after_diacritics_are_ignored() {
        assert_eq!(lang("Pověšen.avi"), None);
        assert_eq!(lang("Šen.mkv"), None);
        assert_eq!(lang("Kočka CZ.avi").as_deref(), Some("CZ"));
    }

    #[test]
    fn test_non_ascii_punctuation_separates() {
        assert_eq!(lang("Film – CZ.mkv").as_deref(), Some("CZ"));
        assert_eq!(lang("Film «EN».avi").as_deref(), Some("EN"));
    }

    #[test]
    fn test_comma_pair() {
        assert_eq!(lang("Film (2020) cz,en.avi").as_deref(), Some("CZ|EN"));
        assert_eq!(lang("Film SK,CZ 1080p").as_deref(), Some("CZ|SK"));
    }

    #[test]
    fn test_whitespace_run() {
        assert_eq!(lang("Pelisky CZ SK EN 1080p").as_deref(), Some("CZ|EN|SK"));
        assert_eq!(lang("Film eng cze").as_deref(), Some("CZ|EN"));
    }

    #[test]
    fn test_keyword_subtitles() {
        assert_eq!(lang("Film 2019 CZ titulky.mkv").as_deref(), Some("CZ titulky"));
        assert_eq!(lang("Film.2019.sub.EN.mkv").as_deref(), Some("EN titulky"));
        assert_eq!(lang("Film tit CZ").as_deref(), Some("CZ titulky"));
    }

    #[test]
    fn test_keyword_audio() {
        assert_eq!(lang("Film 2019 CZ dabing.avi").as_deref(), Some("CZ"));
        assert_eq!(lang("Film dabing EN").as_deref(), Some("EN"));
        assert_eq!(lang("Film_audio_SK.mkv").as_deref(), Some("SK"));
    }

    #[test]
    fn test_keyword_concatenated() {
        assert_eq!(lang("Film.2019.CZsub.mkv").as_deref(), Some("CZ titulky"));
        assert_eq!(lang("Film.2019.ENdub.mkv").as_deref(), Some("EN"));
    }

    #[test]
    fn test_positional_brackets_and_prefixes() {
        assert_eq!(lang("Film [CZ] 1080p.mkv").as_deref(), Some("CZ"));
        assert_eq!(lang("Film (EN/SK).avi").as_deref(), Some("EN|SK"));
        assert_eq!(lang("Film.DUAL-CZ.1080p").as_deref(), Some("CZ"));
        assert_eq!(lang("Film.MULTI.ENG.mkv").as_deref(), Some("EN"));
        assert_eq!(lang("Film-CZ-EN_1080p").as_deref(), Some("CZ|EN"));
    }

    #[test]
    fn test_positional_unions_separate_matches() {
        assert_eq!(lang("Film.CZ.1080p.[EN].mkv").as_deref(), Some("CZ|EN"));
    }

    #[test]
    fn test_localized_spellings() {
        assert_eq!(lang("Pelíšky (1999) Česky.avi").as_deref(), Some("CZ"));
        assert_eq!(lang("Film.slovenčina.mkv").as_deref(), Some("SK"));
        assert_eq!(lang("Film.CZDAB.avi").as_deref(), Some("CZ"));
    }
}
