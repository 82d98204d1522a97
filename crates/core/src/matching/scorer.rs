//! Title similarity scoring of provider candidates.

use serde::Serialize;
use tracing::trace;

use crate::parser::{parse_release_name, ParsedFilename};
use crate::provider::RawCandidate;
use crate::quality::resolve_resolution;

use super::normalize::clean_title;
use super::query::{MediaKind, ShowDescriptor};

/// Title similarity above which a candidate is a strong match.
pub const STRONG_MATCH_THRESHOLD: f64 = 0.5;

/// Filename similarity above which a candidate is a weak match.
pub const WEAK_MATCH_THRESHOLD: f64 = 0.3;

/// A provider candidate with its parsed filename and match scores.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    pub candidate: RawCandidate,
    pub parsed: ParsedFilename,
    /// Best similarity of the parsed title against the targets, in `[0, 1]`.
    pub title_match: f64,
    /// Best similarity of the whole filename against the targets, in `[0, 1]`.
    pub name_match: f64,
    pub strong_match: bool,
    pub weak_match: bool,
    /// Candidate year appended to the title, when years are compared.
    pub title_year: Option<u32>,
    /// Descriptor year appended to the targets, when years are compared.
    pub query_title_year: Option<u32>,
    /// Pre-enrichment resolution label.
    pub resolution: String,
}

impl ScoredCandidate {
    /// Filename similarity rounded to one decimal, used as the last tie-break.
    pub fn fulltext_match(&self) -> f64 {
        (self.name_match * 10.0).round() / 10.0
    }
}

fn similarity(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(a, b).clamp(0.0, 1.0)
}

fn best_match(text: &str, targets: &[String]) -> f64 {
    targets
        .iter()
        .map(|target| similarity(text, target))
        .fold(0.0, f64::max)
}

/// Scores candidates against the titles a descriptor's queries were built from.
#[derive(Debug, Clone)]
pub struct MatchScorer {
    /// Cleaned bare titles, primary first and original last.
    titles: Vec<String>,
    descriptor_year: Option<u32>,
    compare_years: bool,
}

impl MatchScorer {
    pub fn new(descriptor: &ShowDescriptor, queries: &[String]) -> Self {
        let mut titles: Vec<String> = Vec::new();
        for query in queries {
            let title = clean_title(bare_title(query, queries, descriptor));
            if !title.is_empty() && !titles.contains(&title) {
                titles.push(title);
            }
        }

        // A primary query that already carries a year ("Wonder Woman 1984")
        // makes year comparison meaningless.
        let compare_years = descriptor.kind == MediaKind::Movie
            && descriptor.year.is_some()
            && queries
                .first()
                .is_some_and(|q| parse_release_name(q).year.is_none());

        Self {
            titles,
            descriptor_year: descriptor.year,
            compare_years,
        }
    }

    /// Comparison targets: primary, original, secondary, and the
    /// `secondary/original` and `primary/original` combinations.
    pub fn targets(&self, year: Option<u32>) -> Vec<String> {
        let with_year = |title: &String| match year {
            Some(year) => format!("{} {}", title, year),
            None => title.clone(),
        };

        let Some(primary) = self.titles.first().map(with_year) else {
            return Vec::new();
        };
        let original = self.titles.last().map(with_year).unwrap_or_default();
        let secondary = (self.titles.len() > 2)
            .then(|| self.titles.get(1).map(with_year))
            .flatten();

        let mut targets = vec![primary.clone()];
        if original != primary {
            targets.push(original.clone());
        }
        if let Some(secondary) = secondary {
            targets.push(secondary.clone());
            targets.push(format!("{}/{}", secondary, original));
        }
        if original != primary {
            targets.push(format!("{}/{}", primary, original));
        }
        targets
    }

    /// Score one candidate.
    pub fn score(&self, candidate: RawCandidate) -> ScoredCandidate {
        let parsed = parse_release_name(&candidate.name);

        let (title_year, query_title_year) = match (self.compare_years, parsed.year) {
            (true, Some(year)) => (Some(year), self.descriptor_year),
            _ => (None, None),
        };

        let mut cleaned_title = clean_title(&parsed.title);
        if let Some(year) = title_year {
            cleaned_title = format!("{} {}", cleaned_title, year);
        }
        let cleaned_name = clean_title(&candidate.name);

        let targets = self.targets(query_title_year);
        let title_match = best_match(&cleaned_title, &targets);
        let name_match = best_match(&cleaned_name, &targets);

        trace!(
            ident = %candidate.ident,
            title = %cleaned_title,
            title_match,
            name_match,
            "Scored candidate"
        );

        let resolution = resolve_resolution(&candidate.name, candidate.size, None, None);

        ScoredCandidate {
            candidate,
            parsed,
            title_match,
            name_match,
            strong_match: title_match > STRONG_MATCH_THRESHOLD,
            weak_match: name_match > WEAK_MATCH_THRESHOLD,
            title_year,
            query_title_year,
            resolution,
        }
    }
}

/// Strip the query decoration so only the title is compared: the trailing
/// episode token for series, the year for movie year variants.
fn bare_title<'a>(query: &'a str, queries: &[String], descriptor: &ShowDescriptor) -> &'a str {
    let trimmed = query.trim();
    match descriptor.kind {
        MediaKind::Series if descriptor.season_episode().is_some() => trimmed
            .rsplit_once(' ')
            .map(|(title, _)| title)
            .unwrap_or(trimmed),
        MediaKind::Movie => match descriptor.year {
            Some(year) => trimmed
                .strip_suffix(&format!(" {}", year))
                .filter(|title| queries.iter().any(|q| q.trim() == *title))
                .unwrap_or(trimmed),
            None => trimmed,
        },
        MediaKind::Series => trimmed,
    }
}
