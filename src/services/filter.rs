//! Query classification and catalog filtering
//!
//! A user message is first classified. Only recommendation requests reach the
//! filter pipeline, which runs a fixed sequence of stages over the catalog:
//! genre, then year range, then rating, then title-mention reordering. Every
//! stage narrows or reorders the candidate set and never re-expands it.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::models::Movie;

/// What the user is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Facts about a specific movie (plot, director, cast)
    Informational,
    /// Too short or unspecific to filter on, or small talk
    Vague,
    /// A request for suggestions
    Recommendation,
}

/// Minimum rating kept when the message asks for highly rated movies
pub const HIGH_RATING_THRESHOLD: f32 = 4.5;

static INFORMATIONAL_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)what\s+is\s+(?:the\s+)?movie\s+[^?]*\?*$",
        r"(?i)tell\s+me\s+about\s+(?:the\s+)?movie\s*[^?]*\?*$",
        r"(?i)what\s+is\s+(?:the\s+)?(?:\w+\s+)?movie\s+(?:\w+\s+)*(?:plot|story|about|summary)\?*$",
        r"(?i)movie\s+(?:info|information|details|summary)\s*\?*$",
        r"(?i)what\s+(?:is|was)\s+(?:the\s+)?(?:plot|story)\s+of\s+(?:the\s+)?movie",
        r"(?i)who\s+(?:directed|wrote|stars?|acted)\s+(?:in\s+)?(?:the\s+)?movie",
    ])
    .expect("informational patterns are valid")
});

static MORE_RECOMMENDATIONS_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)more\s+(?:like|similar)",
        r"(?i)like\s+that",
        r"(?i)similar\s+to",
        r"(?i)recommend",
        r"(?i)more\s+movie",
        r"(?i)another\s+(?:movie|one)",
        r"(?i)other\s+movie",
    ])
    .expect("recommendation patterns are valid")
});

static VAGUE_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)^\s*(?:what|who|where|when|why|how)(?:\s+\w+)?\s*\??\s*$",
        r"(?i)just\s+(?:a\s+)?movie",
        r"(?i)any\s+movie",
        r"(?i)movie\s*$",
        r"(?i)^paradise$",
    ])
    .expect("vague patterns are valid")
});

/// Genre keywords as they may appear in a message, with the catalog genre each one selects
const GENRE_KEYWORDS: &[(&str, &str)] = &[
    ("action", "action"),
    ("comedy", "comedy"),
    ("drama", "drama"),
    ("horror", "horror"),
    ("sci-fi", "sci-fi"),
    ("science fiction", "sci-fi"),
    ("romance", "romance"),
    ("thriller", "thriller"),
    ("adventure", "adventure"),
];

const HIGH_RATING_PHRASES: &[&str] = &["highly rated", "best", "top rated", "excellent", "amazing"];

/// Inclusive release-year window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: u16,
    pub max: u16,
}

impl YearRange {
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, year: u16) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

static DECADE_PATTERNS: LazyLock<Vec<(Regex, YearRange)>> = LazyLock::new(|| {
    [
        (r"\b199[0-9]\b|\b90s\b", YearRange::new(1990, 1999)),
        (r"\b200[0-9]\b|\b2000s\b", YearRange::new(2000, 2009)),
        (r"\b201[0-9]\b|\b2010s\b", YearRange::new(2010, 2019)),
        (r"\b202[0-9]\b|\b2020s\b", YearRange::new(2020, 2029)),
    ]
    .into_iter()
    .map(|(pattern, range)| (Regex::new(pattern).expect("decade pattern is valid"), range))
    .collect()
});

const RECENT_RANGE: YearRange = YearRange::new(2015, 2029);
const CLASSIC_RANGE: YearRange = YearRange::new(1970, 1999);

/// Classifies a message, checking informational before vague
pub fn classify(message: &str) -> QueryKind {
    let wants_more = MORE_RECOMMENDATIONS_PATTERNS.is_match(message);

    if INFORMATIONAL_PATTERNS.is_match(message) && !wants_more {
        QueryKind::Informational
    } else if VAGUE_PATTERNS.is_match(message) {
        QueryKind::Vague
    } else {
        QueryKind::Recommendation
    }
}

/// Outcome of classifying and filtering one message
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    pub kind: QueryKind,
    /// Relevant movies, best matches first
    pub movies: Vec<&'a Movie>,
}

/// Classifies `message` and, for recommendation requests, filters the catalog
///
/// Informational and vague messages yield no movies so the caller can answer
/// conversationally. An empty result after filtering is returned as is.
pub fn select_movies<'a>(message: &str, catalog: &'a [Movie]) -> Selection<'a> {
    let kind = classify(message);
    if kind != QueryKind::Recommendation {
        return Selection {
            kind,
            movies: Vec::new(),
        };
    }

    let lower = message.to_lowercase();
    let candidates: Vec<&Movie> = catalog.iter().collect();

    let candidates = filter_by_genre(&lower, candidates);
    let candidates = filter_by_year(&lower, candidates);
    let candidates = filter_by_rating(&lower, candidates);
    let candidates = prioritize_title_mentions(&lower, candidates);

    tracing::debug!(
        count = candidates.len(),
        titles = %candidates.iter().map(|m| m.title.as_str()).collect::<Vec<_>>().join(", "),
        "Relevant movies found"
    );

    Selection {
        kind,
        movies: candidates,
    }
}

/// Returns the catalog entries relevant to `message`, best matches first
pub fn filter_movies<'a>(message: &str, catalog: &'a [Movie]) -> Vec<&'a Movie> {
    select_movies(message, catalog).movies
}

/// Catalog genres named in a lowercased message
pub fn requested_genres(lower: &str) -> Vec<&'static str> {
    let mut genres: Vec<&'static str> = Vec::new();
    for (keyword, genre) in GENRE_KEYWORDS {
        if lower.contains(keyword) && !genres.contains(genre) {
            genres.push(*genre);
        }
    }
    genres
}

/// Year window requested by a lowercased message; explicit decades win over "recent", which wins over "old"/"classic"
pub fn requested_year_range(lower: &str) -> Option<YearRange> {
    DECADE_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(lower))
        .map(|(_, range)| *range)
        .or_else(|| {
            if lower.contains("recent") {
                Some(RECENT_RANGE)
            } else if lower.contains("old") || lower.contains("classic") {
                Some(CLASSIC_RANGE)
            } else {
                None
            }
        })
}

pub fn wants_high_rating(lower: &str) -> bool {
    HIGH_RATING_PHRASES
        .iter()
        .any(|phrase| lower.contains(phrase))
}

fn filter_by_genre<'a>(lower: &str, movies: Vec<&'a Movie>) -> Vec<&'a Movie> {
    let genres = requested_genres(lower);
    if genres.is_empty() {
        return movies;
    }
    movies
        .into_iter()
        .filter(|movie| movie.has_any_genre(genres.as_slice()))
        .collect()
}

fn filter_by_year<'a>(lower: &str, movies: Vec<&'a Movie>) -> Vec<&'a Movie> {
    match requested_year_range(lower) {
        Some(range) => movies
            .into_iter()
            .filter(|movie| range.contains(movie.year))
            .collect(),
        None => movies,
    }
}

fn filter_by_rating<'a>(lower: &str, movies: Vec<&'a Movie>) -> Vec<&'a Movie> {
    if !wants_high_rating(lower) {
        return movies;
    }
    movies
        .into_iter()
        .filter(|movie| movie.rating >= HIGH_RATING_THRESHOLD)
        .collect()
}

/// Moves movies whose title appears in the message to the front, keeping relative order
fn prioritize_title_mentions<'a>(lower: &str, movies: Vec<&'a Movie>) -> Vec<&'a Movie> {
    let (mut mentioned, rest): (Vec<&Movie>, Vec<&Movie>) = movies
        .into_iter()
        .partition(|movie| lower.contains(&movie.title.to_lowercase()));
    mentioned.extend(rest);
    mentioned
}
