use serde::{Deserialize, Serialize};

/// A single catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: u32,
    pub title: String,
    pub year: u16,
    /// Average rating on a 0-5 scale
    pub rating: f32,
    /// Genres in display order
    pub genre: Vec<String>,
    pub poster: String,
    pub description: String,
}

impl Movie {
    /// Whether any of this movie's genres equals one of `genres` (case-insensitive)
    pub fn has_any_genre<S: AsRef<str>>(&self, genres: &[S]) -> bool {
        self.genre.iter().any(|own| {
            genres
                .iter()
                .any(|wanted| own.eq_ignore_ascii_case(wanted.as_ref()))
        })
    }

    /// One-line summary used when enumerating candidates for the model
    pub fn summary_line(&self) -> String {
        format!(
            "{} ({}, {}, {}★): {}",
            self.title,
            self.year,
            self.genre.join("/"),
            self.rating,
            self.description
        )
    }
}
