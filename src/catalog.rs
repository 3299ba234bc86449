use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context};

use crate::models::Movie;

const BUILTIN_CATALOG: &str = include_str!("../data/movies.json");

/// Read-only movie catalog
///
/// Loaded once at startup and shared by reference between requests. Nothing
/// mutates it after construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    /// Creates a catalog from records, rejecting duplicate ids
    pub fn new(movies: Vec<Movie>) -> anyhow::Result<Self> {
        let mut seen = HashSet::new();
        for movie in &movies {
            if !seen.insert(movie.id) {
                bail!("Duplicate movie id {} ({})", movie.id, movie.title);
            }
        }
        Ok(Self { movies })
    }

    /// Parses a JSON array of movie records
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let movies: Vec<Movie> =
            serde_json::from_str(json).context("Failed to parse movie catalog")?;
        Self::new(movies)
    }

    /// Loads the catalog from a JSON file on disk
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        Self::from_json(&json)
    }

    /// The dataset compiled into the binary
    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Uses `path` when given, the built-in dataset otherwise
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    /// All movies in catalog order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.id == id)
    }

    /// Movies listing `genre` exactly as written
    pub fn by_genre(&self, genre: &str) -> Vec<&Movie> {
        self.movies
            .iter()
            .filter(|movie| movie.genre.iter().any(|g| g == genre))
            .collect()
    }

    /// Distinct genres in first-seen order
    pub fn genres(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.movies
            .iter()
            .flat_map(|movie| movie.genre.iter())
            .map(String::as_str)
            .filter(|genre| seen.insert(*genre))
            .collect()
    }
}
