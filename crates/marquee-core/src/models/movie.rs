//! Movie models

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Sentinel OMDb uses for missing values such as posters.
pub const UNAVAILABLE: &str = "N/A";

/// Image shown in place of a missing poster.
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/200x300?text=No+Image";

static MOVIE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^tt\d+$").expect("Invalid regex"));

/// An IMDb identifier (e.g. `tt0372784`), the unique key of a movie
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MovieId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if MOVIE_ID_PATTERN.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(Error::InvalidInput(format!(
                "'{trimmed}' is not an IMDb id (expected e.g. tt0372784)"
            )))
        }
    }
}

/// Poster reference, or the "unavailable" marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Poster {
    Url(String),
    Unavailable,
}

impl Poster {
    /// URL to display, falling back to a placeholder image.
    #[must_use]
    pub fn display_url(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::Unavailable => PLACEHOLDER_POSTER_URL,
        }
    }
}

impl From<String> for Poster {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == UNAVAILABLE {
            Self::Unavailable
        } else {
            Self::Url(trimmed.to_string())
        }
    }
}

impl From<Poster> for String {
    fn from(poster: Poster) -> Self {
        match poster {
            Poster::Url(url) => url,
            Poster::Unavailable => UNAVAILABLE.to_string(),
        }
    }
}

/// Kind of title returned by the movie database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    Movie,
    Series,
    Episode,
    Game,
    Other(String),
}

impl From<String> for MediaType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "movie" => Self::Movie,
            "series" => Self::Series,
            "episode" => Self::Episode,
            "game" => Self::Game,
            _ => Self::Other(value),
        }
    }
}

impl From<MediaType> for String {
    fn from(media_type: MediaType) -> Self {
        media_type.to_string()
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => f.write_str("movie"),
            Self::Series => f.write_str("series"),
            Self::Episode => f.write_str("episode"),
            Self::Game => f.write_str("game"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

/// A single search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    /// Release year as reported (may be a range such as `2005–2008`)
    pub year: String,
    pub poster: Poster,
    pub media_type: MediaType,
}

/// Full record for one title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: MovieId,
    pub title: String,
    pub year: String,
    pub genre: String,
    pub plot: String,
    pub poster: Poster,
    pub media_type: MediaType,
}

impl From<MovieDetails> for MovieSummary {
    fn from(details: MovieDetails) -> Self {
        Self {
            id: details.id,
            title: details.title,
            year: details.year,
            poster: details.poster,
            media_type: details.media_type,
        }
    }
}
