//! Data models for Marquee

mod favorites;
mod movie;
mod ui_state;

pub use favorites::{FavoriteSet, FavoriteToggle};
pub use movie::{
    MediaType, MovieDetails, MovieId, MovieSummary, Poster, PLACEHOLDER_POSTER_URL, UNAVAILABLE,
};
pub use ui_state::{UiState, LAST_QUERY_KEY};
