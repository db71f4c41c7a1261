use std::env;
use std::path::{Path, PathBuf};

use marquee_core::api::OmdbClient;
use marquee_core::config::AppConfig;
use marquee_core::query::{is_searchable, QueryState};
use marquee_core::services::DatabaseService;
use marquee_core::{FavoriteSet, MovieDetails, MovieId, MovieSummary};
use serde::Serialize;

use crate::error::CliError;

pub const ENV_DB_PATH: &str = "MARQUEE_DB_PATH";
pub const ENV_CONFIG_PATH: &str = "MARQUEE_CONFIG_PATH";

const FAVORITE_MARKER: &str = "★";

#[derive(Debug, Serialize)]
pub struct MovieListItem {
    pub id: String,
    pub title: String,
    pub year: String,
    pub media_type: String,
    pub poster: String,
    pub favorite: bool,
}

pub fn movie_to_list_item(movie: &MovieSummary, favorites: &FavoriteSet) -> MovieListItem {
    MovieListItem {
        id: movie.id.to_string(),
        title: movie.title.clone(),
        year: movie.year.clone(),
        media_type: movie.media_type.to_string(),
        poster: movie.poster.display_url().to_string(),
        favorite: favorites.contains(&movie.id),
    }
}

/// One line per movie, numbered from 1 so live-mode commands can refer back to it.
pub fn format_movie_lines(movies: &[MovieSummary], favorites: &FavoriteSet) -> Vec<String> {
    let width = movies.len().to_string().len();
    movies
        .iter()
        .enumerate()
        .map(|(index, movie)| {
            let marker = if favorites.contains(&movie.id) {
                FAVORITE_MARKER
            } else {
                " "
            };
            format!(
                "{number:>width$}. {marker} {title} ({year}) [{kind}]  {id}",
                number = index + 1,
                title = movie.title,
                year = movie.year,
                kind = movie.media_type,
                id = movie.id,
            )
        })
        .collect()
}

pub fn format_details_lines(details: &MovieDetails, is_favorite: bool) -> Vec<String> {
    let heading = if is_favorite {
        format!("{} ({}) {FAVORITE_MARKER}", details.title, details.year)
    } else {
        format!("{} ({})", details.title, details.year)
    };

    vec![
        heading,
        format!("Id:     {}", details.id),
        format!("Type:   {}", details.media_type),
        format!("Genre:  {}", details.genre),
        format!("Poster: {}", details.poster.display_url()),
        String::new(),
        details.plot.clone(),
    ]
}

/// What to print for a search state.
pub fn format_state_lines(
    state: &QueryState,
    favorites: &FavoriteSet,
    min_query_len: usize,
) -> Vec<String> {
    match state {
        QueryState::Idle => vec![format!(
            "Type at least {} characters to search",
            min_query_len + 1
        )],
        QueryState::Loading { query } => vec![format!("Searching \"{query}\"...")],
        QueryState::Success { movies, .. } if movies.is_empty() => {
            vec!["No movies found".to_string()]
        }
        QueryState::Success { movies, .. } => format_movie_lines(movies, favorites),
        QueryState::Failed { message, .. } => vec![message.clone()],
    }
}

pub fn normalize_search_query(query: &str) -> Result<String, CliError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptySearchQuery)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Join the positional words of a search command into one query.
pub fn resolve_search_query(parts: &[String], min_query_len: usize) -> Result<String, CliError> {
    let query = normalize_search_query(&parts.join(" "))?;
    if is_searchable(&query, min_query_len) {
        Ok(query)
    } else {
        Err(CliError::QueryTooShort(min_query_len + 1))
    }
}

pub fn parse_movie_id(id: &str) -> Result<MovieId, CliError> {
    Ok(id.parse::<MovieId>()?)
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os(ENV_DB_PATH).map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("marquee")
        .join("marquee.db")
}

pub fn resolve_config_path(cli_config_path: Option<PathBuf>) -> PathBuf {
    cli_config_path
        .or_else(|| env::var_os(ENV_CONFIG_PATH).map(PathBuf::from))
        .unwrap_or_else(default_config_path)
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("marquee")
        .join("config.json")
}

/// File config with environment overrides applied.
pub fn load_config(path: &Path) -> Result<AppConfig, CliError> {
    let config = AppConfig::load_from_path(path)
        .map_err(|error| CliError::Config(format!("{}: {error}", path.display())))?;
    Ok(config.with_env_overrides())
}

pub fn build_client(config: &AppConfig) -> Result<OmdbClient, CliError> {
    let omdb = config.omdb()?;
    Ok(OmdbClient::new(&omdb)?)
}

pub fn open_database(path: &Path) -> Result<DatabaseService, CliError> {
    Ok(DatabaseService::open_path(path)?)
}
