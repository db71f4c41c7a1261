use std::path::Path;
use std::sync::Arc;

use marquee_core::api::MovieSearch;
use marquee_core::query::{QueryGate, QueryState};
use marquee_core::MovieSummary;

use crate::commands::common::{
    build_client, format_movie_lines, load_config, movie_to_list_item, open_database,
    resolve_search_query, MovieListItem,
};
use crate::error::CliError;

pub async fn run_search(
    query_parts: &[String],
    as_json: bool,
    db_path: &Path,
    config_path: &Path,
) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let query = resolve_search_query(query_parts, config.min_query_len)?;
    let client = Arc::new(build_client(&config)?);
    let db = open_database(db_path)?;

    db.save_last_query(&query).await?;
    let movies = search_once(client, &query, config.min_query_len).await?;
    let favorites = db.list_favorites().await?;

    if as_json {
        let json_items = movies
            .iter()
            .map(|movie| movie_to_list_item(movie, &favorites))
            .collect::<Vec<MovieListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if movies.is_empty() {
        println!("No movies found");
    } else {
        for line in format_movie_lines(&movies, &favorites) {
            println!("{line}");
        }
    }

    Ok(())
}

/// Run `query` through a [`QueryGate`] and wait for it to settle.
pub async fn search_once<S: MovieSearch>(
    searcher: Arc<S>,
    query: &str,
    min_query_len: usize,
) -> Result<Vec<MovieSummary>, CliError> {
    let mut gate = QueryGate::new(searcher, min_query_len);
    let mut states = gate.subscribe();
    gate.submit(query);

    let settled = states
        .wait_for(|state| !state.is_loading())
        .await
        .map_err(|_| CliError::SearchInterrupted)?
        .clone();

    match settled {
        QueryState::Success { movies, .. } => Ok(movies),
        QueryState::Failed { message, .. } => Err(CliError::SearchFailed(message)),
        QueryState::Idle | QueryState::Loading { .. } => {
            Err(CliError::QueryTooShort(min_query_len + 1))
        }
    }
}
