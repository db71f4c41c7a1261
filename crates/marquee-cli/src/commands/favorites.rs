use std::path::Path;

use marquee_core::api::MovieSearch;
use marquee_core::models::FavoriteToggle;
use marquee_core::services::DatabaseService;
use marquee_core::{MovieId, MovieSummary};

use crate::cli::FavoritesCommands;
use crate::commands::common::{
    build_client, format_movie_lines, load_config, movie_to_list_item, open_database,
    parse_movie_id, MovieListItem,
};
use crate::error::CliError;

pub async fn run_favorites(
    command: Option<FavoritesCommands>,
    db_path: &Path,
    config_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path)?;

    match command.unwrap_or(FavoritesCommands::List { json: false }) {
        FavoritesCommands::List { json } => run_list(&db, json).await,
        FavoritesCommands::Add { id } => {
            let movie_id = parse_movie_id(&id)?;
            let client = build_client(&load_config(config_path)?)?;
            let (movie, added) = add_favorite(&client, &db, &movie_id).await?;
            if added {
                println!("Added {} ({}) to favorites", movie.title, movie.year);
            } else {
                println!("{} ({}) is already a favorite", movie.title, movie.year);
            }
            Ok(())
        }
        FavoritesCommands::Remove { id } => {
            let movie_id = parse_movie_id(&id)?;
            if db.remove_favorite(&movie_id).await? {
                println!("Removed {movie_id} from favorites");
            } else {
                println!("{movie_id} is not a favorite");
            }
            Ok(())
        }
        FavoritesCommands::Toggle { id } => {
            let movie_id = parse_movie_id(&id)?;
            let client = build_client(&load_config(config_path)?)?;
            match toggle_favorite(&client, &db, &movie_id).await? {
                FavoriteToggle::Added => println!("Added {movie_id} to favorites"),
                FavoriteToggle::Removed => println!("Removed {movie_id} from favorites"),
            }
            Ok(())
        }
    }
}

async fn run_list(db: &DatabaseService, as_json: bool) -> Result<(), CliError> {
    let favorites = db.list_favorites().await?;

    if as_json {
        let json_items = favorites
            .list()
            .iter()
            .map(|movie| movie_to_list_item(movie, &favorites))
            .collect::<Vec<MovieListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if favorites.is_empty() {
        println!("No favorites yet");
    } else {
        for line in format_movie_lines(favorites.list(), &favorites) {
            println!("{line}");
        }
    }

    Ok(())
}

/// Look `id` up and store it as a favorite. Returns the stored summary and
/// whether it was newly added.
pub async fn add_favorite<S: MovieSearch>(
    searcher: &S,
    db: &DatabaseService,
    id: &MovieId,
) -> Result<(MovieSummary, bool), CliError> {
    if let Some(existing) = db.list_favorites().await?.get(id) {
        return Ok((existing.clone(), false));
    }

    let movie = MovieSummary::from(searcher.details(id).await?);
    let added = db.add_favorite(&movie).await?;
    Ok((movie, added))
}

/// Remove `id` when it is a favorite; otherwise look it up and add it.
pub async fn toggle_favorite<S: MovieSearch>(
    searcher: &S,
    db: &DatabaseService,
    id: &MovieId,
) -> Result<FavoriteToggle, CliError> {
    if db.remove_favorite(id).await? {
        return Ok(FavoriteToggle::Removed);
    }

    add_favorite(searcher, db, id).await?;
    Ok(FavoriteToggle::Added)
}
