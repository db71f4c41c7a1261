//! Interactive search session.
//!
//! Every plain input line replaces the contents of the search box; lines
//! starting with `:` are session commands. Results are printed whenever the
//! search state changes.

use std::path::Path;
use std::sync::Arc;

use marquee_core::api::MovieSearch;
use marquee_core::models::FavoriteToggle;
use marquee_core::query::{is_searchable, QueryState};
use marquee_core::search::{LiveSearch, LiveSearchOptions};
use marquee_core::services::DatabaseService;
use marquee_core::FavoriteSet;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use crate::commands::common::{
    build_client, format_movie_lines, format_state_lines, load_config, open_database,
};
use crate::error::CliError;

pub const LIVE_HELP: &str = "\
Type to search; each line replaces the query.
  :fav N   toggle result N as a favorite
  :favs    list favorites
  :go      search now without waiting
  :q       quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveInput {
    Query(String),
    ToggleFavorite(usize),
    ListFavorites,
    SearchNow,
    Help,
    Quit,
}

pub fn parse_live_input(line: &str) -> LiveInput {
    let Some(command) = line.trim().strip_prefix(':') else {
        return LiveInput::Query(line.to_string());
    };

    let mut words = command.split_whitespace();
    match (words.next(), words.next()) {
        (Some("q" | "quit"), None) => LiveInput::Quit,
        (Some("favs"), None) => LiveInput::ListFavorites,
        (Some("go"), None) => LiveInput::SearchNow,
        (Some("fav" | "f"), Some(number)) => match number.parse::<usize>() {
            Ok(number) if number > 0 => LiveInput::ToggleFavorite(number),
            _ => LiveInput::Help,
        },
        _ => LiveInput::Help,
    }
}

pub struct LiveSession {
    db: DatabaseService,
    live: LiveSearch,
    favorites: FavoriteSet,
    min_query_len: usize,
}

impl LiveSession {
    /// Restore the last query and favorites, then start searching.
    pub async fn start<S: MovieSearch>(
        searcher: Arc<S>,
        db: DatabaseService,
        options: LiveSearchOptions,
    ) -> Result<Self, CliError> {
        let last_query = db.load_last_query().await?;
        let favorites = db.list_favorites().await?;
        if !last_query.is_empty() {
            tracing::debug!("restoring last query {:?}", last_query);
        }

        Ok(Self {
            db,
            live: LiveSearch::start(searcher, options, last_query),
            favorites,
            min_query_len: options.min_query_len,
        })
    }

    pub fn query(&self) -> &str {
        self.live.query()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.live.subscribe()
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn render(&self, state: &QueryState) -> Vec<String> {
        format_state_lines(state, &self.favorites, self.min_query_len)
    }

    /// Apply one input line. Returns the lines to print.
    pub async fn handle(&mut self, input: LiveInput) -> Result<Vec<String>, CliError> {
        match input {
            LiveInput::Query(text) => {
                self.live.input(text.clone());
                self.db.save_last_query(&text).await?;
                Ok(Vec::new())
            }
            LiveInput::ToggleFavorite(number) => {
                let toggle = self.toggle_result(number).await?;
                let mut lines = vec![match toggle {
                    FavoriteToggle::Added => format!("Added result #{number} to favorites"),
                    FavoriteToggle::Removed => format!("Removed result #{number} from favorites"),
                }];
                lines.extend(self.render(&self.live.state()));
                Ok(lines)
            }
            LiveInput::ListFavorites => {
                if self.favorites.is_empty() {
                    Ok(vec!["No favorites yet".to_string()])
                } else {
                    Ok(format_movie_lines(self.favorites.list(), &self.favorites))
                }
            }
            LiveInput::SearchNow => {
                self.live.flush();
                Ok(Vec::new())
            }
            LiveInput::Help | LiveInput::Quit => {
                Ok(LIVE_HELP.lines().map(str::to_string).collect())
            }
        }
    }

    /// Toggle the `number`th (1-based) result currently displayed.
    pub async fn toggle_result(&mut self, number: usize) -> Result<FavoriteToggle, CliError> {
        let movie = match self.live.state() {
            QueryState::Success { movies, .. } => number
                .checked_sub(1)
                .and_then(|index| movies.get(index).cloned()),
            _ => None,
        }
        .ok_or(CliError::NoSuchResult(number))?;

        let toggle = self.db.toggle_favorite(&movie).await?;
        match toggle {
            FavoriteToggle::Added => {
                self.favorites.add(movie);
            }
            FavoriteToggle::Removed => {
                self.favorites.remove(&movie.id);
            }
        }
        Ok(toggle)
    }

    /// Search the current input immediately and wait until its result is in.
    pub async fn settle(&mut self) -> Result<QueryState, CliError> {
        self.live.flush();
        let expected = self.live.query().trim().to_string();
        let min_query_len = self.min_query_len;
        let mut states = self.live.subscribe();

        let state = states
            .wait_for(|state| match state {
                QueryState::Idle => !is_searchable(&expected, min_query_len),
                QueryState::Loading { .. } => false,
                QueryState::Success { query, .. } | QueryState::Failed { query, .. } => {
                    *query == expected
                }
            })
            .await
            .map_err(|_| CliError::SearchInterrupted)?
            .clone();
        Ok(state)
    }
}

pub async fn run_live(db_path: &Path, config_path: &Path) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let client = Arc::new(build_client(&config)?);
    let db = open_database(db_path)?;

    let mut session = LiveSession::start(client, db, LiveSearchOptions::from(&config)).await?;
    let mut states = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{LIVE_HELP}");
    if !session.query().is_empty() {
        println!("> {}", session.query());
    }

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // Input closed: finish whatever was typed last before exiting.
                    let state = session.settle().await?;
                    print_lines(&session.render(&state));
                    return Ok(());
                };

                match parse_live_input(&line) {
                    LiveInput::Quit => return Ok(()),
                    input => match session.handle(input).await {
                        Ok(output) => print_lines(&output),
                        Err(error @ CliError::NoSuchResult(_)) => eprintln!("{error}"),
                        Err(error) => return Err(error),
                    },
                }
            }
            changed = states.changed() => {
                if changed.is_err() {
                    return Err(CliError::SearchInterrupted);
                }
                let state = states.borrow_and_update().clone();
                print_lines(&session.render(&state));
            }
        }
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
