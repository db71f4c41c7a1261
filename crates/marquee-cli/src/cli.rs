use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Search movies as you type and keep a list of favorites")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search titles once and print the results
    #[command(alias = "s")]
    Search {
        /// Search query
        query: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the full record for one title
    Details {
        /// IMDb id (e.g. tt0372784)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage favorites
    #[command(alias = "fav")]
    Favorites {
        #[command(subcommand)]
        command: Option<FavoritesCommands>,
    },
    /// Interactive search: each input line replaces the query, results follow as you type
    Live,
    /// Show or update configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum FavoritesCommands {
    /// List favorites in the order they were added
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up a title and add it to favorites
    Add {
        /// IMDb id
        id: String,
    },
    /// Remove a title from favorites
    #[command(alias = "rm")]
    Remove {
        /// IMDb id
        id: String,
    },
    /// Add the title if absent, remove it if present
    Toggle {
        /// IMDb id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Create or update the config file
    Init {
        /// OMDb API key
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,
        /// OMDb base URL
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
        /// Quiet period before a typed query is searched
        #[arg(long, value_name = "MS", allow_negative_numbers = true)]
        debounce_ms: Option<i64>,
        /// Queries of this many characters or fewer are not searched
        #[arg(long, value_name = "N")]
        min_query_len: Option<usize>,
        /// Request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
    },
}
