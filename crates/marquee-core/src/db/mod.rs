//! Database layer for Marquee

mod connection;
mod favorites_repository;
mod migrations;
mod settings_repository;

pub use connection::Database;
pub use favorites_repository::{FavoritesRepository, SqliteFavoritesRepository};
pub use settings_repository::{SettingsRepository, SqliteSettingsRepository};
