//! Shared database service wrapper used across clients.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::{
    Database, FavoritesRepository, SettingsRepository, SqliteFavoritesRepository,
    SqliteSettingsRepository,
};
use crate::models::{FavoriteSet, FavoriteToggle, MovieId, MovieSummary, UiState};
use crate::Result;

/// Thread-safe service for DB and repository operations.
#[derive(Clone)]
pub struct DatabaseService {
    db: Arc<Mutex<Database>>,
    db_path: Option<PathBuf>,
}

impl DatabaseService {
    /// Open a database service at the given filesystem path.
    pub fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&db_path)?;
        tracing::debug!("Database service ready at {}", db_path.display());
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: Some(db_path),
        })
    }

    /// Open an in-memory database service (primarily for tests).
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: None,
        })
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub async fn add_favorite(&self, item: &MovieSummary) -> Result<bool> {
        let db = self.db.lock().await;
        let added = SqliteFavoritesRepository::new(db.connection()).add(item)?;
        if added {
            tracing::info!("Added {} ({}) to favorites", item.title, item.id);
        }
        Ok(added)
    }

    pub async fn remove_favorite(&self, id: &MovieId) -> Result<bool> {
        let db = self.db.lock().await;
        let removed = SqliteFavoritesRepository::new(db.connection()).remove(id)?;
        if removed {
            tracing::info!("Removed {} from favorites", id);
        }
        Ok(removed)
    }

    pub async fn toggle_favorite(&self, item: &MovieSummary) -> Result<FavoriteToggle> {
        let db = self.db.lock().await;
        SqliteFavoritesRepository::new(db.connection()).toggle(item)
    }

    pub async fn is_favorite(&self, id: &MovieId) -> Result<bool> {
        let db = self.db.lock().await;
        SqliteFavoritesRepository::new(db.connection()).contains(id)
    }

    pub async fn list_favorites(&self) -> Result<FavoriteSet> {
        let db = self.db.lock().await;
        SqliteFavoritesRepository::new(db.connection()).list()
    }

    pub async fn load_ui_state(&self) -> Result<UiState> {
        let db = self.db.lock().await;
        SqliteSettingsRepository::new(db.connection()).load()
    }

    /// Query restored into the search input on start.
    pub async fn load_last_query(&self) -> Result<String> {
        Ok(self.load_ui_state().await?.last_query)
    }

    pub async fn save_last_query(&self, query: &str) -> Result<()> {
        let db = self.db.lock().await;
        SqliteSettingsRepository::new(db.connection()).save(&UiState {
            last_query: query.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaType, Poster};
    use tempfile::tempdir;

    fn movie(id: &str, title: &str) -> MovieSummary {
        MovieSummary {
            id: id.parse().unwrap(),
            title: title.to_string(),
            year: "1989".to_string(),
            poster: Poster::Unavailable,
            media_type: MediaType::Movie,
        }
    }

    #[tokio::test]
    async fn favorites_round_trip() {
        let service = DatabaseService::open_in_memory().unwrap();
        let batman = movie("tt0096895", "Batman");

        assert!(service.add_favorite(&batman).await.unwrap());
        assert!(!service.add_favorite(&batman).await.unwrap());
        assert!(service.is_favorite(&batman.id).await.unwrap());
        assert_eq!(service.list_favorites().await.unwrap().len(), 1);

        assert!(service.remove_favorite(&batman.id).await.unwrap());
        assert!(!service.remove_favorite(&batman.id).await.unwrap());
        assert!(service.list_favorites().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn toggle_reports_direction() {
        let service = DatabaseService::open_in_memory().unwrap();
        let batman = movie("tt0096895", "Batman");

        assert_eq!(
            service.toggle_favorite(&batman).await.unwrap(),
            FavoriteToggle::Added
        );
        assert_eq!(
            service.toggle_favorite(&batman).await.unwrap(),
            FavoriteToggle::Removed
        );
    }

    #[tokio::test]
    async fn last_query_survives_reopen() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("data").join("marquee.db");

        {
            let service = DatabaseService::open_path(&path).unwrap();
            assert_eq!(service.load_last_query().await.unwrap(), "");
            service.save_last_query("batman").await.unwrap();
            assert_eq!(service.db_path(), Some(path.as_path()));
        }

        let reopened = DatabaseService::open_path(&path).unwrap();
        assert_eq!(reopened.load_last_query().await.unwrap(), "batman");
    }
}
