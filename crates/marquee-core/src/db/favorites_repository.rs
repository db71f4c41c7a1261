//! Favorites repository implementation

use crate::error::Result;
use crate::models::{FavoriteSet, FavoriteToggle, MovieId, MovieSummary};
use crate::util::unix_timestamp_millis_now;
use rusqlite::{params, Connection};

/// Trait for favorite storage operations
pub trait FavoritesRepository {
    /// Add a title; returns `false` if it was already a favorite
    fn add(&self, item: &MovieSummary) -> Result<bool>;

    /// Remove a title; returns `false` if it was not a favorite
    fn remove(&self, id: &MovieId) -> Result<bool>;

    /// Check whether a title is a favorite
    fn contains(&self, id: &MovieId) -> Result<bool>;

    /// All favorites, oldest first
    fn list(&self) -> Result<FavoriteSet>;

    /// Add when absent, remove when present
    fn toggle(&self, item: &MovieSummary) -> Result<FavoriteToggle> {
        if self.remove(&item.id)? {
            Ok(FavoriteToggle::Removed)
        } else {
            self.add(item)?;
            Ok(FavoriteToggle::Added)
        }
    }
}

/// `SQLite` implementation of `FavoritesRepository`
pub struct SqliteFavoritesRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteFavoritesRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_favorite(row: &rusqlite::Row<'_>) -> rusqlite::Result<MovieSummary> {
        let id: String = row.get(0)?;
        let poster: String = row.get(3)?;
        let media_type: String = row.get(4)?;
        Ok(MovieSummary {
            id: id.parse().map_err(|error: crate::Error| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(error),
                )
            })?,
            title: row.get(1)?,
            year: row.get(2)?,
            poster: poster.into(),
            media_type: media_type.into(),
        })
    }
}

impl FavoritesRepository for SqliteFavoritesRepository<'_> {
    fn add(&self, item: &MovieSummary) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO favorites (id, title, year, poster, media_type, added_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                item.id.as_str(),
                item.title,
                item.year,
                String::from(item.poster.clone()),
                item.media_type.to_string(),
                unix_timestamp_millis_now()
            ],
        )?;
        Ok(inserted > 0)
    }

    fn remove(&self, id: &MovieId) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM favorites WHERE id = ?", params![id.as_str()])?;
        Ok(removed > 0)
    }

    fn contains(&self, id: &MovieId) -> Result<bool> {
        let exists: i32 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE id = ?)",
            params![id.as_str()],
            |row| row.get(0),
        )?;
        Ok(exists != 0)
    }

    fn list(&self) -> Result<FavoriteSet> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, year, poster, media_type
             FROM favorites
             ORDER BY rowid ASC",
        )?;

        let favorites = stmt
            .query_map([], Self::parse_favorite)?
            .collect::<rusqlite::Result<FavoriteSet>>()?;

        Ok(favorites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{MediaType, Poster};
    use pretty_assertions::assert_eq;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn movie(id: &str, title: &str) -> MovieSummary {
        MovieSummary {
            id: id.parse().unwrap(),
            title: title.to_string(),
            year: "2008".to_string(),
            poster: Poster::Url(format!("https://img.example.com/{id}.jpg")),
            media_type: MediaType::Movie,
        }
    }

    #[test]
    fn test_add_same_id_twice_keeps_one_row() {
        let db = setup();
        let repo = SqliteFavoritesRepository::new(db.connection());

        assert!(repo.add(&movie("tt0468569", "The Dark Knight")).unwrap());
        assert!(!repo.add(&movie("tt0468569", "The Dark Knight")).unwrap());

        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let db = setup();
        let repo = SqliteFavoritesRepository::new(db.connection());
        repo.add(&movie("tt0468569", "The Dark Knight")).unwrap();

        assert!(!repo.remove(&"tt0000001".parse().unwrap()).unwrap());
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn test_list_preserves_insertion_order_and_fields() {
        let db = setup();
        let repo = SqliteFavoritesRepository::new(db.connection());

        let series = MovieSummary {
            poster: Poster::Unavailable,
            media_type: MediaType::Series,
            ..movie("tt0103359", "Batman: The Animated Series")
        };
        repo.add(&movie("tt0468569", "The Dark Knight")).unwrap();
        repo.add(&series).unwrap();
        repo.add(&movie("tt0372784", "Batman Begins")).unwrap();

        let favorites = repo.list().unwrap();
        let titles = favorites
            .list()
            .iter()
            .map(|item| item.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            titles,
            vec![
                "The Dark Knight",
                "Batman: The Animated Series",
                "Batman Begins"
            ]
        );
        assert_eq!(favorites.list()[1], series);
    }

    #[test]
    fn test_contains_and_toggle() {
        let db = setup();
        let repo = SqliteFavoritesRepository::new(db.connection());
        let knight = movie("tt0468569", "The Dark Knight");

        assert!(!repo.contains(&knight.id).unwrap());
        assert_eq!(repo.toggle(&knight).unwrap(), FavoriteToggle::Added);
        assert!(repo.contains(&knight.id).unwrap());
        assert_eq!(repo.toggle(&knight).unwrap(), FavoriteToggle::Removed);
        assert!(!repo.contains(&knight.id).unwrap());
    }
}
