//! Settings repository implementation

use crate::error::Result;
use crate::models::{UiState, LAST_QUERY_KEY};
use rusqlite::{params, Connection, OptionalExtension};

/// Trait for persisted UI state
pub trait SettingsRepository {
    /// Load UI state, falling back to defaults for missing keys
    fn load(&self) -> Result<UiState>;

    /// Save UI state
    fn save(&self, state: &UiState) -> Result<()>;

    /// Read one raw value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write one raw value
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// `SQLite` implementation of `SettingsRepository`
pub struct SqliteSettingsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSettingsRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn load(&self) -> Result<UiState> {
        let mut state = UiState::default();

        if let Some(value) = self.get(LAST_QUERY_KEY)? {
            state.last_query = value;
        }

        Ok(state)
    }

    fn save(&self, state: &UiState) -> Result<()> {
        self.set(LAST_QUERY_KEY, &state.last_query)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }
}
