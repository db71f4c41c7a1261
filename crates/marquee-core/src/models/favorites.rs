//! Favorites model

use serde::{Deserialize, Serialize};

use super::{MovieId, MovieSummary};

/// Outcome of toggling a favorite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    Added,
    Removed,
}

/// Insertion-ordered collection of favorite titles, unique by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet {
    items: Vec<MovieSummary>,
}

impl FavoriteSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a title; returns `false` when the id is already present.
    pub fn add(&mut self, item: MovieSummary) -> bool {
        if self.contains(&item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove a title by id; removing an absent id is a no-op returning `false`.
    pub fn remove(&mut self, id: &MovieId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    pub fn toggle(&mut self, item: MovieSummary) -> FavoriteToggle {
        if self.remove(&item.id) {
            FavoriteToggle::Removed
        } else {
            self.items.push(item);
            FavoriteToggle::Added
        }
    }

    pub fn contains(&self, id: &MovieId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    pub fn get(&self, id: &MovieId) -> Option<&MovieSummary> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Favorites in the order they were added
    pub fn list(&self) -> &[MovieSummary] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<MovieSummary> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = MovieSummary>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.add(item);
        }
        set
    }
}

impl IntoIterator for FavoriteSet {
    type Item = MovieSummary;
    type IntoIter = std::vec::IntoIter<MovieSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
