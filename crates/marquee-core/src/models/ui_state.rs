//! Persisted UI state model

use serde::{Deserialize, Serialize};

/// Settings key the last-entered search query is stored under
pub const LAST_QUERY_KEY: &str = "last_query";

/// UI state restored on start and written back on change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    /// Text last typed into the search input
    pub last_query: String,
}
