pub mod common;
pub mod completions;
pub mod config;
pub mod details;
pub mod favorites;
pub mod live;
pub mod search;
