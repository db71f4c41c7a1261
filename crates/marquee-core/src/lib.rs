//! marquee-core - Core library for Marquee
//!
//! This crate contains the shared models, the debounced search pipeline,
//! the OMDb client, and the persistence layer used by the Marquee CLI.

pub mod api;
pub mod config;
pub mod db;
pub mod debounce;
pub mod error;
pub mod models;
pub mod query;
pub mod search;
pub mod services;
pub mod util;

pub use error::{Error, Result};
pub use models::{FavoriteSet, MediaType, MovieDetails, MovieId, MovieSummary, Poster};
