//! Services shared by Marquee front ends.

mod database;

pub use database::DatabaseService;
