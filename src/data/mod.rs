//! Data layer module
//!
//! Handles all data persistence:
//! - SQLite todo collection (per-user)
//! - SQLite bearer-token cache

mod database;
mod models;

pub use database::Database;
pub use models::*;
