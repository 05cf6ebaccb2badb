//! Storage layer for the football dataset
//!
//! This module wraps the SQLite database, organized into:
//! - `models`: Identity keys, row types and insert/lookup outcomes
//! - `schema`: Database connection and schema management
//! - `queries`: Lookups, inserts and read-back queries

pub mod models;
pub mod queries;
pub mod schema;


// Re-export the main types and database struct for easy access
pub use models::*;
pub use schema::MatchDatabase;
