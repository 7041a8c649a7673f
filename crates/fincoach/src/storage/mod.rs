//! Relational persistence for the finance repositories.

pub mod sqlite;

pub use sqlite::SqliteStore;
