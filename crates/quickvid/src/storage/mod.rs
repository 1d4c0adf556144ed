//! SQLite pool, schema migrations and the feedback store

pub mod db;
pub mod feedback;
pub mod migrations;

// Re-exports for convenience
pub use db::{create_pool, get_connection, DbConnection, DbPool};
pub use feedback::{FeedbackRecord, FeedbackStore, SqliteFeedbackStore};
