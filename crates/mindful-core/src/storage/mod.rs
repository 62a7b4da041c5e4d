//! Storage Module
//!
//! SQLite-based storage layer with:
//! - Idempotent entity upsert keyed by (profile, type, name)
//! - Recency-ordered node/edge reads and grouped counts
//! - Append-only extraction and crisis audit logs
//! - Streak profile persistence with lazy read-side decay

mod migrations;
mod sqlite;

pub use migrations::MIGRATIONS;
pub use sqlite::{GraphStore, Result, StoreError};
