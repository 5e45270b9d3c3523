//! SQLite persistence for registered profiles.
//!
//! Services depend on the [`ProfileStore`] trait rather than on [`Database`]
//! directly, so the store is handed to them at construction.

pub mod sqlite;
pub mod tables;

pub use sqlite::Database;

use crate::models::ProfileRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Keyed collection of profile records
pub trait ProfileStore: Send + Sync {
    /// Point lookup by caller identity
    fn get_profile(&self, caller_id: &str) -> Result<Option<ProfileRecord>, StoreError>;

    /// Lookup by tracked LeetCode username (first match by caller_id)
    fn get_profile_by_username(&self, username: &str) -> Result<Option<ProfileRecord>, StoreError>;

    /// Insert or overwrite the record for `caller_id`
    fn upsert_profile(
        &self,
        caller_id: &str,
        username: &str,
        total_solved: u32,
    ) -> Result<ProfileRecord, StoreError>;

    /// Set the solved count on every record tracking `username` that differs. Returns rows changed.
    fn update_solved_count(&self, username: &str, total_solved: u32) -> Result<usize, StoreError>;

    /// All records, solved count descending
    fn list_profiles_by_solved(&self) -> Result<Vec<ProfileRecord>, StoreError>;

    /// Distinct tracked usernames, ascending
    fn list_tracked_usernames(&self) -> Result<Vec<String>, StoreError>;
}
