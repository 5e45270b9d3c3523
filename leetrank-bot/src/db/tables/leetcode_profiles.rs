//! Database operations for the leetcode_profiles table

use chrono::Utc;
use rusqlite::Result as SqliteResult;

use super::super::{Database, ProfileStore, StoreError};
use crate::models::ProfileRecord;

const PROFILE_COLUMNS: &str =
    "caller_id, leetcode_username, total_solved, created_at, updated_at";

fn row_to_profile(row: &rusqlite::Row) -> SqliteResult<ProfileRecord> {
    Ok(ProfileRecord {
        caller_id: row.get(0)?,
        leetcode_username: row.get(1)?,
        total_solved: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

impl Database {
    /// Get the profile registered by a caller
    pub fn get_leetcode_profile(&self, caller_id: &str) -> SqliteResult<Option<ProfileRecord>> {
        let conn = self.conn();
        let result = conn.query_row(
            &format!("SELECT {} FROM leetcode_profiles WHERE caller_id = ?1", PROFILE_COLUMNS),
            [caller_id],
            row_to_profile,
        );
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get a profile tracking the given LeetCode username.
    /// Several callers may track the same username; the lowest caller_id wins.
    pub fn get_leetcode_profile_by_username(
        &self,
        username: &str,
    ) -> SqliteResult<Option<ProfileRecord>> {
        let conn = self.conn();
        let result = conn.query_row(
            &format!(
                "SELECT {} FROM leetcode_profiles WHERE leetcode_username = ?1
                 ORDER BY caller_id ASC LIMIT 1",
                PROFILE_COLUMNS
            ),
            [username],
            row_to_profile,
        );
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Insert or replace the tracked username and count for a caller
    pub fn upsert_leetcode_profile(
        &self,
        caller_id: &str,
        username: &str,
        total_solved: u32,
    ) -> SqliteResult<ProfileRecord> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO leetcode_profiles (caller_id, leetcode_username, total_solved, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(caller_id) DO UPDATE SET
                leetcode_username = excluded.leetcode_username,
                total_solved = excluded.total_solved,
                updated_at = excluded.updated_at",
            rusqlite::params![caller_id, username, total_solved, now],
        )?;

        conn.query_row(
            &format!("SELECT {} FROM leetcode_profiles WHERE caller_id = ?1", PROFILE_COLUMNS),
            [caller_id],
            row_to_profile,
        )
    }

    /// Update the solved count for every caller tracking `username`.
    /// Rows already at `total_solved` are left untouched and not counted.
    pub fn update_leetcode_solved_count(
        &self,
        username: &str,
        total_solved: u32,
    ) -> SqliteResult<usize> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "UPDATE leetcode_profiles SET total_solved = ?1, updated_at = ?2
             WHERE leetcode_username = ?3 AND total_solved != ?1",
            rusqlite::params![total_solved, now, username],
        )
    }

    /// List all profiles, highest solved count first
    pub fn list_leetcode_profiles_by_solved(&self) -> SqliteResult<Vec<ProfileRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM leetcode_profiles
             ORDER BY total_solved DESC, leetcode_username ASC, caller_id ASC",
            PROFILE_COLUMNS
        ))?;
        let profiles = stmt
            .query_map([], row_to_profile)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(profiles)
    }

    /// Distinct usernames currently tracked by at least one caller
    pub fn list_tracked_leetcode_usernames(&self) -> SqliteResult<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT leetcode_username FROM leetcode_profiles ORDER BY leetcode_username ASC",
        )?;
        let usernames = stmt
            .query_map([], |row| row.get(0))?
            .collect::<SqliteResult<Vec<String>>>()?;
        Ok(usernames)
    }
}

impl ProfileStore for Database {
    fn get_profile(&self, caller_id: &str) -> Result<Option<ProfileRecord>, StoreError> {
        Ok(self.get_leetcode_profile(caller_id)?)
    }

    fn get_profile_by_username(&self, username: &str) -> Result<Option<ProfileRecord>, StoreError> {
        Ok(self.get_leetcode_profile_by_username(username)?)
    }

    fn upsert_profile(
        &self,
        caller_id: &str,
        username: &str,
        total_solved: u32,
    ) -> Result<ProfileRecord, StoreError> {
        Ok(self.upsert_leetcode_profile(caller_id, username, total_solved)?)
    }

    fn update_solved_count(&self, username: &str, total_solved: u32) -> Result<usize, StoreError> {
        Ok(self.update_leetcode_solved_count(username, total_solved)?)
    }

    fn list_profiles_by_solved(&self) -> Result<Vec<ProfileRecord>, StoreError> {
        Ok(self.list_leetcode_profiles_by_solved()?)
    }

    fn list_tracked_usernames(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.list_tracked_leetcode_usernames()?)
    }
}
