use serde::{Deserialize, Serialize};

/// Prefix for Telegram caller identities, so other transports can share the table
pub const TELEGRAM_CALLER_PREFIX: &str = "tg:";

/// A registered LeetCode profile, one per caller identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Transport identity of the caller (e.g. "tg:123456")
    pub caller_id: String,
    pub leetcode_username: String,
    /// Last successfully fetched "All" accepted-submission count
    pub total_solved: u32,
    pub created_at: String,
    pub updated_at: String,
}

/// Build the stored caller identity for a Telegram user ID
pub fn telegram_caller_id(user_id: impl std::fmt::Display) -> String {
    format!("{}{}", TELEGRAM_CALLER_PREFIX, user_id)
}
