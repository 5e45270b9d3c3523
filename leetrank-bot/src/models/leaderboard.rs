use serde::Serialize;

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position in the full ordering
    pub rank: usize,
    pub leetcode_username: String,
    pub total_solved: u32,
    #[serde(skip_serializing)]
    pub caller_id: String,
}

/// Top entries plus the caller's position in the full population
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    pub caller_rank: Option<usize>,
    pub total_users: usize,
}

impl Leaderboard {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            caller_rank: None,
            total_users: 0,
        }
    }

    /// No users are registered at all
    pub fn is_empty(&self) -> bool {
        self.total_users == 0
    }
}
