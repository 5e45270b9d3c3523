//! Leaderboard computation over the full profile population.

use std::sync::Arc;

use crate::db::{ProfileStore, StoreError};
use crate::models::{Leaderboard, LeaderboardEntry, ProfileRecord};

pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Total order: solved count descending, then username, then caller_id ascending.
pub fn rank_profiles(profiles: &mut [ProfileRecord]) {
    profiles.sort_by(|a, b| {
        b.total_solved
            .cmp(&a.total_solved)
            .then_with(|| a.leetcode_username.cmp(&b.leetcode_username))
            .then_with(|| a.caller_id.cmp(&b.caller_id))
    });
}

/// Build a leaderboard from an already ranked population
pub fn build_leaderboard(ranked: &[ProfileRecord], caller_id: &str, size: usize) -> Leaderboard {
    let entries = ranked
        .iter()
        .take(size)
        .enumerate()
        .map(|(idx, p)| LeaderboardEntry {
            rank: idx + 1,
            leetcode_username: p.leetcode_username.clone(),
            total_solved: p.total_solved,
            caller_id: p.caller_id.clone(),
        })
        .collect();

    let caller_rank = ranked
        .iter()
        .position(|p| p.caller_id == caller_id)
        .map(|idx| idx + 1);

    Leaderboard {
        entries,
        caller_rank,
        total_users: ranked.len(),
    }
}

pub struct RankingService {
    store: Arc<dyn ProfileStore>,
    size: usize,
}

impl RankingService {
    pub fn new(store: Arc<dyn ProfileStore>, size: usize) -> Self {
        Self {
            store,
            size: size.max(1),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Top entries plus the caller's 1-based rank in the full ordering
    pub fn leaderboard(&self, caller_id: &str) -> Result<Leaderboard, StoreError> {
        let mut profiles = self.store.list_profiles_by_solved()?;
        if profiles.is_empty() {
            return Ok(Leaderboard::empty());
        }
        rank_profiles(&mut profiles);
        Ok(build_leaderboard(&profiles, caller_id, self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn seeded(rows: &[(&str, &str, u32)]) -> Arc<Database> {
        let db = Arc::new(Database::new(":memory:").expect("in-memory db"));
        for (caller, name, solved) in rows {
            db.upsert_leetcode_profile(caller, name, *solved).unwrap();
        }
        db
    }

    fn profile(caller: &str, name: &str, solved: u32) -> ProfileRecord {
        ProfileRecord {
            caller_id: caller.to_string(),
            leetcode_username: name.to_string(),
            total_solved: solved,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_example_population() {
        let db = seeded(&[("tg:a", "alice", 50), ("tg:b", "bob", 80), ("tg:c", "carol", 80)]);
        let board = RankingService::new(db, DEFAULT_LEADERBOARD_SIZE)
            .leaderboard("tg:a")
            .unwrap();

        let rows: Vec<(&str, u32)> = board
            .entries
            .iter()
            .map(|e| (e.leetcode_username.as_str(), e.total_solved))
            .collect();
        assert_eq!(rows, vec![("bob", 80), ("carol", 80), ("alice", 50)]);
        assert_eq!(board.caller_rank, Some(3));
        assert_eq!(board.total_users, 3);
    }

    #[test]
    fn test_empty_population() {
        let board = RankingService::new(seeded(&[]), DEFAULT_LEADERBOARD_SIZE)
            .leaderboard("tg:a")
            .unwrap();
        assert!(board.is_empty());
        assert!(board.entries.is_empty());
        assert_eq!(board.caller_rank, None);
        assert_eq!(board.total_users, 0);
    }

    #[test]
    fn test_caller_rank_outside_top_entries() {
        let rows: Vec<(String, String, u32)> = (0..15)
            .map(|i| (format!("tg:{}", i), format!("user{:02}", i), 100 - i as u32))
            .collect();
        let refs: Vec<(&str, &str, u32)> =
            rows.iter().map(|(c, n, s)| (c.as_str(), n.as_str(), *s)).collect();
        let db = seeded(&refs);

        let board = RankingService::new(db, 10).leaderboard("tg:13").unwrap();
        assert_eq!(board.entries.len(), 10);
        assert_eq!(board.entries[0].leetcode_username, "user00");
        assert_eq!(board.entries[9].rank, 10);
        assert_eq!(board.caller_rank, Some(14));
        assert_eq!(board.total_users, 15);
    }

    #[test]
    fn test_unregistered_caller_has_no_rank() {
        let db = seeded(&[("tg:a", "alice", 5)]);
        let board = RankingService::new(db, 10).leaderboard("tg:nobody").unwrap();
        assert_eq!(board.caller_rank, None);
        assert_eq!(board.total_users, 1);
        assert_eq!(board.entries.len(), 1);
    }

    #[test]
    fn test_rank_profiles_is_total_order() {
        let mut profiles = vec![
            profile("tg:2", "same", 10),
            profile("tg:9", "zoe", 99),
            profile("tg:1", "same", 10),
            profile("tg:3", "abe", 10),
        ];
        rank_profiles(&mut profiles);
        let callers: Vec<&str> = profiles.iter().map(|p| p.caller_id.as_str()).collect();
        assert_eq!(callers, vec!["tg:9", "tg:3", "tg:1", "tg:2"]);

        for pair in profiles.windows(2) {
            assert!(pair[0].total_solved >= pair[1].total_solved);
        }
    }

    #[test]
    fn test_size_is_at_least_one() {
        let db = seeded(&[("tg:a", "alice", 5), ("tg:b", "bob", 4)]);
        let svc = RankingService::new(db, 0);
        assert_eq!(svc.size(), 1);
        assert_eq!(svc.leaderboard("tg:b").unwrap().entries.len(), 1);
    }
}
