pub mod leaderboard;
pub mod profile;

pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use profile::{telegram_caller_id, ProfileRecord};
