pub mod ranking;
pub mod registration;

pub use ranking::{RankingService, DEFAULT_LEADERBOARD_SIZE};
pub use registration::{RegistrationError, RegistrationService};
