//! Chat command parsing and replies.
//!
//! Kept free of teloxide types so the full command surface can be tested
//! against an in-memory database and a scripted fetcher.

use std::sync::Arc;
use teloxide::utils::html;

use crate::models::Leaderboard;
use crate::services::{RankingService, RegistrationError, RegistrationService};

pub const REGISTER_USAGE: &str = "⚠️ Usage: /register <leetcode_username>";
pub const SEARCH_USAGE: &str = "⚠️ Usage: /search <leetcode_username>";
pub const NO_USERS: &str = "No users registered yet.";
const INTERNAL_ERROR: &str = "Sorry, something went wrong. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Register(Option<String>),
    Leaderboard,
    Search(Option<String>),
    Help,
}

/// Services the command handlers need, shared across updates
pub struct BotServices {
    pub registration: Arc<RegistrationService>,
    pub ranking: Arc<RankingService>,
}

/// Parse a `/command [arg]` message. Commands addressed to another bot
/// (`/cmd@otherbot`) and plain text return None.
pub fn parse_command(text: &str, bot_username: Option<&str>) -> Option<BotCommand> {
    let mut parts = text.split_whitespace();
    let head = parts.next()?.strip_prefix('/')?;

    let (name, target) = match head.split_once('@') {
        Some((name, target)) => (name, Some(target)),
        None => (head, None),
    };
    if let (Some(target), Some(me)) = (target, bot_username) {
        if !target.eq_ignore_ascii_case(me) {
            return None;
        }
    }

    let arg = parts.next().map(|s| s.to_string());
    match name.to_lowercase().as_str() {
        "register" => Some(BotCommand::Register(arg)),
        "leaderboard" | "rank" => Some(BotCommand::Leaderboard),
        "search" => Some(BotCommand::Search(arg)),
        "help" | "start" => Some(BotCommand::Help),
        _ => None,
    }
}

pub fn help_text() -> String {
    "🤖 <b>LeetCode Leaderboard Bot</b>\n\n\
    /register &lt;leetcode_username&gt; - Track your LeetCode profile\n\
    /leaderboard - Show the top registered users and your rank\n\
    /search &lt;leetcode_username&gt; - Refresh and show a registered user's count\n\
    /help - Show this message"
        .to_string()
}

/// Render a leaderboard reply (HTML parse mode)
pub fn format_leaderboard(board: &Leaderboard) -> String {
    if board.is_empty() {
        return NO_USERS.to_string();
    }

    let mut message = String::from("🏆 <b>LeetCode Leaderboard</b> 🏆\n\n");
    for entry in &board.entries {
        message.push_str(&format!(
            "{}. <b>{}</b> → {} ✅\n",
            entry.rank,
            html::escape(&entry.leetcode_username),
            entry.total_solved
        ));
    }
    if let Some(rank) = board.caller_rank {
        message.push_str(&format!("\n🔎 Your Rank: {}/{}", rank, board.total_users));
    }
    message
}

/// Run a parsed command for `caller_id` and produce the reply text
pub async fn handle_command(services: &BotServices, caller_id: &str, command: BotCommand) -> String {
    match command {
        BotCommand::Help => help_text(),
        BotCommand::Register(None) => REGISTER_USAGE.to_string(),
        BotCommand::Search(None) => SEARCH_USAGE.to_string(),
        BotCommand::Register(Some(username)) => {
            match services.registration.register(caller_id, &username).await {
                Ok(reg) => format!(
                    "✅ Registered <b>{}</b> with {} problems solved!",
                    html::escape(&reg.username),
                    reg.total_solved
                ),
                Err(RegistrationError::MissingUsername) => REGISTER_USAGE.to_string(),
                Err(RegistrationError::NotFound(e)) => {
                    log::info!("Register {} as {} rejected: {}", caller_id, username, e);
                    "❌ Invalid username or error fetching data.".to_string()
                }
                Err(e) => {
                    log::error!("Register {} as {} failed: {}", caller_id, username, e);
                    INTERNAL_ERROR.to_string()
                }
            }
        }
        BotCommand::Search(Some(username)) => match services.registration.refresh(&username).await {
            Ok(refresh) if refresh.changed => format!(
                "🔄 Updated stats for <b>{}</b>: {} problems solved! ✅",
                html::escape(&refresh.username),
                refresh.total_solved
            ),
            Ok(refresh) => format!(
                "📊 <b>{}</b>: {} problems solved! ✅",
                html::escape(&refresh.username),
                refresh.total_solved
            ),
            Err(RegistrationError::NotRegistered) => format!(
                "❌ User <b>{}</b> not found in the database.",
                html::escape(&username)
            ),
            Err(RegistrationError::MissingUsername) => SEARCH_USAGE.to_string(),
            Err(e) => {
                log::error!("Search for {} failed: {}", username, e);
                INTERNAL_ERROR.to_string()
            }
        },
        BotCommand::Leaderboard => match services.ranking.leaderboard(caller_id) {
            Ok(board) => format_leaderboard(&board),
            Err(e) => {
                log::error!("Leaderboard for {} failed: {}", caller_id, e);
                INTERNAL_ERROR.to_string()
            }
        },
    }
}
