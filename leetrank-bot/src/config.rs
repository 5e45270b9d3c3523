use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const LEETCODE_GRAPHQL_URL: &str = "LEETCODE_GRAPHQL_URL";
    pub const LEETCODE_TIMEOUT_SECS: &str = "LEETCODE_TIMEOUT_SECS";
    pub const LEADERBOARD_SIZE: &str = "LEETRANK_LEADERBOARD_SIZE";
    // Periodic refresh of all tracked profiles (0 = disabled)
    pub const REFRESH_INTERVAL_SECS: &str = "LEETRANK_REFRESH_INTERVAL_SECS";
    // Status API port (0 = disabled)
    pub const HTTP_PORT: &str = "LEETRANK_HTTP_PORT";
}

/// Default values
pub mod defaults {
    pub const DATABASE_URL: &str = "./.db/leetrank.db";
    pub const LEETCODE_GRAPHQL_URL: &str = crate::leetcode::DEFAULT_GRAPHQL_URL;
    pub const LEETCODE_TIMEOUT_SECS: u64 = 10;
    pub const LEADERBOARD_SIZE: usize = crate::services::DEFAULT_LEADERBOARD_SIZE;
    pub const REFRESH_INTERVAL_SECS: u64 = 0;
    pub const HTTP_PORT: u16 = 8080;
}

/// Parse `key` from `lookup`, falling back to `default` when unset or malformed
fn parse_or_default<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            log::warn!("Invalid {} value {:?}: {}, using default {}", key, raw, e, default);
            default
        }),
        None => default,
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: Option<String>,
    pub database_url: String,
    pub leetcode_graphql_url: String,
    pub leetcode_timeout_secs: u64,
    pub leaderboard_size: usize,
    pub refresh_interval_secs: u64,
    pub http_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            telegram_bot_token: non_empty(env_vars::TELEGRAM_BOT_TOKEN),
            database_url: non_empty(env_vars::DATABASE_URL)
                .unwrap_or_else(|| defaults::DATABASE_URL.to_string()),
            leetcode_graphql_url: non_empty(env_vars::LEETCODE_GRAPHQL_URL)
                .unwrap_or_else(|| defaults::LEETCODE_GRAPHQL_URL.to_string()),
            // A zero timeout would fail every fetch
            leetcode_timeout_secs: parse_or_default(
                &lookup,
                env_vars::LEETCODE_TIMEOUT_SECS,
                defaults::LEETCODE_TIMEOUT_SECS,
            )
            .max(1),
            leaderboard_size: parse_or_default(
                &lookup,
                env_vars::LEADERBOARD_SIZE,
                defaults::LEADERBOARD_SIZE,
            ),
            refresh_interval_secs: parse_or_default(
                &lookup,
                env_vars::REFRESH_INTERVAL_SECS,
                defaults::REFRESH_INTERVAL_SECS,
            ),
            http_port: parse_or_default(&lookup, env_vars::HTTP_PORT, defaults::HTTP_PORT),
        }
    }
}
