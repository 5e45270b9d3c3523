pub mod commands;
pub mod telegram;

pub use commands::BotServices;
