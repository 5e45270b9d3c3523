use crate::channels::commands::{self, BotServices};
use crate::models::telegram_caller_id;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio_util::sync::CancellationToken;

/// Telegram rejects messages longer than this
const TELEGRAM_MAX_MESSAGE_LEN: usize = 4096;

/// Trim a reply to Telegram's length limit. Cuts at the last line break that
/// fits so HTML tags are never split; a single oversized line falls back to a
/// char boundary.
fn truncate_for_telegram(text: &str) -> String {
    if text.len() <= TELEGRAM_MAX_MESSAGE_LEN {
        return text.to_string();
    }
    let mut end = TELEGRAM_MAX_MESSAGE_LEN - 3;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let end = text[..end].rfind('\n').unwrap_or(end);
    format!("{}...", &text[..end])
}

/// Start a Telegram bot listener. Runs until `shutdown` is cancelled or the
/// dispatcher stops on its own.
pub async fn start_telegram_listener(
    bot_token: String,
    services: Arc<BotServices>,
    shutdown: CancellationToken,
) -> Result<(), String> {
    log::info!("Starting Telegram listener");
    log::info!("Telegram: Token length = {}", bot_token.len());

    let bot = Bot::new(&bot_token);

    // Validate token and get bot info for command targeting
    log::info!("Telegram: Validating bot token...");
    let me = match bot.get_me().await {
        Ok(me) => {
            log::info!(
                "Telegram: Bot validated - username: @{}, id: {}",
                me.username(),
                me.id
            );
            me
        }
        Err(e) => {
            let error = format!("Invalid Telegram bot token: {}", e);
            log::error!("Telegram: {}", error);
            return Err(error);
        }
    };

    let bot_username = me.username().to_string();
    let bot_user_id = me.id;

    let handler = Update::filter_message().endpoint(
        move |bot: Bot, msg: teloxide::types::Message, services: Arc<BotServices>| {
            let bot_username = bot_username.clone();
            async move {
                let Some(text) = msg.text() else {
                    return Ok(());
                };
                let Some(user) = msg.from() else {
                    log::debug!("Telegram: Ignoring message without sender in chat {}", msg.chat.id);
                    return Ok(());
                };
                if user.id == bot_user_id {
                    return Ok(());
                }

                let Some(command) = commands::parse_command(text, Some(&bot_username)) else {
                    log::debug!("Telegram: Ignoring non-command message in chat {}", msg.chat.id);
                    return Ok(());
                };

                let caller_id = telegram_caller_id(user.id);
                log::info!(
                    "Telegram: {:?} from {} ({}) in chat {}",
                    command,
                    user.username.as_deref().unwrap_or(&user.first_name),
                    caller_id,
                    msg.chat.id
                );

                let reply = commands::handle_command(&services, &caller_id, command).await;

                if let Err(e) = bot
                    .send_message(msg.chat.id, truncate_for_telegram(&reply))
                    .parse_mode(ParseMode::Html)
                    .reply_to_message_id(msg.id)
                    .await
                {
                    log::error!("Telegram: Failed to send reply: {}", e);
                }

                Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
            }
        },
    );

    let mut tg_dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![services])
        .build();

    // Run with shutdown signal
    tokio::select! {
        _ = shutdown.cancelled() => {
            log::info!("Telegram listener received shutdown signal");
        }
        _ = tg_dispatcher.dispatch() => {
            log::info!("Telegram listener stopped");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_message_untouched() {
        assert_eq!(truncate_for_telegram("hello"), "hello");
    }

    #[test]
    fn test_truncate_keeps_html_lines_whole() {
        let line = "123. <b>some_long_leetcode_name</b> → 1000 ✅\n";
        let long = line.repeat(200);
        let out = truncate_for_telegram(&long);
        assert!(out.len() <= TELEGRAM_MAX_MESSAGE_LEN);
        assert!(out.ends_with("✅..."));
        assert_eq!(out.matches("<b>").count(), out.matches("</b>").count());
    }

    #[test]
    fn test_truncate_long_message_on_char_boundary() {
        let long = "✅".repeat(2000);
        let out = truncate_for_telegram(&long);
        assert!(out.len() <= TELEGRAM_MAX_MESSAGE_LEN);
        assert!(out.ends_with("..."));
    }
}
