use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

mod channels;
mod config;
mod controllers;
mod db;
mod leetcode;
mod models;
mod scheduler;
mod services;

use channels::BotServices;
use config::Config;
use db::Database;
use leetcode::LeetCodeClient;
use scheduler::{RefreshWorker, RefreshWorkerConfig};
use services::{RankingService, RegistrationService};

pub struct AppState {
    pub ranking: Arc<RankingService>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let Some(bot_token) = config.telegram_bot_token.clone() else {
        log::error!("{} is not set", config::env_vars::TELEGRAM_BOT_TOKEN);
        return Err(std::io::Error::other("missing Telegram bot token"));
    };

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url).map_err(|e| {
        log::error!("Failed to initialize database: {}", e);
        std::io::Error::other(e)
    })?;
    let db = Arc::new(db);

    let fetcher = LeetCodeClient::new(
        config.leetcode_graphql_url.clone(),
        Duration::from_secs(config.leetcode_timeout_secs),
    )
    .map_err(std::io::Error::other)?;
    log::info!(
        "LeetCode: Using {} (timeout {}s)",
        fetcher.endpoint(),
        config.leetcode_timeout_secs
    );

    let registration = Arc::new(RegistrationService::new(Arc::new(fetcher), db.clone()));
    let ranking = Arc::new(RankingService::new(db.clone(), config.leaderboard_size));
    log::info!("Leaderboard shows the top {} users", ranking.size());
    let services = Arc::new(BotServices {
        registration: registration.clone(),
        ranking: ranking.clone(),
    });

    let shutdown = CancellationToken::new();

    // Cancel everything on Ctrl-C
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl-C: {}", e);
                return;
            }
            log::info!("Received Ctrl-C, shutting down");
            shutdown.cancel();
        });
    }

    // Start the refresh worker
    let worker = RefreshWorker::new(
        registration,
        RefreshWorkerConfig {
            interval_secs: config.refresh_interval_secs,
        },
    );
    let worker_handle = tokio::spawn(worker.start(shutdown.clone()));

    // Start the Telegram listener; a failed start stops the whole process
    let telegram_handle = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            let result =
                channels::telegram::start_telegram_listener(bot_token, services, shutdown.clone())
                    .await;
            if let Err(e) = &result {
                log::error!("Telegram listener error: {}", e);
            }
            shutdown.cancel();
            result
        })
    };

    if config.http_port > 0 {
        let port = config.http_port;
        let state = web::Data::new(AppState { ranking });

        log::info!("Starting status API on port {}", port);
        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .wrap(Logger::default())
                .configure(controllers::health::config)
                .configure(controllers::leaderboard::config)
        })
        .disable_signals()
        .bind(("0.0.0.0", port))?
        .run();

        let server_handle = server.handle();
        let server_shutdown = shutdown.clone();
        tokio::spawn(async move {
            server_shutdown.cancelled().await;
            server_handle.stop(true).await;
        });

        server.await?;
        shutdown.cancel();
    } else {
        log::info!("Status API disabled");
        shutdown.cancelled().await;
    }

    if let Err(e) = worker_handle.await {
        log::warn!("Refresh worker task failed: {}", e);
    }

    match telegram_handle.await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(std::io::Error::other(e)),
        Err(e) => Err(std::io::Error::other(e)),
    }
}
