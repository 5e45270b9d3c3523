use crate::services::RegistrationService;
use std::sync::Arc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio::time::Duration as TokioDuration;
use tokio_util::sync::CancellationToken;

/// Refresh worker configuration
#[derive(Debug, Clone)]
pub struct RefreshWorkerConfig {
    /// Seconds between refresh passes (0 = disabled)
    pub interval_secs: u64,
}

impl RefreshWorkerConfig {
    pub fn enabled(&self) -> bool {
        self.interval_secs > 0
    }
}

/// Periodically re-fetches the solved count of every tracked username
pub struct RefreshWorker {
    registration: Arc<RegistrationService>,
    config: RefreshWorkerConfig,
}

impl RefreshWorker {
    pub fn new(registration: Arc<RegistrationService>, config: RefreshWorkerConfig) -> Self {
        RefreshWorker {
            registration,
            config,
        }
    }

    /// Start the refresh loop. Returns immediately when disabled.
    pub async fn start(self, shutdown: CancellationToken) {
        if !self.config.enabled() {
            log::info!("Refresh worker: disabled (interval 0)");
            return;
        }

        log::info!(
            "Refresh worker: started (interval: {}s)",
            self.config.interval_secs
        );

        let period = TokioDuration::from_secs(self.config.interval_secs);
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    log::info!("Refresh worker: received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }

        log::info!("Refresh worker: stopped");
    }

    /// Run one refresh pass
    async fn tick(&self) {
        match self.registration.refresh_all().await {
            Ok(summary) => log::info!(
                "Refresh worker: checked {}, updated {}, failed {}",
                summary.checked,
                summary.updated,
                summary.failed
            ),
            Err(e) => log::error!("Refresh worker: pass failed: {}", e),
        }
    }
}
