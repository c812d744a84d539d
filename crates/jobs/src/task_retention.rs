use ferrous_probe_application::use_cases::PurgeExpiredTasksUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Periodically drops lookup tasks older than their TTL.
pub struct TaskRetentionJob {
    purge: Arc<PurgeExpiredTasksUseCase>,
    ttl: Duration,
    interval: Duration,
    shutdown: CancellationToken,
}

impl TaskRetentionJob {
    pub fn new(purge: Arc<PurgeExpiredTasksUseCase>, ttl: Duration) -> Self {
        Self {
            purge,
            ttl,
            interval: Duration::from_secs(600),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Runs until the cancellation token fires.
    pub async fn start(self: Arc<Self>) {
        info!(
            ttl_secs = self.ttl.as_secs(),
            interval_secs = self.interval.as_secs(),
            "Starting task retention job"
        );

        let mut interval = tokio::time::interval(self.interval);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("TaskRetentionJob: shutting down");
                    break;
                }
                _ = interval.tick() => {
                    match self.purge.execute(self.ttl).await {
                        Ok(deleted) => debug!(deleted, "Task retention pass completed"),
                        Err(e) => error!(error = %e, "Task retention pass failed"),
                    }
                }
            }
        }
    }
}
