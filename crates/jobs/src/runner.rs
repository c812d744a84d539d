use crate::TaskRetentionJob;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub struct JobRunner {
    task_retention: Option<TaskRetentionJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            task_retention: None,
            shutdown: None,
        }
    }

    pub fn with_task_retention(mut self, job: TaskRetentionJob) -> Self {
        self.task_retention = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    /// Spawns every configured job and returns their handles.
    pub async fn start(self) -> Vec<JoinHandle<()>> {
        info!("Starting background job runner");

        let mut handles = Vec::new();
        if let Some(job) = self.task_retention {
            let job = match &self.shutdown {
                Some(token) => job.with_cancellation(token.clone()),
                None => job,
            };
            let job = Arc::new(job);
            handles.push(tokio::spawn(async move { job.start().await }));
        }

        info!(jobs = handles.len(), "All background jobs started");
        handles
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
