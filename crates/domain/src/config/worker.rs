use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// How often expired tasks are purged.
    pub cleanup_interval_secs: u64,

    pub task_ttl_secs: u64,
}

impl WorkerConfig {
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    pub fn task_ttl(&self) -> Duration {
        Duration::from_secs(self.task_ttl_secs)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cleanup_interval_secs: 600,
            task_ttl_secs: 3600,
        }
    }
}
