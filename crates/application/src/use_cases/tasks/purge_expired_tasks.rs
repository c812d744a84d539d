use crate::ports::TaskStore;
use ferrous_probe_domain::DomainError;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Use case: drop finished and abandoned tasks past their retention window
pub struct PurgeExpiredTasksUseCase {
    store: Arc<dyn TaskStore>,
}

impl PurgeExpiredTasksUseCase {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, ttl: Duration) -> Result<u64, DomainError> {
        let deleted = self.store.purge_expired(ttl).await?;
        if deleted > 0 {
            info!(deleted, ttl_secs = ttl.as_secs(), "Expired tasks purged");
        }
        Ok(deleted)
    }
}
