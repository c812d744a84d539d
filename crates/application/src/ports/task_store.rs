use async_trait::async_trait;
use ferrous_probe_domain::{AggregateResult, DomainError, TaskId, TaskRecord};
use std::time::Duration;

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, record: TaskRecord) -> Result<(), DomainError>;

    async fn complete(&self, id: &TaskId, result: AggregateResult) -> Result<(), DomainError>;

    async fn fail(&self, id: &TaskId, error: String) -> Result<(), DomainError>;

    async fn get(&self, id: &TaskId) -> Result<Option<TaskRecord>, DomainError>;

    /// Drops tasks older than `ttl`, returning how many were removed.
    async fn purge_expired(&self, ttl: Duration) -> Result<u64, DomainError>;
}
