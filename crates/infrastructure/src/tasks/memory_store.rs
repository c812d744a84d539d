use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use ferrous_probe_application::ports::TaskStore;
use ferrous_probe_domain::{AggregateResult, DomainError, TaskId, TaskRecord};
use std::time::Duration;
use tracing::debug;

/// Process-local task table. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: DashMap<TaskId, TaskRecord>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, record: TaskRecord) -> Result<(), DomainError> {
        self.tasks.insert(record.id.clone(), record);
        Ok(())
    }

    async fn complete(&self, id: &TaskId, result: AggregateResult) -> Result<(), DomainError> {
        let mut task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| DomainError::TaskNotFound(id.to_string()))?;
        task.complete(result);
        Ok(())
    }

    async fn fail(&self, id: &TaskId, error: String) -> Result<(), DomainError> {
        let mut task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| DomainError::TaskNotFound(id.to_string()))?;
        task.fail(error);
        Ok(())
    }

    async fn get(&self, id: &TaskId) -> Result<Option<TaskRecord>, DomainError> {
        Ok(self.tasks.get(id).map(|task| task.clone()))
    }

    async fn purge_expired(&self, ttl: Duration) -> Result<u64, DomainError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| DomainError::ConfigError(format!("task TTL out of range: {}", e)))?;
        let now = Utc::now();

        let before = self.tasks.len();
        self.tasks.retain(|_, task| !task.is_expired(now, ttl));
        let deleted = before.saturating_sub(self.tasks.len()) as u64;

        debug!(deleted, remaining = self.tasks.len(), "Task purge pass");
        Ok(deleted)
    }
}
