use crate::ports::TaskStore;
use ferrous_probe_domain::{DomainError, TaskId, TaskRecord};
use std::sync::Arc;

pub struct GetTaskStatusUseCase {
    store: Arc<dyn TaskStore>,
}

impl GetTaskStatusUseCase {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, id: &TaskId) -> Result<TaskRecord, DomainError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DomainError::TaskNotFound(id.to_string()))
    }
}
