#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_probe_application::ports::TaskStore;
use ferrous_probe_domain::{AggregateResult, DomainError, TaskId, TaskRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Task store that counts purge passes and can be told to fail them.
#[derive(Default)]
pub struct CountingTaskStore {
    tasks: RwLock<HashMap<TaskId, TaskRecord>>,
    purges: AtomicUsize,
    fail_purge: AtomicBool,
}

impl CountingTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn purges(&self) -> usize {
        self.purges.load(Ordering::SeqCst)
    }

    pub fn fail_purges(&self) {
        self.fail_purge.store(true, Ordering::SeqCst);
    }

    pub async fn insert_aged(&self, id: &str, age: chrono::Duration) {
        let mut task = TaskRecord::pending(TaskId::new(id));
        task.created_at -= age;
        self.tasks.write().await.insert(task.id.clone(), task);
    }

    pub async fn count(&self) -> usize {
        self.tasks.read().await.len()
    }
}

#[async_trait]
impl TaskStore for CountingTaskStore {
    async fn insert(&self, record: TaskRecord) -> Result<(), DomainError> {
        self.tasks.write().await.insert(record.id.clone(), record);
        Ok(())
    }

    async fn complete(&self, id: &TaskId, result: AggregateResult) -> Result<(), DomainError> {
        match self.tasks.write().await.get_mut(id) {
            Some(task) => {
                task.complete(result);
                Ok(())
            }
            None => Err(DomainError::TaskNotFound(id.to_string())),
        }
    }

    async fn fail(&self, id: &TaskId, error: String) -> Result<(), DomainError> {
        match self.tasks.write().await.get_mut(id) {
            Some(task) => {
                task.fail(error);
                Ok(())
            }
            None => Err(DomainError::TaskNotFound(id.to_string())),
        }
    }

    async fn get(&self, id: &TaskId) -> Result<Option<TaskRecord>, DomainError> {
        Ok(self.tasks.read().await.get(id).cloned())
    }

    async fn purge_expired(&self, ttl: Duration) -> Result<u64, DomainError> {
        self.purges.fetch_add(1, Ordering::SeqCst);
        if self.fail_purge.load(Ordering::SeqCst) {
            return Err(DomainError::IoError("store unavailable".to_string()));
        }

        let ttl = chrono::Duration::from_std(ttl).unwrap();
        let now = chrono::Utc::now();
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|_, task| !task.is_expired(now, ttl));
        Ok((before - tasks.len()) as u64)
    }
}
