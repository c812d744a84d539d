use crate::lookup::AggregateResult;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    Pending,
    Success,
    Failure,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Pending => "PENDING",
            TaskState::Success => "SUCCESS",
            TaskState::Failure => "FAILURE",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskState::Pending)
    }
}

/// A submitted lookup and, once finished, its result.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub id: TaskId,
    pub state: TaskState,
    pub result: Option<AggregateResult>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    pub fn pending(id: TaskId) -> Self {
        Self {
            id,
            state: TaskState::Pending,
            result: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn complete(&mut self, result: AggregateResult) {
        self.state = TaskState::Success;
        self.result = Some(result);
        self.completed_at = Some(Utc::now());
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.state = TaskState::Failure;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at >= ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut task = TaskRecord::pending(TaskId::new("abc"));
        assert_eq!(task.state, TaskState::Pending);
        assert!(!task.state.is_terminal());

        task.complete(AggregateResult::default());
        assert_eq!(task.state, TaskState::Success);
        assert!(task.completed_at.is_some());
        assert!(task.result.is_some());
    }

    #[test]
    fn test_expiry() {
        let task = TaskRecord::pending(TaskId::new("abc"));
        let later = task.created_at + Duration::hours(2);
        assert!(task.is_expired(later, Duration::hours(1)));
        assert!(!task.is_expired(task.created_at, Duration::hours(1)));
    }

    #[test]
    fn test_state_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&TaskState::Success).unwrap(),
            "\"SUCCESS\""
        );
    }
}
