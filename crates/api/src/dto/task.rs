use chrono::{DateTime, Utc};
use ferrous_probe_domain::{AggregateResult, TaskRecord, TaskState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    pub task_id: String,
    pub task_status: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_result: Option<AggregateResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<TaskRecord> for TaskStatusResponse {
    fn from(task: TaskRecord) -> Self {
        Self {
            task_id: task.id.to_string(),
            task_status: task.state,
            task_result: task.result,
            error: task.error,
            created_at: task.created_at,
            completed_at: task.completed_at,
        }
    }
}
