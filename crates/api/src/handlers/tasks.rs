use crate::{dto::TaskStatusResponse, errors::ApiError, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use ferrous_probe_domain::TaskId;
use tracing::{debug, instrument};

#[instrument(skip(state), name = "api_get_task_status")]
pub async fn get_task_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskStatusResponse>, ApiError> {
    let task = state.get_task.execute(&TaskId::new(task_id)).await?;
    debug!(task_id = %task.id, status = task.state.as_str(), "Task status retrieved");
    Ok(Json(task.into()))
}
