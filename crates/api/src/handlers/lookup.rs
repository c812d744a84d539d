use crate::{
    dto::{DnsLookupRequest, ReverseLookupRequest, TaskCreatedResponse},
    errors::ApiError,
    state::AppState,
};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use ferrous_probe_application::use_cases::LookupRequest;
use tracing::{debug, instrument};

#[instrument(skip_all, name = "api_enqueue_lookup")]
pub async fn enqueue_lookup(
    State(state): State<AppState>,
    payload: Result<Json<DnsLookupRequest>, JsonRejection>,
) -> Result<Json<TaskCreatedResponse>, ApiError> {
    let Json(req) = payload?;
    debug!(
        domain = %req.domain,
        qtype = %req.qtype,
        servers = req.dns_servers.len(),
        "Enqueueing DNS lookup"
    );

    let task_id = state.submit_lookup.execute(req.into()).await?;

    Ok(Json(TaskCreatedResponse {
        task_id: task_id.to_string(),
        message: "DNS lookup enqueued".to_string(),
    }))
}

#[instrument(skip_all, name = "api_enqueue_reverse_lookup")]
pub async fn enqueue_reverse_lookup(
    State(state): State<AppState>,
    payload: Result<Json<ReverseLookupRequest>, JsonRejection>,
) -> Result<Json<TaskCreatedResponse>, ApiError> {
    let Json(req) = payload?;
    debug!(ip = %req.reverse_ip, servers = req.dns_servers.len(), "Enqueueing reverse lookup");

    let request = LookupRequest::try_from(req)?;
    let task_id = state.submit_lookup.execute(request).await?;

    Ok(Json(TaskCreatedResponse {
        task_id: task_id.to_string(),
        message: "Reverse DNS lookup enqueued".to_string(),
    }))
}
