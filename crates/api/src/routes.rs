use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn create_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::health_check))
        .route("/metrics", get(handlers::get_metrics))
        .route("/dns-lookup", post(handlers::enqueue_lookup))
        .route("/reverse-lookup", post(handlers::enqueue_reverse_lookup))
        .route("/tasks/{task_id}", get(handlers::get_task_status))
        .with_state(state)
}
