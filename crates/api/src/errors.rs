use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ferrous_probe_domain::DomainError;
use serde_json::json;
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "Rejected request body");
        Self::BadRequest("invalid request".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),

            ApiError::Domain(DomainError::TaskNotFound(_)) => {
                (StatusCode::NOT_FOUND, "task not found".to_string())
            }

            ApiError::Domain(err) if err.is_validation_error() => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }

            ApiError::Domain(err) => {
                error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
