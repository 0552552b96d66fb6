use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;
use tracing::{debug, error};

use crate::movie::service::Error as ServiceError;

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            ServiceError::PersistenceFailure(source) => {
                ApiError::Internal(format!("Persistence failure: {source}"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) | ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {self}");
        } else {
            debug!("Request rejected: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
