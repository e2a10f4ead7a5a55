use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookcache_core::catalog::EntityKind;
use bookcache_core::storage::{repository_error_to_status_code, RepositoryError};
use thiserror::Error;

use super::response::ApiResponse;

/// Request problems detected before the store is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
}

impl RequestError {
    fn status_code(&self) -> StatusCode {
        match self {
            RequestError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RequestError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

pub struct AppError(pub anyhow::Error);

impl AppError {
    /// The 404 returned when an entity id does not exist.
    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        Self(
            RepositoryError::NotFound {
                entity_type: kind.model_name(),
                id: id.to_string(),
            }
            .into(),
        )
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let code = repository_error_to_status_code(repo_error);
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let message = match repo_error {
                RepositoryError::NotFound { entity_type, .. } => format!("{entity_type} not found"),
                other => other.to_string(),
            };
            return (status, message);
        }

        if let Some(request_error) = self.0.downcast_ref::<RequestError>() {
            return (request_error.status_code(), request_error.to_string());
        }

        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, message) = self.status_and_message();

        if status_code.is_server_error() {
            tracing::error!(error = %self.0, status = %status_code, "Application error");
        } else {
            tracing::debug!(error = %self.0, status = %status_code, "Request rejected");
        }

        (status_code, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}

/// Fallback for requests that match no route.
pub async fn route_not_found() -> AppError {
    RequestError::NotFound("Route not found".to_string()).into()
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
