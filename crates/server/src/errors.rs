use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sea_orm::DbErr;
use serde_json::json;
use service::errors::ServiceError;
use thiserror::Error;

const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// Error surfaced to HTTP clients as `{"message": ...}`.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed input; 400.
    Validation(String),
    /// Lookup by id found nothing; 404.
    NotFound(&'static str),
    /// Anything else; 500. `detail` is only filled in development.
    Internal { detail: Option<String> },
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Map a service failure, attaching its text only when `expose_detail` is set.
    pub fn service(err: ServiceError, expose_detail: bool) -> Self {
        match err {
            ServiceError::Validation(msg) => Self::Validation(msg),
            e @ (ServiceError::Gateway(_) | ServiceError::Unknown(_)) => Self::Internal {
                detail: expose_detail.then(|| e.to_string()),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::service(err, false)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(msg) => json!({ "message": msg }),
            ApiError::NotFound(msg) => json!({ "message": msg }),
            ApiError::Internal { detail: Some(detail) } => json!({ "message": INTERNAL_MESSAGE, "error": detail }),
            ApiError::Internal { detail: None } => json!({ "message": INTERNAL_MESSAGE }),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database connection failed: {0}")]
    Database(#[source] DbErr),
    #[error("migration failed: {0}")]
    Migration(#[source] DbErr),
    #[error("cannot bind listener: {0}")]
    Bind(#[from] std::io::Error),
}
