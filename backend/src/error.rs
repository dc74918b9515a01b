//! HTTP mapping of service errors.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::error::AuditError;
use log::{error, warn};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error("audit session `{0}` not found")]
    SessionNotFound(String),

    #[error("audit session `{0}` is already open")]
    Conflict(String),

    #[error("invalid upload: {0}")]
    Upload(String),

    #[error("too large: {0}")]
    TooLarge(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Audit(AuditError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Audit(AuditError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Audit(AuditError::NotPermitted(_)) => StatusCode::FORBIDDEN,
            ApiError::Audit(AuditError::MalformedSnapshot(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Audit(AuditError::PersistenceUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Audit(AuditError::Export(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upload(_) => StatusCode::BAD_REQUEST,
            ApiError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }
        HttpResponse::build(status).json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}
