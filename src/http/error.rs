//! Error responses for the HTTP layer.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;
use crate::validator::ValidationErrors;

/// Everything a request handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body could not be decoded.
    #[error("{0}")]
    BadRequest(String),
    /// Request body exceeded the configured limit.
    #[error("body must not be larger than the configured limit")]
    PayloadTooLarge,
    /// Decoded input broke one or more rules.
    #[error("failed validation")]
    FailedValidation(ValidationErrors),
    /// Unknown route or record.
    #[error("the requested resource could not be found")]
    NotFound,
    /// Known route, unsupported verb.
    #[error("the {0} method is not supported for this resource")]
    MethodNotAllowed(String),
    /// Stale version on update.
    #[error("unable to update the record due to an edit conflict, please try again")]
    EditConflict,
    /// Anything else. The detail is logged, never sent.
    #[error("the server encountered a problem and could not process your request")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::FailedValidation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::EditConflict => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::EditConflict { .. } => ApiError::EditConflict,
            StoreError::Persistence(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::FailedValidation(errors) => json!({ "error": errors }),
            ApiError::Internal(detail) => {
                error!(detail = %detail, "internal error");
                json!({ "error": self.to_string() })
            }
            ApiError::EditConflict => {
                warn!("rejected update with stale version");
                json!({ "error": self.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
