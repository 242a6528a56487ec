//! API error type
//!
//! Every failure leaves the service as a `{success: false, message, errors?}`
//! envelope with a matching status code.

use abuddy_common::api::{ApiResponse, FieldError, ValidationErrors};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::identity::IdentityError;

pub const AUTH_REQUIRED: &str = "Authentication required";
pub const AUTH_HEADER_REQUIRED: &str = "Authorization header required";
pub const INVALID_TOKEN: &str = "Invalid or expired token";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed validation (400)
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Named resource missing or not visible to the caller (404)
    #[error("{0} not found")]
    NotFound(&'static str),

    /// No route matched (404)
    #[error("Route {0} not found")]
    RouteNotFound(String),

    /// Missing or rejected credentials (401)
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Unique constraint violation (409)
    #[error("Resource already exists")]
    Conflict,

    /// Foreign key violation (400)
    #[error("Invalid reference to related resource")]
    BadReference,

    /// Body over the configured limit (413)
    #[error("Request body too large")]
    PayloadTooLarge,

    /// Identity service failed (502)
    #[error("Identity service unavailable")]
    Identity(#[from] IdentityError),

    /// Anything else (500); detail is logged, never returned
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadReference => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Identity(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors.into_errors())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return ApiError::Conflict;
            }
            if db_err.is_foreign_key_violation() {
                return ApiError::BadReference;
            }
        }
        ApiError::Internal(err.to_string())
    }
}

impl From<abuddy_common::Error> for ApiError {
    fn from(err: abuddy_common::Error) -> Self {
        match err {
            abuddy_common::Error::Database(e) => e.into(),
            abuddy_common::Error::InvalidInput(msg) => ApiError::field("request", msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::Internal(detail) => error!("Internal error: {}", detail),
            ApiError::Identity(e) => error!("Identity provider error: {}", e),
            _ => {}
        }

        let message = self.to_string();
        let errors = match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        };

        (status, Json(ApiResponse::<()>::error(message, errors))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
