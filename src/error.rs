//!
//! # HTTP Error Mapping
//!
//! This module defines `AppError`, the error type returned by request handlers.
//! Domain errors from the auth core (`AuthError`, `RegisterError`, `LoginError`)
//! convert into it with `?`, and `AppError` implements
//! `actix_web::error::ResponseError` to turn itself into a JSON response.
//!
//! Credential failures are collapsed into a generic 401 here. Storage faults map
//! to 503 so clients can tell "retry later" from "rejected". Internal details are
//! logged and never echoed to the client.

use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::{AuthError, LoginError, PasswordError, RegisterError};
use crate::storage::StorageError;

/// Represents all possible errors a handler can return.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed or is required but missing (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Malformed or rejected request (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// Requested resource was not found (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// Unexpected server-side error (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    /// The storage layer is unreachable or failing (HTTP 503).
    #[error("Database Error: {0}")]
    DatabaseError(String),
    /// Input validation failed (HTTP 422 Unprocessable Entity).
    #[error("Validation Error: {0}")]
    ValidationError(String),
}

const CREDENTIALS_REJECTED: &str = "Could not validate credentials";

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DatabaseError(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        let message = match self {
            AppError::Unauthorized(msg) => {
                response.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
                msg.clone()
            }
            AppError::BadRequest(msg) | AppError::NotFound(msg) | AppError::ValidationError(msg) => {
                msg.clone()
            }
            AppError::InternalServerError(msg) => {
                log::error!("internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::DatabaseError(msg) => {
                log::error!("storage error: {}", msg);
                "Service temporarily unavailable".to_string()
            }
        };
        response.json(json!({ "error": message }))
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        match error {
            AuthError::MissingCredentials => AppError::Unauthorized("Not authenticated".into()),
            AuthError::InvalidToken => AppError::Unauthorized(CREDENTIALS_REJECTED.into()),
            AuthError::StorageFailure(e) => e.into(),
        }
    }
}

impl From<RegisterError> for AppError {
    fn from(error: RegisterError) -> AppError {
        match error {
            RegisterError::DuplicateEmail => AppError::BadRequest("Email already registered".into()),
            RegisterError::StorageFailure(e) => e.into(),
            RegisterError::Hashing(PasswordError::TooLong) => {
                AppError::ValidationError("password: must be at most 72 bytes".into())
            }
            RegisterError::Hashing(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}

impl From<LoginError> for AppError {
    fn from(error: LoginError) -> AppError {
        match error {
            LoginError::InvalidCredentials => {
                AppError::Unauthorized("Incorrect email or password".into())
            }
            LoginError::StorageFailure(e) => e.into(),
            LoginError::Hashing(e) => AppError::InternalServerError(e.to_string()),
            LoginError::TokenIssue(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(error: StorageError) -> AppError {
        AppError::DatabaseError(error.to_string())
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}
