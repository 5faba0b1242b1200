//! Error types for the Feedback Collector service.
//!
//! The small domain enums (`CredentialError`, `AuthError`, `RoomAccessError`,
//! `ConflictError`) are what the core components return. `FcError` is the
//! handler-facing error and owns the HTTP mapping. Client-facing messages are
//! generic; details are logged server-side.

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures from the password hashing primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("password hashing failed")]
    HashFailure,

    #[error("stored password hash is malformed")]
    MalformedHash,
}

/// Reasons a request failed authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing credential")]
    MissingCredential,

    #[error("malformed credential")]
    MalformedCredential,

    #[error("malformed token")]
    Malformed,

    #[error("bad token signature")]
    BadSignature,

    #[error("token expired")]
    Expired,
}

impl AuthError {
    /// Bounded label for metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::MalformedCredential => "malformed_credential",
            AuthError::Malformed => "malformed",
            AuthError::BadSignature => "bad_signature",
            AuthError::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RoomAccessError {
    #[error("wrong room secret")]
    WrongSecret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConflictError {
    #[error("email already registered")]
    DuplicateEmail,
}

/// Feedback Collector error type.
///
/// Maps to HTTP status codes:
/// - Database, Credential, Internal: 500 Internal Server Error
/// - Unauthenticated, InvalidCredentials, RoomAccess: 401 Unauthorized
/// - Forbidden: 403 Forbidden
/// - NotFound: 404 Not Found
/// - Conflict: 409 Conflict
/// - BadRequest: 400 Bad Request
#[derive(Debug, Error)]
pub enum FcError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(#[from] AuthError),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Room access denied: {0}")]
    RoomAccess(#[from] RoomAccessError),

    #[error("Conflict: {0}")]
    Conflict(#[from] ConflictError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error")]
    Internal,
}

impl FcError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            FcError::Database(_) | FcError::Credential(_) | FcError::Internal => 500,
            FcError::Unauthenticated(_) | FcError::InvalidCredentials | FcError::RoomAccess(_) => {
                401
            }
            FcError::Forbidden(_) => 403,
            FcError::NotFound(_) => 404,
            FcError::Conflict(_) => 409,
            FcError::BadRequest(_) => 400,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for FcError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            FcError::Database(err) => {
                tracing::error!(target: "fc.database", error = %err, "Database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            FcError::Credential(err) => {
                tracing::error!(target: "fc.crypto", error = %err, "Credential operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CREDENTIAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            FcError::Unauthenticated(AuthError::MissingCredential) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            FcError::Unauthenticated(AuthError::MalformedCredential) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid Authorization header".to_string(),
            ),
            FcError::Unauthenticated(_) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "The access token is invalid or expired".to_string(),
            ),
            FcError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password".to_string(),
            ),
            FcError::RoomAccess(_) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_ROOM_PASSWORD",
                "Invalid room password".to_string(),
            ),
            FcError::Conflict(ConflictError::DuplicateEmail) => (
                StatusCode::CONFLICT,
                "EMAIL_TAKEN",
                "An account with this email already exists".to_string(),
            ),
            FcError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason.clone())
            }
            FcError::NotFound(resource) => (StatusCode::NOT_FOUND, "NOT_FOUND", resource.clone()),
            FcError::Forbidden(reason) => (StatusCode::FORBIDDEN, "FORBIDDEN", reason.clone()),
            FcError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        if matches!(self, FcError::Unauthenticated(_)) {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer realm=\"feedback-collector\""),
            );
        }

        response
    }
}

impl From<sqlx::Error> for FcError {
    fn from(err: sqlx::Error) -> Self {
        FcError::Database(err.to_string())
    }
}

/// Body rejections carry serde detail, which stays in the log.
impl From<JsonRejection> for FcError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(
            target: "fc.handlers",
            status = rejection.status().as_u16(),
            reason = %rejection.body_text(),
            "Rejected request body"
        );
        FcError::BadRequest("Invalid request body".to_string())
    }
}
