use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::validate::Violation;

/// Application-level error type for HTTP handlers.
///
/// Each handler translates only the error kinds it anticipates; anything
/// unexpected falls through to a sanitized 500, with the detail kept in the
/// server-side logs.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Input failed schema validation; carries the complete violation list.
    #[error("validation failed")]
    Validation(Vec<Violation>),

    /// A user with this email already exists.
    #[error("email already in use")]
    DuplicateEmail,

    /// The named entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Credential check failed on the password, not the email.
    #[error("incorrect password")]
    IncorrectPassword,

    /// A database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Anything else.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Map the affected-row count of a delete to its outcome: zero rows is a
/// missing entity, not a server fault.
pub fn ensure_deleted(affected: u64, entity: &'static str) -> ApiResult<()> {
    if affected == 0 {
        Err(ApiError::NotFound(entity))
    } else {
        Ok(())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "code": "INVALID_DATA",
                    "message": "validation failed",
                    "violations": violations,
                }),
            ),
            ApiError::DuplicateEmail => (
                StatusCode::CONFLICT,
                json!({ "code": "DUPLICATE_EMAIL", "message": "this email is already used" }),
            ),
            ApiError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                json!({ "code": "NOT_FOUND", "message": format!("{entity} not found") }),
            ),
            ApiError::IncorrectPassword => (
                StatusCode::UNAUTHORIZED,
                json!({ "code": "PASSWORD_INCORRECT", "message": "incorrect password" }),
            ),
            ApiError::Database(err) => database_response(err),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "code": "INTERNAL", "message": "internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Classify a sqlx error into a status and body.
///
/// `RowNotFound` maps to 404; a Postgres unique violation (23505) on insert
/// means a concurrent signup won the race for an email, so it maps to 409.
/// Everything else is a sanitized 500.
fn database_response(err: sqlx::Error) -> (StatusCode, Value) {
    match &err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            json!({ "code": "NOT_FOUND", "message": "resource not found" }),
        ),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => (
            StatusCode::CONFLICT,
            json!({ "code": "DUPLICATE_EMAIL", "message": "this email is already used" }),
        ),
        _ => {
            tracing::error!(error = %err, "database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "code": "INTERNAL", "message": "internal server error" }),
            )
        }
    }
}
