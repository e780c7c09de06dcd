//! Application error type.
//!
//! Every fallible handler and service returns [`AppError`], which pairs an HTTP
//! status with an [`anyhow::Error`]. The status carries the error taxonomy:
//!
//! | Kind          | Status |
//! |---------------|--------|
//! | InvalidInput  | 400 (422 for DTO validation) |
//! | Unauthorized  | 401 |
//! | Forbidden     | 403 |
//! | NotFound      | 404 |
//! | Conflict      | 409 |
//! | Gone          | 410 |
//! | RateLimited   | 429 |
//! | Internal      | 500 |
//!
//! Any `Into<anyhow::Error>` converts into an internal error, so `?` works on
//! sqlx and other library errors. Call sites that know better (unique
//! violations, missing rows) build the specific variant instead.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, anyhow::anyhow!(message))
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    /// The resource existed but is no longer usable (expired codes group).
    pub fn gone<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::GONE, err)
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message))
    }

    pub fn forbidden(message: String) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message))
    }

    pub fn too_many_requests(message: String) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, anyhow::anyhow!(message))
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    /// Maps a unique-constraint violation to `409 Conflict` with `message`,
    /// anything else to an internal error.
    pub fn from_unique_violation(err: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return Self::conflict(anyhow::anyhow!(message.to_string()));
        }
        Self::database(err)
    }

    /// Maps a foreign-key violation to `400 Bad Request` with `message`.
    pub fn from_foreign_key_violation(err: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_foreign_key_violation()
        {
            return Self::bad_request(anyhow::anyhow!(message.to_string()));
        }
        Self::database(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error = %self.error, "Request failed with internal error");
        }

        let body = Json(json!({
            "error": self.error.to_string()
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
