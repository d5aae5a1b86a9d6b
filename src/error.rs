//! Unified error types for the users API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message returned when the store was unreachable at startup.
pub const MSG_STORE_UNAVAILABLE: &str = "Conexión a la base de datos no disponible";
/// Message returned when a create or update body lacks a field.
pub const MSG_MISSING_FIELDS: &str = "Faltan campos requeridos: nombre y email";
/// Message returned when no row matches the requested id.
pub const MSG_USER_NOT_FOUND: &str = "Usuario no encontrado";
/// Fallback message when a failure carries no text of its own.
pub const MSG_INTERNAL: &str = "Internal server error";

/// Startup and process-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised by a [`UserRepository`](crate::store::UserRepository).
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error reported by the MySQL driver.
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Error from a non-SQL backend (the in-memory repository).
    #[error("{0}")]
    Backend(String),
}

impl StoreError {
    /// The message surfaced to HTTP clients.
    ///
    /// Server-side errors keep the database's own text, without the driver's
    /// "error returned from database" prefix.
    pub fn client_message(&self) -> String {
        match self {
            Self::Database(sqlx::Error::Database(db)) => db.message().to_string(),
            Self::Database(e) => e.to_string(),
            Self::Backend(msg) => msg.clone(),
        }
    }
}

/// Request-level failures, each mapped to one HTTP status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The store was unreachable at startup; no store call is attempted.
    #[error("{}", MSG_STORE_UNAVAILABLE)]
    ServiceUnavailable,

    /// Required fields missing or body unreadable.
    #[error("{0}")]
    BadRequest(String),

    /// Update or delete matched no row.
    #[error("{}", MSG_USER_NOT_FOUND)]
    NotFound,

    /// Any other store failure, with the store's message.
    #[error("{0}")]
    InternalError(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            // 500, not 503: legacy wire contract.
            Self::ServiceUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable => "service_unavailable",
            Self::BadRequest(_) => "bad_request",
            Self::NotFound => "not_found",
            Self::InternalError(_) => "internal_error",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let msg = err.client_message();
        if msg.is_empty() {
            Self::InternalError(MSG_INTERNAL.to_string())
        } else {
            Self::InternalError(msg)
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_wire_contract() {
        assert_eq!(ApiError::ServiceUnavailable.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::InternalError("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_error_message_is_surfaced_verbatim() {
        let err = StoreError::Backend("Table 'miapi.usuarios' doesn't exist".to_string());
        assert_eq!(
            ApiError::from(err),
            ApiError::InternalError("Table 'miapi.usuarios' doesn't exist".to_string())
        );
    }

    #[test]
    fn empty_store_message_falls_back() {
        let err = StoreError::Backend(String::new());
        assert_eq!(ApiError::from(err), ApiError::InternalError(MSG_INTERNAL.to_string()));
    }

    #[test]
    fn driver_errors_keep_their_text() {
        let err = StoreError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.client_message(), sqlx::Error::PoolTimedOut.to_string());
    }
}
