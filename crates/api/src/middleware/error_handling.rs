//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the Campus
//! API. It maps domain-specific errors to appropriate HTTP status codes and
//! JSON error responses, ensuring a consistent error handling experience
//! across the entire API.
//!
//! Policy violations (denied workflow transitions, conflict re-check
//! losses) arrive as [`CampusError::Policy`] and map to 422: the request
//! was well-formed, the domain rules refused it, and the message is meant
//! for the end user.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use campus_core::errors::CampusError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `CampusError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub CampusError);

/// Converts application errors to HTTP responses
///
/// This implementation maps each error type to the appropriate HTTP status
/// code and formats the error message into a JSON response body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            CampusError::NotFound(_) => StatusCode::NOT_FOUND,
            CampusError::Validation(_) => StatusCode::BAD_REQUEST,
            CampusError::Authentication(_) => StatusCode::UNAUTHORIZED,
            CampusError::Authorization(_) => StatusCode::FORBIDDEN,
            CampusError::Policy(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CampusError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CampusError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Automatic conversion from CampusError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, CampusError>` in handler functions that return
/// `Result<T, AppError>`.
impl From<CampusError> for AppError {
    fn from(err: CampusError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// Repository-level reports surface as internal database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(CampusError::Database(err))
    }
}

/// Maps a CampusError to an HTTP response directly.
pub fn map_error(err: CampusError) -> Response {
    AppError(err).into_response()
}
