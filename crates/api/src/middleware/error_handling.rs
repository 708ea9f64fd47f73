//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and a JSON body of the form
//! `{"error": "...", "code": "..."}`. `code` is stable and machine readable;
//! for rejected bookings it names the calendar rule that failed.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use turnero_core::errors::{AdmissionError, TurnoError};

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use turnero_api::middleware::error_handling::AppError;
/// use turnero_core::errors::TurnoError;
///
/// async fn handler(id: i64) -> Result<Json<i64>, AppError> {
///     if id < 0 {
///         return Err(TurnoError::Validation("id must be positive".to_string()).into());
///     }
///     Ok(Json(id))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub TurnoError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TurnoError::NotFound(_) => StatusCode::NOT_FOUND,
            TurnoError::Validation(_) | TurnoError::InvalidRange(_) => StatusCode::BAD_REQUEST,
            // a rejected booking conflicts with the current calendar
            TurnoError::Admission(_) => StatusCode::CONFLICT,
            TurnoError::Authentication(_) => StatusCode::UNAUTHORIZED,
            TurnoError::Authorization(_) => StatusCode::FORBIDDEN,
            TurnoError::Database(_) | TurnoError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        }

        // Server errors keep their details in the log
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };
        let body = Json(json!({ "error": message, "code": self.0.code() }));

        (status, body).into_response()
    }
}

impl From<TurnoError> for AppError {
    fn from(err: TurnoError) -> Self {
        AppError(err)
    }
}

impl From<AdmissionError> for AppError {
    fn from(err: AdmissionError) -> Self {
        AppError(err.into())
    }
}

/// Wraps an `eyre::Report` in `TurnoError::Database`.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(TurnoError::Database(err))
    }
}

/// Maps a TurnoError straight to an HTTP response
pub fn map_error(err: TurnoError) -> Response {
    AppError(err).into_response()
}
