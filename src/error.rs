use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use validator::ValidationErrors;

use crate::forms::error_fields;
use crate::relay::SubmissionError;

/// Shown to the visitor whenever the relay could not deliver; details go to the log.
pub const RELAY_FAILURE_NOTICE: &str =
    "Não foi possível enviar sua solicitação. Tente novamente mais tarde.";

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Validation(ValidationErrors),
    RateLimited(u64),
    Relay(SubmissionError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::Validation(errors) => write!(f, "Validation failed: {errors}"),
            AppError::RateLimited(secs) => write!(f, "Rate Limited: retry after {secs}s"),
            AppError::Relay(err) => write!(f, "Mail Relay Error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, axum::Json(json!({ "error": msg }))).into_response()
            }
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                axum::Json(json!({
                    "error": "Validation failed",
                    "fields": error_fields(&errors),
                })),
            )
                .into_response(),
            AppError::RateLimited(secs) => (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, secs.to_string())],
                axum::Json(json!({ "error": format!("Rate limited. Retry after {secs}s") })),
            )
                .into_response(),
            AppError::Relay(_) => (
                StatusCode::BAD_GATEWAY,
                axum::Json(json!({ "error": RELAY_FAILURE_NOTICE })),
            )
                .into_response(),
        }
    }
}
