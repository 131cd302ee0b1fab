use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Every error body carries `success: false` so clients can branch on one
/// field for both happy and unhappy paths.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    status: u16,
    message: String,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(&'static str),
    Forbidden(&'static str),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    TooManyRequests(&'static str),
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }
}

fn error_body(status: StatusCode, message: String) -> (StatusCode, Json<ErrorResponse>) {
    (status, Json(ErrorResponse { success: false, status: status.as_u16(), message }))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(message) => {
                let mut response =
                    error_body(StatusCode::UNAUTHORIZED, message.to_string()).into_response();
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }
            ApiError::Forbidden(message) => {
                error_body(StatusCode::FORBIDDEN, message.to_string()).into_response()
            }
            ApiError::BadRequest(message) => {
                error_body(StatusCode::BAD_REQUEST, message).into_response()
            }
            ApiError::NotFound(message) => {
                error_body(StatusCode::NOT_FOUND, message).into_response()
            }
            ApiError::Conflict(message) => {
                error_body(StatusCode::CONFLICT, message).into_response()
            }
            ApiError::TooManyRequests(message) => {
                error_body(StatusCode::TOO_MANY_REQUESTS, message.to_string()).into_response()
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}
