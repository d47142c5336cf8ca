//! API error responses

use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Errors returned to API clients
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or empty upload
    BadRequest(String),
    /// Chat message outside the accepted length
    InvalidMessage(String),
    /// Body the extractor refused, with the status it chose
    Rejected { status: StatusCode, message: String },
    /// Server-side failure unrelated to the input
    Internal(String),
}

impl ApiError {
    const fn rejection_code(status: StatusCode) -> &'static str {
        match status.as_u16() {
            413 => "payload_too_large",
            415 => "unsupported_media_type",
            422 => "invalid_body",
            _ => "bad_request",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: ErrorBody,
        }

        #[derive(Serialize)]
        struct ErrorBody {
            code: &'static str,
            message: String,
        }

        let (status, code, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::InvalidMessage(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_message", msg),
            Self::Rejected { status, message } => (status, Self::rejection_code(status), message),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg)
            }
        };

        (status, Json(ErrorResponse { error: ErrorBody { code, message } })).into_response()
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::Rejected {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        Self::Rejected {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::Rejected {
            status: e.status(),
            message: e.body_text(),
        }
    }
}
