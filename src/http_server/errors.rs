//! HTTP error mapping
//!
//! Every failure leaves the server as `{"error": "<message>"}` with a status
//! derived from the service error category.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::api::{ApiError, ErrorCategory};

pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Body could not be decoded into the request type
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::InvalidJson(rejection.body_text())
    }
}

impl HttpError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            HttpError::Api(err) => match err.category() {
                ErrorCategory::Invalid => StatusCode::BAD_REQUEST,
                ErrorCategory::NotFound => StatusCode::NOT_FOUND,
                ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            HttpError::Api(err) => err.code(),
            HttpError::InvalidJson(_) => "INVALID_JSON",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&HttpError> for ErrorResponse {
    fn from(err: &HttpError) -> Self {
        // storage details are logged by the service, never returned
        let error = if err.status_code().is_server_error() {
            "internal server error".to_string()
        } else {
            err.to_string()
        };
        Self { error }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
