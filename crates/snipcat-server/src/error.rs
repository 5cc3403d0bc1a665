//! HTTP mapping of the structured error facility

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use snipcat_core::errors::{ExError, ExErrorKind, FieldViolation};

/// An `ExError` on its way out of a handler
#[derive(Debug)]
pub struct ApiError(pub ExError);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    message: &'a str,
    code: &'static str,
    #[serde(skip_serializing_if = "no_violations")]
    errors: &'a [FieldViolation],
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<&'a str>,
}

fn no_violations(errors: &&[FieldViolation]) -> bool {
    errors.is_empty()
}

impl ApiError {
    /// Status code for an error kind
    pub fn status(kind: ExErrorKind) -> StatusCode {
        match kind {
            ExErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ExErrorKind::NotFound => StatusCode::NOT_FOUND,
            ExErrorKind::AlreadyExists => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// A 400 for a malformed path segment or body
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(ExError::new(ExErrorKind::InvalidInput).with_message(message))
    }
}

impl From<ExError> for ApiError {
    fn from(err: ExError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = Self::status(err.kind());

        if status.is_server_error() {
            tracing::error!(code = err.code(), error = %err, "request failed");
        }

        // Internal details stay in the log
        let message = if status.is_server_error() {
            "Internal server error"
        } else {
            err.message()
        };

        let body = ErrorBody {
            message,
            code: err.code(),
            errors: err.violations(),
            request_id: err.request_id().map(|id| id.as_str()),
        };

        (status, Json(body)).into_response()
    }
}
