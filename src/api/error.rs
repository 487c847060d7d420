//! HTTP error responses
//!
//! Every failure leaves a handler as a JSON body with a `message` field.
//! Store failures also carry the underlying error under `error`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::Error;

#[derive(Debug)]
pub enum ApiError {
    /// Delete target does not exist
    NotFound,
    /// Request body could not be read as a JSON object. Carries the
    /// extractor's status so oversize bodies stay 413.
    BadRequest { status: StatusCode, detail: String },
    /// Anything the store reported
    Store(Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    message: "Comment not found",
                    error: None,
                },
            ),
            ApiError::BadRequest { status, detail } => (
                status,
                ErrorBody {
                    message: "Invalid request body",
                    error: Some(detail),
                },
            ),
            ApiError::Store(err) => {
                tracing::error!(error = %err, "Comment store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        message: "Server error",
                        error: Some(err.to_string()),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
