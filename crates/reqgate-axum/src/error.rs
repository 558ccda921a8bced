//! # Guard Faults
//!
//! Non-validation failures produced by the middleware layer. A validation
//! rejection carries its own formatter-produced payload; everything here
//! is an infrastructure fault with the structured `{"error": {...}}` body
//! shape. Internal failure detail is logged for operators and never
//! returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON fault body.
#[derive(Debug, Serialize, Deserialize)]
pub struct FaultBody {
    /// The single fault carried by this response.
    pub error: FaultDetail,
}

/// Inner fault detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct FaultDetail {
    /// Machine-readable fault code (e.g. "MALFORMED_BODY").
    pub code: String,
    /// Human-readable fault message.
    pub message: String,
}

/// Middleware-level fault that maps to an HTTP response.
#[derive(Error, Debug)]
pub enum GuardError {
    /// The request body could not be parsed (400).
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The request body exceeded the buffering limit (413).
    #[error("request body exceeds the read limit")]
    BodyTooLarge,

    /// A body schema is registered but no body reader ran (500).
    ///
    /// Integration fault: the application forgot the body-reading
    /// middleware. Retrying the same request will not fix it, so this is
    /// kept out of the validation aggregate and made loud instead.
    #[error("request body was never read: attach the body reader middleware before the validator")]
    BodyNotRead,

    /// The checking engine failed at request time (500). Detail is logged
    /// but not returned to clients.
    #[error("checking engine failure: {0}")]
    Engine(String),
}

impl GuardError {
    /// HTTP status and machine-readable fault code for this fault.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MalformedBody(_) => (StatusCode::BAD_REQUEST, "MALFORMED_BODY"),
            Self::BodyTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            Self::BodyNotRead => (StatusCode::INTERNAL_SERVER_ERROR, "BODY_NOT_READ"),
            Self::Engine(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CHECKER_FAILURE"),
        }
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            // Engine detail stays server-side.
            Self::Engine(_) => {
                tracing::error!(error = %self, "checking engine failure");
                "An internal error occurred".to_string()
            }
            // A missing collaborator is a wiring bug; the message names the
            // fix and carries no request data, so it may reach the client.
            Self::BodyNotRead => {
                tracing::error!(error = %self, "body schema registered without a body reader");
                self.to_string()
            }
            other => other.to_string(),
        };

        let body = FaultBody {
            error: FaultDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}
