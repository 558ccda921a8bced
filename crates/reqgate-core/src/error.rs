//! # Error Types
//!
//! Structured errors for the validation layer, built with `thiserror`.
//!
//! Three failure families, kept deliberately distinct:
//!
//! - **Field validation errors** ([`ErrorItem`]) — recoverable, expected,
//!   aggregated and reported to the client; never a process-level fault.
//! - **Setup-time errors** ([`RegisterError`]) — malformed declarations,
//!   rejected when a route is registered, never per request.
//! - **Integration faults** ([`Rejection::MissingBody`], [`CheckerError`])
//!   — programmer errors that retrying a request will not fix; signaled
//!   immediately and never folded into the field-error aggregate.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One failed constraint, as reported by the checking engine.
///
/// Serializes with the wire name `type` for the constraint code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
    /// Human-readable description of the violation.
    pub message: String,
    /// Dotted constraint code, e.g. `any.required` or `string.min`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Dotted field location within its source, e.g. `username` or
    /// `address.city`. Empty for violations of the source as a whole.
    pub path: String,
}

impl ErrorItem {
    /// Convenience constructor.
    pub fn new(
        message: impl Into<String>,
        kind: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            kind: kind.into(),
            path: path.into(),
        }
    }
}

/// Setup-time registration failures.
#[derive(Error, Debug)]
pub enum RegisterError {
    /// The declaration carries no usable schema.
    #[error("declaration has no usable schema: declare at least one of params, query, or body, or a non-empty combined schema")]
    EmptyDeclaration,

    /// The declaration's `options` record could not be interpreted.
    #[error("declaration options are malformed: {0}")]
    InvalidOptions(String),

    /// The checking engine rejected a registered schema.
    #[error("schema for {schema} rejected by the checking engine: {reason}")]
    InvalidSchema {
        /// Which schema was rejected: `params`, `query`, `body`, or
        /// `combined`.
        schema: String,
        /// Engine-reported reason.
        reason: String,
    },
}

/// Failures inside the checking engine itself, distinct from field
/// validation errors.
#[derive(Error, Debug, Clone)]
pub enum CheckerError {
    /// The engine cannot interpret the schema.
    #[error("schema rejected by checking engine: {0}")]
    InvalidSchema(String),

    /// The engine failed while checking a value.
    #[error("checking engine failure: {0}")]
    Engine(String),
}

/// Outcome of a rejected checker invocation.
#[derive(Error, Debug)]
pub enum Rejection {
    /// Request data failed validation. Carries the formatted payload to
    /// emit with a 400-class status; the downstream handler must not run.
    #[error("request data failed validation")]
    Invalid(Value),

    /// A body schema is registered but the request's body view was never
    /// initialized: the body-reading collaborator is missing from the
    /// application's middleware stack. An integration fault, not a
    /// validation failure — retrying the same request will not fix it.
    #[error("request body was never read: a body schema is registered but no body-reading middleware ran before validation")]
    MissingBody,

    /// The checking engine failed at request time.
    #[error(transparent)]
    Engine(#[from] CheckerError),
}
