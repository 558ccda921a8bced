//! # Error Formatting
//!
//! The rejection-payload seam. A formatter turns the ordered error
//! aggregate for one request into the exact JSON value emitted as the
//! response body; the payload is used unmodified. [`DefaultFormatter`] is
//! one implementation among possibly several.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ErrorItem;

/// Machine-readable code carried by the default rejection payload.
pub const VALIDATION_ERROR_CODE: &str = "VALIDATION_ERROR";

/// Human-readable message carried by the default rejection payload.
pub const VALIDATION_ERROR_MESSAGE: &str = "Invalid data specified at request";

/// Capability interface for producing the rejection payload.
pub trait ErrorFormatter: Send + Sync {
    /// Format the ordered error aggregate into a response payload.
    fn format(&self, errors: &[ErrorItem]) -> Value;
}

/// The default rejection payload shape.
///
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Invalid data specified at request",
///   "errors": [{"message": "...", "type": "any.required", "path": "username"}]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable report code.
    pub code: String,
    /// Human-readable report message.
    pub message: String,
    /// Ordered error aggregate, one item per failed constraint.
    pub errors: Vec<ErrorItem>,
}

/// Stock formatter producing the [`ErrorReport`] shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl ErrorFormatter for DefaultFormatter {
    fn format(&self, errors: &[ErrorItem]) -> Value {
        json!({
            "code": VALIDATION_ERROR_CODE,
            "message": VALIDATION_ERROR_MESSAGE,
            "errors": errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_formatter_produces_report_shape() {
        let errors = vec![
            ErrorItem::new("username is required", "any.required", "username"),
            ErrorItem::new("password is too short", "string.min", "password"),
        ];
        let payload = DefaultFormatter.format(&errors);

        let report: ErrorReport = serde_json::from_value(payload).unwrap();
        assert_eq!(report.code, VALIDATION_ERROR_CODE);
        assert_eq!(report.message, VALIDATION_ERROR_MESSAGE);
        assert_eq!(report.errors, errors);
    }

    #[test]
    fn default_formatter_keeps_aggregate_order() {
        let errors = vec![
            ErrorItem::new("a", "any.invalid", "first"),
            ErrorItem::new("b", "any.invalid", "second"),
        ];
        let payload = DefaultFormatter.format(&errors);
        let paths: Vec<&str> = payload["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["path"].as_str().unwrap())
            .collect();
        assert_eq!(paths, ["first", "second"]);
    }

    #[test]
    fn empty_aggregate_still_formats() {
        let payload = DefaultFormatter.format(&[]);
        assert_eq!(payload["errors"], json!([]));
    }
}
