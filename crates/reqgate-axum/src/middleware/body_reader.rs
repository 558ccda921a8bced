//! # Body Reader
//!
//! The body-reading collaborator. Buffers the request body up to a limit,
//! parses it into a JSON value according to the content type, deposits the
//! [`JsonBody`] extension for the validator, and reassembles the request
//! so downstream extractors still see the original bytes.

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

use crate::error::GuardError;

/// Cap on buffered body bytes.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// The parsed body view deposited by [`body_reader_middleware`].
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

/// Middleware that initializes the request's body view.
///
/// `application/json` bodies parse as JSON (an empty body becomes `{}`);
/// `application/x-www-form-urlencoded` bodies parse as an object of
/// strings. Requests with any other content type get an empty-object view.
/// Attach this layer outside the validator on every route that declares a
/// body schema.
pub async fn body_reader_middleware(request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, DEFAULT_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(_) => return GuardError::BodyTooLarge.into_response(),
    };

    let content_type = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    let view = if content_type.starts_with("application/json") {
        match parse_json(&bytes) {
            Ok(value) => value,
            Err(reason) => return GuardError::MalformedBody(reason).into_response(),
        }
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        parse_form(&bytes)
    } else {
        Value::Object(Map::new())
    };

    parts.extensions.insert(JsonBody(view));
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn parse_json(bytes: &Bytes) -> Result<Value, String> {
    if bytes.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(bytes).map_err(|e| e.to_string())
}

/// Form pairs as an object of strings. On duplicate keys the last
/// occurrence wins.
fn parse_form(bytes: &Bytes) -> Value {
    let mut fields = Map::new();
    for (key, value) in url::form_urlencoded::parse(bytes) {
        fields.insert(key.into_owned(), Value::String(value.into_owned()));
    }
    Value::Object(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_json_body_reads_as_empty_object() {
        assert_eq!(parse_json(&Bytes::new()).unwrap(), json!({}));
    }

    #[test]
    fn json_body_parses() {
        let bytes = Bytes::from_static(br#"{"username": "abcde"}"#);
        assert_eq!(parse_json(&bytes).unwrap(), json!({"username": "abcde"}));
    }

    #[test]
    fn malformed_json_reports_reason() {
        let reason = parse_json(&Bytes::from_static(b"{")).unwrap_err();
        assert!(!reason.is_empty());
    }

    #[test]
    fn form_body_parses_to_string_fields() {
        let bytes = Bytes::from_static(b"username=abcde&password=12%2034");
        assert_eq!(
            parse_form(&bytes),
            json!({"username": "abcde", "password": "12 34"})
        );
    }

    #[test]
    fn duplicate_form_keys_keep_last_value() {
        let bytes = Bytes::from_static(b"page=1&page=2");
        assert_eq!(parse_form(&bytes), json!({"page": "2"}));
    }
}
