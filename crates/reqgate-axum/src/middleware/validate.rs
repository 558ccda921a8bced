//! # Validation Middleware
//!
//! Assembles the three request data views from a live request and drives a
//! registered checker. On acceptance the inner service runs with the
//! request untouched; on rejection the formatter's payload is emitted with
//! status 400 and the inner service never runs.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Query, RawPathParams, Request, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};

use reqgate_core::{Checker, Rejection, RequestData};

use crate::error::GuardError;
use crate::middleware::body_reader::JsonBody;

/// Middleware that enforces a registered [`Checker`].
///
/// Attach with [`axum::middleware::from_fn_with_state`], passing the
/// checker as the state value:
///
/// ```ignore
/// Router::new()
///     .route("/users", post(create_user))
///     .route_layer(middleware::from_fn_with_state(checker, validate_middleware))
///     .route_layer(middleware::from_fn(body_reader_middleware))
/// ```
pub async fn validate_middleware(
    State(checker): State<Checker>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let data = RequestData {
        params: path_params(&mut parts).await,
        query: query_pairs(&parts),
        body: parts.extensions.get::<JsonBody>().map(|b| b.0.clone()),
    };

    match checker.check(&data) {
        Ok(()) => next.run(Request::from_parts(parts, body)).await,
        Err(Rejection::Invalid(payload)) => {
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(Rejection::MissingBody) => GuardError::BodyNotRead.into_response(),
        Err(Rejection::Engine(e)) => GuardError::Engine(e.to_string()).into_response(),
    }
}

/// Route parameters as an object of strings. Empty when the route has no
/// placeholders.
async fn path_params(parts: &mut Parts) -> Value {
    let mut fields = Map::new();
    if let Ok(params) = RawPathParams::from_request_parts(parts, &()).await {
        for (key, value) in &params {
            fields.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
    Value::Object(fields)
}

/// Query pairs as an object of strings. On duplicate keys the last
/// occurrence wins.
fn query_pairs(parts: &Parts) -> Value {
    let mut fields = Map::new();
    if let Ok(Query(pairs)) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri) {
        for (key, value) in pairs {
            fields.insert(key, Value::String(value));
        }
    }
    Value::Object(fields)
}
