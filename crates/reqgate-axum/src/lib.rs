//! # reqgate-axum — Request Validation Middleware for axum
//!
//! Runs a registered reqgate [`Checker`] in front of a route's handler.
//! On acceptance the handler runs with the request untouched; on rejection
//! the formatted error payload is emitted with status 400 and the handler
//! never runs.
//!
//! ## Wiring
//!
//! ```ignore
//! let gate = Gate::new(Arc::new(JsonSchemaChecker::new()));
//! let create_user = gate.register(RuleSet::new().body(json!({
//!     "type": "object",
//!     "properties": {"username": {"type": "string", "minLength": 4}},
//!     "required": ["username"]
//! })))?;
//!
//! let app = Router::new()
//!     .route("/users", post(handler))
//!     .route_layer(middleware::from_fn_with_state(create_user, validate_middleware))
//!     .route_layer(middleware::from_fn(body_reader_middleware));
//! ```
//!
//! Layer ordering matters: axum runs the last-added layer first, so the
//! body reader is added *after* the validator. Routes without a body
//! schema do not need the body reader; routes with one that omit it get a
//! distinct `BODY_NOT_READ` fault (500) instead of a validation result,
//! because that is an integration bug, not bad request data.
//!
//! [`Checker`]: reqgate_core::Checker

pub mod error;
pub mod middleware;

pub use error::GuardError;
pub use middleware::body_reader::{body_reader_middleware, JsonBody, DEFAULT_BODY_LIMIT};
pub use middleware::validate::validate_middleware;
