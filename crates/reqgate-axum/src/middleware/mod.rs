//! # Middleware
//!
//! Two `from_fn`-style middleware functions:
//!
//! - [`body_reader::body_reader_middleware`] — the body-reading
//!   collaborator; buffers and parses the request body into the
//!   [`body_reader::JsonBody`] extension.
//! - [`validate::validate_middleware`] — assembles the request data views
//!   and enforces a registered checker.
//!
//! The body reader must run before the validator on routes that declare a
//! body schema (added after it, since axum runs the last-added layer
//! first).

pub mod body_reader;
pub mod validate;
