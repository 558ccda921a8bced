//! # reqgate-schema — JSON Schema Checking Engine
//!
//! The stock implementation of reqgate's constraint-checking capability,
//! backed by the `jsonschema` crate (Draft 2020-12 by default).
//!
//! The orchestration core hands this crate a value, a declared schema, and
//! the effective validation configuration; this crate answers with zero or
//! more structured error items. Three pieces of configuration-driven
//! tuning sit between the declared schema and the engine:
//!
//! - **Preparation** — the unknown-field policy (`allow_unknown`) and the
//!   default presence (`presence: required`) are expressed by rewriting
//!   the declared schema before compilation. Purely functional and
//!   deterministic: the same declaration and configuration always produce
//!   the same prepared schema.
//! - **Coercion** — with `convert` enabled, string inputs are coerced to
//!   the schema-declared `number`/`integer`/`boolean` before checking.
//!   Route parameters and query pairs always arrive as strings.
//! - **Dialect selection** — the `draft` key of the engine bag picks the
//!   JSON Schema dialect (`"draft-07"`, `"2019-09"`, `"2020-12"`).
//!
//! Compiled validators are cached by digest of the prepared schema, so a
//! route's schema is compiled once and shared across requests.

mod coerce;
mod prepare;
mod report;
mod validate;

pub use validate::JsonSchemaChecker;
