#![deny(missing_docs)]

//! # reqgate-core — Validation Orchestration
//!
//! The engine- and framework-agnostic core of reqgate. Given a declarative
//! schema for a route, it decides which request data sources to check,
//! checks them in a fixed order against an effective configuration, and
//! either accepts the request or produces a formatted rejection payload.
//!
//! This crate does not interpret constraint schemas itself. The checking
//! engine is an external capability behind [`ConstraintChecker`]; the stock
//! implementation lives in `reqgate-schema`.
//!
//! ## Shape
//!
//! 1. **[`Gate`]** — built once at application startup with the engine and
//!    an optional configuration override. No ambient mutable state: the
//!    gate is an explicit value, immutable after construction.
//! 2. **Registration** — [`Gate::register`] classifies a declaration
//!    (per-source schemas or one combined schema), resolves the effective
//!    configuration, compiles every schema through the engine, and returns
//!    a reusable [`Checker`].
//! 3. **Invocation** — [`Checker::check`] reads one request's
//!    [`RequestData`], checks registered sources in params → query → body
//!    order with abort-early gating, aggregates error items, and formats
//!    the aggregate through the configured [`ErrorFormatter`] on failure.
//!
//! ```ignore
//! let gate = Gate::new(engine);
//! let checker = gate.register(
//!     RuleSet::new().body(json!({
//!         "type": "object",
//!         "properties": {"username": {"type": "string", "minLength": 4}},
//!         "required": ["username"]
//!     })),
//! )?;
//!
//! match checker.check(&data) {
//!     Ok(()) => { /* hand the request to the inner service */ }
//!     Err(Rejection::Invalid(payload)) => { /* emit 400 with payload */ }
//!     Err(fault) => { /* integration fault: 500, log loudly */ }
//! }
//! ```

pub mod checker;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod rules;

pub use checker::{Checker, Gate, RequestData};
pub use config::{ConfigOverride, Presence, ValidationConfig};
pub use engine::ConstraintChecker;
pub use error::{CheckerError, ErrorItem, RegisterError, Rejection};
pub use format::{
    DefaultFormatter, ErrorFormatter, ErrorReport, VALIDATION_ERROR_CODE,
    VALIDATION_ERROR_MESSAGE,
};
pub use rules::{Declaration, RuleSet, Source};
