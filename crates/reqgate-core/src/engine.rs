//! # Checking Capability
//!
//! The seam between the orchestrator and the constraint-checking engine.
//! The core never interprets schemas; it hands each source's value, the
//! registered schema, and the effective configuration to this trait and
//! consumes the returned error items.

use serde_json::Value;

use crate::config::ValidationConfig;
use crate::error::{CheckerError, ErrorItem};

/// Constraint-checking capability.
///
/// [`check`] returns one [`ErrorItem`] per violated constraint; an empty
/// vector means the value was accepted. Implementations must be
/// deterministic: checking the same value against the same schema and
/// configuration twice yields the same items in the same order.
///
/// [`check`]: ConstraintChecker::check
pub trait ConstraintChecker: Send + Sync {
    /// Validate `value` against `schema` under `config`.
    fn check(
        &self,
        value: &Value,
        schema: &Value,
        config: &ValidationConfig,
    ) -> Result<Vec<ErrorItem>, CheckerError>;

    /// Registration-time hook: reject schemas the engine cannot use.
    ///
    /// The default accepts everything. Engines that compile schemas should
    /// surface compilation failures here so that a misdeclared route fails
    /// at setup rather than on its first request.
    fn compile(&self, schema: &Value, config: &ValidationConfig) -> Result<(), CheckerError> {
        let _ = (schema, config);
        Ok(())
    }
}
