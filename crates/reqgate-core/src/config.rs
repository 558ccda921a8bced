//! # Validation Configuration
//!
//! The effective configuration applied to one validation pass, and the
//! partial override layered on top of it.
//!
//! A base [`ValidationConfig`] is built once when the gate is constructed
//! (optionally from a setup-time [`ConfigOverride`]); each registration
//! layers the declaration's own override on top of that base. Resolution
//! is a pure field-by-field merge: override wins, unset fields fall back.
//! Neither input is mutated.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::format::{DefaultFormatter, ErrorFormatter};

/// Default requiredness applied to fields the schema does not mark
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// Declared fields are optional unless the schema requires them.
    Optional,
    /// Every declared field is required unless the schema says otherwise.
    Required,
}

/// The effective validation configuration for one registered checker.
///
/// Captured by the checker at registration time and reused for every
/// invocation; it is never re-resolved per request.
#[derive(Clone)]
pub struct ValidationConfig {
    /// Stop checking further sources after the first source with errors.
    pub abort_early: bool,
    /// Allow the engine to coerce string inputs to the declared type.
    pub convert: bool,
    /// Tolerate fields the schema does not declare.
    pub allow_unknown: bool,
    /// Default requiredness for declared fields.
    pub presence: Presence,
    /// Produces the rejection payload from the error aggregate.
    pub formatter: Arc<dyn ErrorFormatter>,
    /// Engine-specific tuning, passed through unvalidated.
    pub engine_options: Map<String, Value>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            abort_early: false,
            convert: true,
            allow_unknown: false,
            presence: Presence::Optional,
            formatter: Arc::new(DefaultFormatter),
            engine_options: Map::new(),
        }
    }
}

impl fmt::Debug for ValidationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationConfig")
            .field("abort_early", &self.abort_early)
            .field("convert", &self.convert)
            .field("allow_unknown", &self.allow_unknown)
            .field("presence", &self.presence)
            .field("formatter", &"<dyn ErrorFormatter>")
            .field("engine_options", &self.engine_options)
            .finish()
    }
}

impl ValidationConfig {
    /// Layer `overrides` on top of `self`, field by field.
    ///
    /// Pure: neither input is mutated. Engine bags merge key-by-key with
    /// the override winning on collision.
    pub fn merged(&self, overrides: &ConfigOverride) -> ValidationConfig {
        let mut engine_options = self.engine_options.clone();
        for (key, value) in &overrides.engine_options {
            engine_options.insert(key.clone(), value.clone());
        }

        ValidationConfig {
            abort_early: overrides.abort_early.unwrap_or(self.abort_early),
            convert: overrides.convert.unwrap_or(self.convert),
            allow_unknown: overrides.allow_unknown.unwrap_or(self.allow_unknown),
            presence: overrides.presence.unwrap_or(self.presence),
            formatter: overrides
                .formatter
                .clone()
                .unwrap_or_else(|| Arc::clone(&self.formatter)),
            engine_options,
        }
    }
}

/// Partial configuration override.
///
/// Deserializes from the wire-format option names (`abortEarly`,
/// `allowUnknown`, `convert`, `presence`). Keys that are not recognized
/// options collect into the engine bag and pass through unvalidated. The
/// formatter is a runtime capability and is never deserialized; file-loaded
/// declarations keep the base formatter unless code installs one.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigOverride {
    /// Overrides [`ValidationConfig::abort_early`].
    pub abort_early: Option<bool>,
    /// Overrides [`ValidationConfig::convert`].
    pub convert: Option<bool>,
    /// Overrides [`ValidationConfig::allow_unknown`].
    pub allow_unknown: Option<bool>,
    /// Overrides [`ValidationConfig::presence`].
    pub presence: Option<Presence>,
    /// Overrides [`ValidationConfig::formatter`].
    #[serde(skip)]
    pub formatter: Option<Arc<dyn ErrorFormatter>>,
    /// Extra keys merged into [`ValidationConfig::engine_options`].
    #[serde(flatten)]
    pub engine_options: Map<String, Value>,
}

impl ConfigOverride {
    /// An override that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the abort-early flag.
    pub fn abort_early(mut self, value: bool) -> Self {
        self.abort_early = Some(value);
        self
    }

    /// Set the coercion flag.
    pub fn convert(mut self, value: bool) -> Self {
        self.convert = Some(value);
        self
    }

    /// Set the unknown-field policy.
    pub fn allow_unknown(mut self, value: bool) -> Self {
        self.allow_unknown = Some(value);
        self
    }

    /// Set the default presence.
    pub fn presence(mut self, value: Presence) -> Self {
        self.presence = Some(value);
        self
    }

    /// Install a custom rejection-payload formatter.
    pub fn formatter(mut self, formatter: impl ErrorFormatter + 'static) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Add one engine-specific option.
    pub fn engine_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.engine_options.insert(key.into(), value);
        self
    }
}

impl fmt::Debug for ConfigOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOverride")
            .field("abort_early", &self.abort_early)
            .field("convert", &self.convert)
            .field("allow_unknown", &self.allow_unknown)
            .field("presence", &self.presence)
            .field("formatter", &self.formatter.as_ref().map(|_| "<custom>"))
            .field("engine_options", &self.engine_options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorItem;
    use serde_json::json;

    #[test]
    fn defaults_match_documented_values() {
        let config = ValidationConfig::default();
        assert!(!config.abort_early);
        assert!(config.convert);
        assert!(!config.allow_unknown);
        assert_eq!(config.presence, Presence::Optional);
        assert!(config.engine_options.is_empty());
    }

    #[test]
    fn merged_takes_override_values() {
        let base = ValidationConfig::default();
        let overrides = ConfigOverride::new()
            .abort_early(true)
            .convert(false)
            .allow_unknown(true)
            .presence(Presence::Required);
        let effective = base.merged(&overrides);
        assert!(effective.abort_early);
        assert!(!effective.convert);
        assert!(effective.allow_unknown);
        assert_eq!(effective.presence, Presence::Required);
    }

    #[test]
    fn merged_falls_back_to_base_for_unset_fields() {
        let base = ValidationConfig {
            abort_early: true,
            ..ValidationConfig::default()
        };
        let effective = base.merged(&ConfigOverride::new().convert(false));
        assert!(effective.abort_early);
        assert!(!effective.convert);
        assert_eq!(effective.presence, Presence::Optional);
    }

    #[test]
    fn merged_does_not_mutate_base() {
        let base = ValidationConfig::default();
        let _ = base.merged(&ConfigOverride::new().abort_early(true));
        assert!(!base.abort_early);
    }

    #[test]
    fn engine_bags_merge_with_override_winning() {
        let mut base = ValidationConfig::default();
        base.engine_options.insert("draft".to_string(), json!("draft-07"));
        base.engine_options.insert("kept".to_string(), json!(1));

        let overrides = ConfigOverride::new().engine_option("draft", json!("2020-12"));
        let effective = base.merged(&overrides);
        assert_eq!(effective.engine_options["draft"], json!("2020-12"));
        assert_eq!(effective.engine_options["kept"], json!(1));
        // Base bag untouched.
        assert_eq!(base.engine_options["draft"], json!("draft-07"));
    }

    #[test]
    fn override_deserializes_wire_names() {
        let overrides: ConfigOverride = serde_json::from_value(json!({
            "abortEarly": true,
            "allowUnknown": true,
            "presence": "required"
        }))
        .unwrap();
        assert_eq!(overrides.abort_early, Some(true));
        assert_eq!(overrides.allow_unknown, Some(true));
        assert_eq!(overrides.presence, Some(Presence::Required));
        assert!(overrides.formatter.is_none());
    }

    #[test]
    fn unrecognized_override_keys_pass_through_to_engine_bag() {
        let overrides: ConfigOverride = serde_json::from_value(json!({
            "abortEarly": true,
            "language": {"any": {"required": "!!missing"}}
        }))
        .unwrap();
        assert_eq!(overrides.abort_early, Some(true));
        assert_eq!(
            overrides.engine_options["language"],
            json!({"any": {"required": "!!missing"}})
        );
    }

    #[test]
    fn custom_formatter_survives_merge() {
        struct Flat;
        impl ErrorFormatter for Flat {
            fn format(&self, errors: &[ErrorItem]) -> Value {
                json!(errors.len())
            }
        }

        let effective =
            ValidationConfig::default().merged(&ConfigOverride::new().formatter(Flat));
        assert_eq!(effective.formatter.format(&[]), json!(0));
    }
}
