//! The `jsonschema`-backed checking engine.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use jsonschema::Validator;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use reqgate_core::{CheckerError, ConstraintChecker, ErrorItem, ValidationConfig};

use crate::coerce::coerce;
use crate::prepare::prepare_schema;
use crate::report::to_error_item;

/// Recognized values of the engine bag's `draft` key, normalized.
const DRAFT_7: &str = "draft-07";
const DRAFT_2019: &str = "2019-09";
const DRAFT_2020: &str = "2020-12";

/// Constraint checker backed by the `jsonschema` crate.
///
/// Compiled validators are cached by SHA-256 digest of the prepared schema
/// and the selected dialect, so each distinct (schema, configuration) pair
/// compiles once and is shared across requests. The cache is insert-only
/// and bounded by the number of registered schemas.
///
/// ## Thread Safety
///
/// `JsonSchemaChecker` is `Send + Sync`; one instance can back every
/// registered checker in an application.
#[derive(Default)]
pub struct JsonSchemaChecker {
    validators: RwLock<HashMap<String, Arc<Validator>>>,
}

impl std::fmt::Debug for JsonSchemaChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSchemaChecker")
            .field("cached_validators", &self.cached_validators())
            .finish()
    }
}

impl JsonSchemaChecker {
    /// A checker with an empty validator cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct compiled validators currently cached.
    pub fn cached_validators(&self) -> usize {
        self.validators
            .read()
            .expect("validator cache lock poisoned")
            .len()
    }

    /// Fetch or compile the validator for a prepared schema.
    fn validator_for(
        &self,
        prepared: &Value,
        draft: &'static str,
    ) -> Result<Arc<Validator>, CheckerError> {
        let serialized =
            serde_json::to_string(prepared).map_err(|e| CheckerError::Engine(e.to_string()))?;
        let key = cache_key(draft, &serialized);

        if let Some(validator) = self
            .validators
            .read()
            .expect("validator cache lock poisoned")
            .get(&key)
        {
            return Ok(Arc::clone(validator));
        }

        tracing::debug!(draft, "compiling schema validator");
        let validator = Arc::new(build_validator(prepared, draft)?);
        let mut cache = self
            .validators
            .write()
            .expect("validator cache lock poisoned");
        let entry = cache.entry(key).or_insert_with(|| Arc::clone(&validator));
        Ok(Arc::clone(entry))
    }
}

impl ConstraintChecker for JsonSchemaChecker {
    fn check(
        &self,
        value: &Value,
        schema: &Value,
        config: &ValidationConfig,
    ) -> Result<Vec<ErrorItem>, CheckerError> {
        let draft = draft_token(&config.engine_options)?;
        let prepared = prepare_schema(schema, config);
        let validator = self.validator_for(&prepared, draft)?;

        let instance = if config.convert {
            coerce(value, &prepared)
        } else {
            value.clone()
        };

        Ok(validator.iter_errors(&instance).map(to_error_item).collect())
    }

    fn compile(&self, schema: &Value, config: &ValidationConfig) -> Result<(), CheckerError> {
        let draft = draft_token(&config.engine_options)?;
        let prepared = prepare_schema(schema, config);
        self.validator_for(&prepared, draft).map(|_| ())
    }
}

/// Resolve the engine bag's `draft` key to a normalized dialect token.
/// Unrecognized options other than `draft` pass through untouched.
fn draft_token(engine_options: &Map<String, Value>) -> Result<&'static str, CheckerError> {
    match engine_options.get("draft") {
        None => Ok(DRAFT_2020),
        Some(Value::String(name)) => match name.as_str() {
            "7" | "draft7" | DRAFT_7 => Ok(DRAFT_7),
            "draft2019-09" | DRAFT_2019 => Ok(DRAFT_2019),
            "draft2020-12" | DRAFT_2020 => Ok(DRAFT_2020),
            other => Err(CheckerError::Engine(format!(
                "unrecognized draft \"{other}\" (expected \"draft-07\", \"2019-09\", or \"2020-12\")"
            ))),
        },
        Some(other) => Err(CheckerError::Engine(format!(
            "draft option must be a string, got {other}"
        ))),
    }
}

fn build_validator(schema: &Value, draft: &'static str) -> Result<Validator, CheckerError> {
    let dialect = match draft {
        DRAFT_7 => jsonschema::Draft::Draft7,
        DRAFT_2019 => jsonschema::Draft::Draft201909,
        _ => jsonschema::Draft::Draft202012,
    };

    jsonschema::options()
        .with_draft(dialect)
        .build(schema)
        .map_err(|e| CheckerError::InvalidSchema(e.to_string()))
}

fn cache_key(draft: &str, serialized_schema: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(draft.as_bytes());
    hasher.update(b"\0");
    hasher.update(serialized_schema.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqgate_core::{ConfigOverride, Presence};
    use serde_json::json;

    fn config(overrides: ConfigOverride) -> ValidationConfig {
        ValidationConfig::default().merged(&overrides)
    }

    fn user_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "username": {"type": "string", "minLength": 4, "maxLength": 10},
                "password": {"type": "string", "minLength": 3, "maxLength": 15}
            },
            "required": ["username"]
        })
    }

    #[test]
    fn test_valid_value_produces_no_items() {
        let engine = JsonSchemaChecker::new();
        let items = engine
            .check(
                &json!({"username": "abcde"}),
                &user_schema(),
                &ValidationConfig::default(),
            )
            .unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_missing_required_field_maps_to_any_required() {
        let engine = JsonSchemaChecker::new();
        let items = engine
            .check(&json!({}), &user_schema(), &ValidationConfig::default())
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, "any.required");
        assert_eq!(items[0].path, "username");
        assert!(items[0].message.contains("required"));
    }

    #[test]
    fn test_short_string_maps_to_string_min() {
        let engine = JsonSchemaChecker::new();
        let items = engine
            .check(
                &json!({"username": "a"}),
                &user_schema(),
                &ValidationConfig::default(),
            )
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, "string.min");
        assert_eq!(items[0].path, "username");
    }

    #[test]
    fn test_nested_violation_reports_dotted_path() {
        let engine = JsonSchemaChecker::new();
        let schema = json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "object",
                    "properties": {"city": {"type": "string", "minLength": 2}}
                }
            }
        });
        let items = engine
            .check(
                &json!({"address": {"city": "x"}}),
                &schema,
                &ValidationConfig::default(),
            )
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].path, "address.city");
    }

    #[test]
    fn test_unknown_field_rejected_by_default() {
        let engine = JsonSchemaChecker::new();
        let items = engine
            .check(
                &json!({"username": "abcde", "extra": 1}),
                &user_schema(),
                &ValidationConfig::default(),
            )
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, "object.unknown");
    }

    #[test]
    fn test_allow_unknown_tolerates_undeclared_fields() {
        let engine = JsonSchemaChecker::new();
        let items = engine
            .check(
                &json!({"username": "abcde", "extra": 1}),
                &user_schema(),
                &config(ConfigOverride::new().allow_unknown(true)),
            )
            .unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_convert_coerces_string_inputs() {
        let engine = JsonSchemaChecker::new();
        let schema = json!({
            "type": "object",
            "properties": {"page": {"type": "integer", "minimum": 1}}
        });
        let items = engine
            .check(&json!({"page": "3"}), &schema, &ValidationConfig::default())
            .unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_convert_off_reports_type_violation() {
        let engine = JsonSchemaChecker::new();
        let schema = json!({
            "type": "object",
            "properties": {"page": {"type": "integer"}}
        });
        let items = engine
            .check(
                &json!({"page": "3"}),
                &schema,
                &config(ConfigOverride::new().convert(false)),
            )
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, "any.type");
        assert_eq!(items[0].path, "page");
    }

    #[test]
    fn test_presence_required_requires_every_declared_field() {
        let engine = JsonSchemaChecker::new();
        let items = engine
            .check(
                &json!({}),
                &user_schema(),
                &config(ConfigOverride::new().presence(Presence::Required)),
            )
            .unwrap();
        let mut paths: Vec<&str> = items.iter().map(|i| i.path.as_str()).collect();
        paths.sort_unstable();
        assert_eq!(paths, ["password", "username"]);
        assert!(items.iter().all(|i| i.kind == "any.required"));
    }

    #[test]
    fn test_checking_is_deterministic() {
        let engine = JsonSchemaChecker::new();
        let value = json!({"username": "a", "password": "x"});
        let first = engine
            .check(&value, &user_schema(), &ValidationConfig::default())
            .unwrap();
        let second = engine
            .check(&value, &user_schema(), &ValidationConfig::default())
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unusable_schema_fails_compile() {
        let engine = JsonSchemaChecker::new();
        let err = engine
            .compile(&json!({"type": "nonsense"}), &ValidationConfig::default())
            .unwrap_err();
        assert!(matches!(err, CheckerError::InvalidSchema(_)));
    }

    #[test]
    fn test_validators_are_cached_per_schema_and_config() {
        let engine = JsonSchemaChecker::new();
        let base = ValidationConfig::default();

        engine.check(&json!({}), &user_schema(), &base).unwrap();
        engine
            .check(&json!({"username": "abcd"}), &user_schema(), &base)
            .unwrap();
        assert_eq!(engine.cached_validators(), 1);

        // A different unknown-field policy prepares a different schema.
        engine
            .check(
                &json!({}),
                &user_schema(),
                &config(ConfigOverride::new().allow_unknown(true)),
            )
            .unwrap();
        assert_eq!(engine.cached_validators(), 2);
    }

    #[test]
    fn test_draft_selection_from_engine_bag() {
        let engine = JsonSchemaChecker::new();
        let draft7 = config(ConfigOverride::new().engine_option("draft", json!("draft-07")));
        engine
            .compile(&user_schema(), &draft7)
            .expect("draft-07 compile should succeed");

        let bad = config(ConfigOverride::new().engine_option("draft", json!("draft-05")));
        let err = engine.compile(&user_schema(), &bad).unwrap_err();
        assert!(matches!(err, CheckerError::Engine(_)));
    }

    #[test]
    fn test_unrecognized_engine_options_are_ignored() {
        let engine = JsonSchemaChecker::new();
        let cfg = config(
            ConfigOverride::new().engine_option("language", json!({"any": {"required": "!"}})),
        );
        let items = engine
            .check(&json!({"username": "abcde"}), &user_schema(), &cfg)
            .unwrap();
        assert!(items.is_empty());
    }
}
