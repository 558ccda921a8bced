//! Schema preparation.
//!
//! Rewrites a declared schema according to the effective configuration
//! before it reaches the engine:
//!
//! - `allow_unknown = false` — object schemas that do not state an
//!   `additionalProperties` policy get `additionalProperties: false`, so
//!   undeclared fields are violations.
//! - `allow_unknown = true` — an explicit `additionalProperties: false`
//!   is relaxed to `true`; the unknown-field policy overrides the schema
//!   author's strictness in both directions.
//! - `presence = required` — every declared property is added to the
//!   object schema's `required` list unless already present.
//!
//! The rewrite recurses through the standard applicator keywords so nested
//! object schemas get the same treatment.

use serde_json::{Map, Value};

use reqgate_core::{Presence, ValidationConfig};

/// Produce the tuned schema for `config`. The input is never mutated.
pub(crate) fn prepare_schema(schema: &Value, config: &ValidationConfig) -> Value {
    let mut prepared = schema.clone();
    apply(&mut prepared, config);
    prepared
}

fn apply(node: &mut Value, config: &ValidationConfig) {
    let Value::Object(fields) = node else {
        return;
    };

    if fields.contains_key("properties") {
        if config.presence == Presence::Required {
            let declared: Vec<String> = fields["properties"]
                .as_object()
                .map(|props| props.keys().cloned().collect())
                .unwrap_or_default();
            let required = fields
                .entry("required")
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(list) = required {
                for name in declared {
                    if !list.iter().any(|v| v.as_str() == Some(name.as_str())) {
                        list.push(Value::String(name));
                    }
                }
            }
        }

        if config.allow_unknown {
            if fields.get("additionalProperties") == Some(&Value::Bool(false)) {
                fields.insert("additionalProperties".to_string(), Value::Bool(true));
            }
        } else if !fields.contains_key("additionalProperties") {
            fields.insert("additionalProperties".to_string(), Value::Bool(false));
        }
    }

    recurse(fields, config);
}

fn recurse(fields: &mut Map<String, Value>, config: &ValidationConfig) {
    for key in ["properties", "$defs", "definitions", "patternProperties"] {
        if let Some(Value::Object(children)) = fields.get_mut(key) {
            for child in children.values_mut() {
                apply(child, config);
            }
        }
    }
    for key in ["items", "additionalProperties", "contains", "not", "propertyNames"] {
        if let Some(child) = fields.get_mut(key) {
            apply(child, config);
        }
    }
    for key in ["allOf", "anyOf", "oneOf", "prefixItems"] {
        if let Some(Value::Array(children)) = fields.get_mut(key) {
            for child in children.iter_mut() {
                apply(child, config);
            }
        }
    }
}
