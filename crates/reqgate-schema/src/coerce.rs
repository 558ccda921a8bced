//! String coercion.
//!
//! Route parameters and query pairs reach the validator as strings. With
//! `convert` enabled, string instances are re-typed to the declared
//! `number` / `integer` / `boolean` before checking, recursively through
//! `properties` and `items`. A string that does not parse is left alone so
//! the engine reports the type violation.

use serde_json::{Map, Number, Value};

/// Produce a copy of `value` with schema-guided string coercion applied.
pub(crate) fn coerce(value: &Value, schema: &Value) -> Value {
    let Value::Object(rules) = schema else {
        return value.clone();
    };

    match value {
        Value::String(text) => {
            for target in declared_types(rules) {
                if let Some(coerced) = coerce_scalar(text, target) {
                    return coerced;
                }
            }
            value.clone()
        }
        Value::Object(fields) => {
            let Some(Value::Object(props)) = rules.get("properties") else {
                return value.clone();
            };
            let mut out = Map::new();
            for (key, field) in fields {
                let coerced = match props.get(key) {
                    Some(child) => coerce(field, child),
                    None => field.clone(),
                };
                out.insert(key.clone(), coerced);
            }
            Value::Object(out)
        }
        Value::Array(items) => match rules.get("items") {
            Some(child) => Value::Array(items.iter().map(|v| coerce(v, child)).collect()),
            None => value.clone(),
        },
        _ => value.clone(),
    }
}

/// Declared scalar types, in declaration order. `"type"` may be a single
/// name or a list of alternatives.
fn declared_types(rules: &Map<String, Value>) -> Vec<&str> {
    match rules.get("type") {
        Some(Value::String(name)) => vec![name.as_str()],
        Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn coerce_scalar(text: &str, target: &str) -> Option<Value> {
    match target {
        "integer" => text.parse::<i64>().ok().map(|n| Value::Number(n.into())),
        "number" => {
            if let Ok(n) = text.parse::<i64>() {
                return Some(Value::Number(n.into()));
            }
            text.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
        }
        "boolean" => match text {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}
