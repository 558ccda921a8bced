//! Engine error → wire error item mapping.
//!
//! The engine reports violations with JSON Pointer locations and a typed
//! kind; the wire format wants dotted paths and dotted constraint codes.
//! Missing-property violations point at the object that lacks the
//! property, so the missing name is appended to the path.

use jsonschema::error::ValidationErrorKind;
use jsonschema::ValidationError;

use reqgate_core::ErrorItem;

/// Convert one engine violation into a wire error item.
pub(crate) fn to_error_item(error: ValidationError<'_>) -> ErrorItem {
    let message = error.to_string();
    let base = dotted(&error.instance_path.to_string());

    let (code, path) = match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = property
                .as_str()
                .map(ToString::to_string)
                .unwrap_or_else(|| property.to_string());
            let path = if base.is_empty() {
                name
            } else {
                format!("{base}.{name}")
            };
            ("any.required", path)
        }
        other => (constraint_code(other), base),
    };

    ErrorItem::new(message, code, path)
}

/// Dotted rendering of a JSON Pointer: `/address/city` → `address.city`.
/// Pointer escapes are unescaped per segment.
fn dotted(pointer: &str) -> String {
    pointer
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}

/// Stable dotted code for each violation kind. Kinds without a dedicated
/// code fall back to `any.invalid`.
fn constraint_code(kind: &ValidationErrorKind) -> &'static str {
    match kind {
        ValidationErrorKind::Required { .. } => "any.required",
        ValidationErrorKind::Type { .. } => "any.type",
        ValidationErrorKind::Enum { .. } | ValidationErrorKind::Constant { .. } => "any.only",
        ValidationErrorKind::MinLength { .. } => "string.min",
        ValidationErrorKind::MaxLength { .. } => "string.max",
        ValidationErrorKind::Pattern { .. } => "string.pattern",
        ValidationErrorKind::Format { .. } => "string.format",
        ValidationErrorKind::Minimum { .. } => "number.min",
        ValidationErrorKind::Maximum { .. } => "number.max",
        ValidationErrorKind::ExclusiveMinimum { .. } => "number.greater",
        ValidationErrorKind::ExclusiveMaximum { .. } => "number.less",
        ValidationErrorKind::MultipleOf { .. } => "number.multiple",
        ValidationErrorKind::MinItems { .. } => "array.min",
        ValidationErrorKind::MaxItems { .. } => "array.max",
        ValidationErrorKind::UniqueItems { .. } => "array.unique",
        ValidationErrorKind::Contains { .. } => "array.contains",
        ValidationErrorKind::MinProperties { .. } => "object.min",
        ValidationErrorKind::MaxProperties { .. } => "object.max",
        ValidationErrorKind::AdditionalProperties { .. }
        | ValidationErrorKind::UnevaluatedProperties { .. } => "object.unknown",
        _ => "any.invalid",
    }
}
