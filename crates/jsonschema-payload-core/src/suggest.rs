//! Fix suggestions for validation errors.
//!
//! [`fix_suggestion`] is a pure function of the error kind, the violated
//! constraint value and the field name, so callers can produce the same hint
//! for errors they construct themselves.

use serde_json::Value;

use crate::format::{recognize_pattern, Format};
use crate::report::ErrorKind;

/// Human-readable fix for a violated constraint.
///
/// `constraint` carries the schema-side value of the violated keyword: the
/// expected type or format name, the regex source, the enum list, or the
/// numeric bound. Returns `None` when no useful hint exists (`custom` errors,
/// or a constraint value of the wrong shape).
///
/// # Example
/// ```
/// use jsonschema_payload_core::{fix_suggestion, ErrorKind};
/// use serde_json::json;
///
/// let hint = fix_suggestion(ErrorKind::Format, &json!("ssn"), "ssn").unwrap();
/// assert!(hint.contains("XXX-XX-XXXX"));
/// ```
pub fn fix_suggestion(kind: ErrorKind, constraint: &Value, field: &str) -> Option<String> {
    match kind {
        ErrorKind::Required => Some(format!("Add the required field `{field}` to the payload")),
        ErrorKind::Type => constraint.as_str().map(type_hint),
        ErrorKind::Format => constraint.as_str().map(|name| format_hint(&Format::parse(name))),
        ErrorKind::Pattern => constraint.as_str().map(pattern_hint),
        ErrorKind::Enum => constraint
            .as_array()
            .map(|values| format!("Use one of the allowed values: {}", join_values(values))),
        ErrorKind::MinLength | ErrorKind::MaxLength | ErrorKind::Minimum | ErrorKind::Maximum => {
            bound_hint(kind, constraint, false)
        }
        ErrorKind::Custom => None,
    }
}

/// Hint for a length or numeric bound; `exclusive` switches to strict wording.
pub(crate) fn bound_hint(kind: ErrorKind, limit: &Value, exclusive: bool) -> Option<String> {
    let Value::Number(limit) = limit else {
        return None;
    };
    let hint = match (kind, exclusive) {
        (ErrorKind::MinLength, _) => format!("Value must be at least {limit} characters long"),
        (ErrorKind::MaxLength, _) => format!("Value must be at most {limit} characters long"),
        (ErrorKind::Minimum, false) => format!("Value must be at least {limit}"),
        (ErrorKind::Minimum, true) => format!("Value must be greater than {limit}"),
        (ErrorKind::Maximum, false) => format!("Value must be at most {limit}"),
        (ErrorKind::Maximum, true) => format!("Value must be less than {limit}"),
        _ => return None,
    };
    Some(hint)
}

/// Render values for a message: strings bare, everything else as JSON.
pub(crate) fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn type_hint(expected: &str) -> String {
    let sample = match expected {
        "string" => "\"text\"",
        "integer" => "42",
        "number" => "42.5",
        "boolean" => "true",
        "array" => "[]",
        "object" => "{}",
        "null" => "null",
        _ => return format!("Provide a value of type {expected}"),
    };
    format!("Provide a value of type {expected}, e.g. {sample}")
}

fn format_hint(format: &Format) -> String {
    match (format.template(), format.example()) {
        (Some(template), Some(example)) => format!("Use the format {template}, e.g. {example}"),
        (_, Some(example)) => format!("Use a valid {}, e.g. {example}", format.noun()),
        _ => format!("Use a valid {} value", format.noun()),
    }
}

fn pattern_hint(source: &str) -> String {
    match recognize_pattern(source) {
        Some(format) => format_hint(&format),
        None => format!("Value must match pattern: `{source}`"),
    }
}
