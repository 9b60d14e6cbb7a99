//! Validation outcome types: errors, warnings and the aggregate result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

/// Field label used for errors and warnings that concern the payload root.
pub const ROOT_FIELD: &str = "(root)";

/// Field label of the single error produced for an uncompilable schema.
pub const SCHEMA_FIELD: &str = "schema";

/// Classification of a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Required,
    Type,
    Format,
    Pattern,
    Enum,
    MinLength,
    MaxLength,
    Minimum,
    Maximum,
    /// Not tied to a schema keyword (e.g. the schema itself is malformed).
    Custom,
}

impl ErrorKind {
    /// Keyword spelling, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Required => "required",
            ErrorKind::Type => "type",
            ErrorKind::Format => "format",
            ErrorKind::Pattern => "pattern",
            ErrorKind::Enum => "enum",
            ErrorKind::MinLength => "minLength",
            ErrorKind::MaxLength => "maxLength",
            ErrorKind::Minimum => "minimum",
            ErrorKind::Maximum => "maximum",
            ErrorKind::Custom => "custom",
        }
    }
}

/// A single constraint violation located in the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Dot path of the offending field (e.g. "data.attributes.ssn").
    pub field: String,
    /// JSON Pointer of the offending field (e.g. "/data/attributes/ssn").
    pub path: String,
    pub message: String,
    pub kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_suggestion: Option<String>,
}

/// Classification of validation warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// An optional field the schema describes as recommended is absent.
    Optional,
    /// The payload carries a field the schema does not declare.
    BestPractice,
    /// The payload uses a field marked `deprecated`.
    Deprecated,
}

/// Advisory finding that does not make the payload invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub field: String,
    pub kind: WarningKind,
    pub suggestion: String,
}

/// Everything a validation pass found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ValidationWarning>,
    pub summary: String,
}

impl ValidationResult {
    pub fn new(errors: Vec<ValidationError>, warnings: Vec<ValidationWarning>) -> Self {
        let summary = summarize(errors.len());
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
            summary,
        }
    }

    /// The result reported when the schema cannot be compiled: exactly one
    /// `custom` error on the `schema` field.
    pub fn schema_error(err: &SchemaError) -> Self {
        let error = ValidationError {
            field: SCHEMA_FIELD.to_string(),
            path: String::new(),
            message: format!("Schema could not be compiled: {err}"),
            kind: ErrorKind::Custom,
            expected: None,
            received: Some(Value::String(err.path().to_string())),
            fix_suggestion: None,
        };
        Self::new(vec![error], Vec::new())
    }
}

fn summarize(error_count: usize) -> String {
    if error_count == 0 {
        "Payload is valid".to_string()
    } else {
        format!("Found {error_count} validation error(s)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_kind_serializes_as_keyword() {
        for kind in [
            ErrorKind::Required,
            ErrorKind::MinLength,
            ErrorKind::MaxLength,
            ErrorKind::Custom,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
    }

    #[test]
    fn test_result_serializes_camel_case_and_omits_empty_warnings() {
        let result = ValidationResult::new(
            vec![ValidationError {
                field: "email".to_string(),
                path: "/email".to_string(),
                message: "Missing required field 'email'".to_string(),
                kind: ErrorKind::Required,
                expected: None,
                received: None,
                fix_suggestion: Some("Add the required field `email` to the payload".to_string()),
            }],
            Vec::new(),
        );

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["valid"], json!(false));
        assert_eq!(value["summary"], json!("Found 1 validation error(s)"));
        assert_eq!(value["errors"][0]["kind"], json!("required"));
        assert!(value["errors"][0].get("fixSuggestion").is_some());
        assert!(value.get("warnings").is_none());

        let back: ValidationResult = serde_json::from_value(value).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_warning_kind_is_kebab_case() {
        assert_eq!(
            serde_json::to_value(WarningKind::BestPractice).unwrap(),
            json!("best-practice")
        );
    }

    #[test]
    fn test_schema_error_collapses_to_single_custom_error() {
        let err = SchemaError::MalformedReference {
            path: "#/properties/a".to_string(),
        };
        let result = ValidationResult::schema_error(&err);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, SCHEMA_FIELD);
        assert_eq!(result.errors[0].kind, ErrorKind::Custom);
    }

    #[test]
    fn test_valid_summary() {
        let result = ValidationResult::new(Vec::new(), Vec::new());
        assert!(result.valid);
        assert_eq!(result.summary, "Payload is valid");
    }
}
