//! # jsonschema-payload-core
//!
//! Validate JSON payloads against resolved JSON Schemas with field-level,
//! fix-suggestion-bearing errors, and synthesize example payloads from the
//! same schemas.
//!
//! The schema is compiled once into a [`SchemaNode`] tree. Validation collects
//! every violation in one pass; example generation always terminates.
//!
//! ```
//! use jsonschema_payload_core::{validate, ErrorKind};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "required": ["email"],
//!     "properties": { "email": { "type": "string", "format": "email" } }
//! });
//!
//! let result = validate(&json!({}), &schema);
//! assert!(!result.valid);
//! assert_eq!(result.errors[0].kind, ErrorKind::Required);
//! assert_eq!(result.errors[0].field, "email");
//! ```

pub mod config;
pub mod error;
pub mod example;
pub mod format;
pub mod path;
pub mod provider;
pub mod report;
pub mod schema;
pub mod suggest;
pub mod validator;

pub use config::{ExampleOptions, ValidateOptions};
pub use error::SchemaError;
pub use example::generate_example;
pub use path::{build_path, get_field_schema, FieldLookup, FieldPath, Segment, UnresolvedReason};
pub use provider::{BodyTarget, EndpointRef, OpenApiDocument, SchemaLookup, SchemaProvider};
pub use report::{ErrorKind, ValidationError, ValidationResult, ValidationWarning, WarningKind};
pub use schema::{compile, SchemaNode, SchemaType};
pub use suggest::fix_suggestion;
pub use validator::Validator;

use serde_json::Value;

/// Validate `payload` against a resolved `schema` with default options.
///
/// A schema that cannot be compiled is reported as a single `custom` error on
/// the `schema` field rather than as an `Err`.
pub fn validate(payload: &Value, schema: &Value) -> ValidationResult {
    validate_with_options(payload, schema, &ValidateOptions::default())
}

/// [`validate`] with explicit options.
pub fn validate_with_options(
    payload: &Value,
    schema: &Value,
    options: &ValidateOptions,
) -> ValidationResult {
    match compile(schema) {
        Ok(node) => Validator::with_options(node, options.clone()).validate(payload),
        Err(err) => {
            tracing::debug!(error = %err, "schema compilation failed");
            ValidationResult::schema_error(&err)
        }
    }
}
