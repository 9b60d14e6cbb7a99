//! Payload validation against a compiled schema.
//!
//! The validator is a tree walker over [`SchemaNode`]. It never stops at the
//! first violation: every independent problem in the payload is reported in a
//! single pass, in schema declaration order.
//!
//! Per node, checks run in this order:
//! 1. unresolved `$ref` / `null` on a nullable node: accept
//! 2. `type`: a mismatch is reported once and masks the remaining checks
//! 3. `enum`
//! 4. string keywords (`format`, `pattern`, `minLength`, `maxLength`)
//! 5. numeric bounds
//! 6. object keywords (`required`, `properties`, `additionalProperties`)
//! 7. array `items`

use serde_json::{json, Map, Value};

use crate::config::ValidateOptions;
use crate::format::recognize_pattern;
use crate::path::{FieldPath, Segment};
use crate::report::{
    ErrorKind, ValidationError, ValidationResult, ValidationWarning, WarningKind, ROOT_FIELD,
};
use crate::schema::{json_type_name, values_equal, AdditionalProperties, Bound, SchemaNode};
use crate::suggest::{bound_hint, fix_suggestion, join_values};

/// Description markers that turn an absent optional field into a warning.
const RECOMMENDATION_MARKERS: &[&str] = &["recommended", "should"];

/// A compiled schema ready to validate any number of payloads.
#[derive(Debug, Clone)]
pub struct Validator {
    schema: SchemaNode,
    options: ValidateOptions,
}

impl Validator {
    pub fn new(schema: SchemaNode) -> Self {
        Self::with_options(schema, ValidateOptions::default())
    }

    pub fn with_options(schema: SchemaNode, options: ValidateOptions) -> Self {
        Self { schema, options }
    }

    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    /// Validate one payload, collecting every violation.
    pub fn validate(&self, payload: &Value) -> ValidationResult {
        let mut walk = Walk {
            max_depth: self.options.max_depth,
            errors: Vec::new(),
            warnings: Vec::new(),
        };
        let mut path = FieldPath::root();
        walk.check(&self.schema, payload, &mut path, 0);

        tracing::debug!(
            errors = walk.errors.len(),
            warnings = walk.warnings.len(),
            "validation finished"
        );
        ValidationResult::new(walk.errors, walk.warnings)
    }
}

// ---------------------------------------------------------------------------
// Walk
// ---------------------------------------------------------------------------

struct Walk {
    max_depth: usize,
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

fn field_label(path: &FieldPath) -> String {
    if path.is_root() {
        ROOT_FIELD.to_string()
    } else {
        path.to_dot()
    }
}

impl Walk {
    fn check(&mut self, node: &SchemaNode, value: &Value, path: &mut FieldPath, depth: usize) {
        if depth > self.max_depth {
            tracing::warn!(path = %path, max_depth = self.max_depth, "validation depth exceeded, subtree skipped");
            return;
        }
        if node.reference.is_some() {
            return;
        }
        if value.is_null() && node.nullable {
            return;
        }

        if let Some(expected) = &node.schema_type {
            if !expected.matches(value) {
                let received = json_type_name(value);
                let constraint = json!(expected.as_str());
                self.error(
                    path,
                    ErrorKind::Type,
                    format!("Expected {expected} but received {received}"),
                    Some(constraint),
                    Some(json!(received)),
                );
                return;
            }
        }

        if let Some(allowed) = &node.enum_values {
            if !allowed.iter().any(|candidate| values_equal(candidate, value)) {
                self.error(
                    path,
                    ErrorKind::Enum,
                    format!("Value must be one of: {}", join_values(allowed)),
                    Some(Value::Array(allowed.clone())),
                    Some(value.clone()),
                );
            }
        }

        match value {
            Value::String(s) => self.check_string(node, s, path),
            Value::Number(_) => self.check_number(node, value, path),
            Value::Object(obj) => self.check_object(node, obj, path, depth),
            Value::Array(items) => {
                if let Some(item_schema) = node.items.as_deref() {
                    for (i, item) in items.iter().enumerate() {
                        path.push(Segment::Index(i));
                        self.check(item_schema, item, path, depth + 1);
                        path.pop();
                    }
                }
            }
            Value::Bool(_) | Value::Null => {}
        }
    }

    fn check_string(&mut self, node: &SchemaNode, s: &str, path: &FieldPath) {
        if let Some(format) = &node.format {
            if !format.check(s) {
                self.error(
                    path,
                    ErrorKind::Format,
                    format!("Value {s:?} is not a valid {}", format.noun()),
                    Some(json!(format.name())),
                    Some(json!(s)),
                );
            }
        }

        if let Some(pattern) = &node.pattern {
            if !pattern.is_match(s) {
                let message = match recognize_pattern(pattern.source()) {
                    Some(format) => format!("Value {s:?} is not a valid {}", format.noun()),
                    None => format!("Value {s:?} does not match pattern {:?}", pattern.source()),
                };
                self.error(
                    path,
                    ErrorKind::Pattern,
                    message,
                    Some(json!(pattern.source())),
                    Some(json!(s)),
                );
            }
        }

        let length = s.chars().count() as u64;
        if let Some(min) = node.min_length {
            if length < min {
                self.error(
                    path,
                    ErrorKind::MinLength,
                    format!("String length {length} is less than minimum length {min}"),
                    Some(json!(min)),
                    Some(json!(s)),
                );
            }
        }
        if let Some(max) = node.max_length {
            if length > max {
                self.error(
                    path,
                    ErrorKind::MaxLength,
                    format!("String length {length} exceeds maximum length {max}"),
                    Some(json!(max)),
                    Some(json!(s)),
                );
            }
        }
    }

    fn check_number(&mut self, node: &SchemaNode, value: &Value, path: &FieldPath) {
        let Value::Number(n) = value else {
            return;
        };
        if let Some(bound) = &node.minimum {
            if bound.rejects_below(n) {
                let message = if bound.exclusive {
                    format!("Value {n} is not greater than exclusive minimum {}", bound.limit)
                } else {
                    format!("Value {n} is less than minimum {}", bound.limit)
                };
                self.bound_error(path, ErrorKind::Minimum, bound, message, value);
            }
        }
        if let Some(bound) = &node.maximum {
            if bound.rejects_above(n) {
                let message = if bound.exclusive {
                    format!("Value {n} is not less than exclusive maximum {}", bound.limit)
                } else {
                    format!("Value {n} exceeds maximum {}", bound.limit)
                };
                self.bound_error(path, ErrorKind::Maximum, bound, message, value);
            }
        }
    }

    fn check_object(
        &mut self,
        node: &SchemaNode,
        obj: &Map<String, Value>,
        path: &mut FieldPath,
        depth: usize,
    ) {
        for name in &node.required {
            if !obj.contains_key(name) {
                path.push(Segment::Name(name.clone()));
                self.error(
                    path,
                    ErrorKind::Required,
                    format!("Missing required field '{name}'"),
                    None,
                    None,
                );
                path.pop();
            }
        }

        for (name, child) in &node.properties {
            path.push(Segment::Name(name.clone()));
            match obj.get(name) {
                Some(value) => {
                    if child.deprecated {
                        self.warning(
                            path,
                            WarningKind::Deprecated,
                            format!("Field '{name}' is deprecated and may be removed in a future version"),
                        );
                    }
                    self.check(child, value, path, depth + 1);
                }
                None if !node.is_required(name) => {
                    if let Some(description) = recommendation(child) {
                        self.warning(
                            path,
                            WarningKind::Optional,
                            format!("Consider providing '{name}': {description}"),
                        );
                    }
                }
                None => {}
            }
            path.pop();
        }

        let Some(additional) = &node.additional_properties else {
            return;
        };
        for (key, value) in obj {
            if node.property(key).is_some() {
                continue;
            }
            path.push(Segment::Name(key.clone()));
            match additional {
                AdditionalProperties::Forbidden => self.warning(
                    path,
                    WarningKind::BestPractice,
                    format!("Field '{key}' is not declared in the schema; remove it or check its spelling"),
                ),
                AdditionalProperties::Schema(schema) => self.check(schema, value, path, depth + 1),
            }
            path.pop();
        }
    }

    fn bound_error(
        &mut self,
        path: &FieldPath,
        kind: ErrorKind,
        bound: &Bound,
        message: String,
        received: &Value,
    ) {
        let limit = Value::Number(bound.limit.clone());
        self.errors.push(ValidationError {
            field: field_label(path),
            path: path.to_pointer(),
            message,
            kind,
            fix_suggestion: bound_hint(kind, &limit, bound.exclusive),
            expected: Some(limit),
            received: Some(received.clone()),
        });
    }

    fn error(
        &mut self,
        path: &FieldPath,
        kind: ErrorKind,
        message: String,
        expected: Option<Value>,
        received: Option<Value>,
    ) {
        let field = field_label(path);
        let subject = match (kind, path.segments().last()) {
            (ErrorKind::Required, Some(Segment::Name(name))) => name.as_str(),
            _ => field.as_str(),
        };
        let fix = fix_suggestion(kind, expected.as_ref().unwrap_or(&Value::Null), subject);
        self.errors.push(ValidationError {
            field,
            path: path.to_pointer(),
            message,
            kind,
            expected,
            received,
            fix_suggestion: fix,
        });
    }

    fn warning(&mut self, path: &FieldPath, kind: WarningKind, suggestion: String) {
        self.warnings.push(ValidationWarning {
            field: field_label(path),
            kind,
            suggestion,
        });
    }
}

/// The description of an optional property, when it recommends providing it.
fn recommendation(node: &SchemaNode) -> Option<&str> {
    let description = node.description.as_deref()?;
    let lower = description.to_lowercase();
    RECOMMENDATION_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
        .then_some(description)
}
