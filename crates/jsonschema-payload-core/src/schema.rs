//! Compiled schema model.
//!
//! [`compile`] turns a resolved JSON Schema (`serde_json::Value`) into a tree of
//! [`SchemaNode`]s. Compilation parses every keyword the engine understands
//! exactly once (type tags, formats, regexes, bounds) so that the validator and
//! the example generator only ever walk typed data.
//!
//! # Permissive constructs
//!
//! - `oneOf` / `anyOf` / `allOf` / `not` are kept as [`Composition`] branches
//!   for example generation and field lookup, but are never validated.
//! - A string `$ref` left in the tree compiles to a node that accepts anything.
//! - An unrecognised `type` tag compiles to [`SchemaType::Unknown`], which
//!   accepts any value.
//!
//! Everything else that cannot be interpreted is a [`SchemaError`].

use std::cmp::Ordering;
use std::fmt;

use regex::Regex;
use serde_json::{json, Map, Number, Value};

use crate::error::SchemaError;
use crate::format::Format;
use crate::path::build_path;

// ---------------------------------------------------------------------------
// Schema types
// ---------------------------------------------------------------------------

/// The `type` discriminator of a schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaType {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Null,
    /// A tag outside the closed set. Fails soft: every value matches.
    Unknown(String),
}

impl SchemaType {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "object" => SchemaType::Object,
            "array" => SchemaType::Array,
            "string" => SchemaType::String,
            "number" => SchemaType::Number,
            "integer" => SchemaType::Integer,
            "boolean" => SchemaType::Boolean,
            "null" => SchemaType::Null,
            other => SchemaType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Null => "null",
            SchemaType::Unknown(tag) => tag.as_str(),
        }
    }

    /// Whether a payload value has this runtime type.
    ///
    /// `integer` only accepts numbers without a fractional part; `number`
    /// accepts every number.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            SchemaType::Object => value.is_object(),
            SchemaType::Array => value.is_array(),
            SchemaType::String => value.is_string(),
            SchemaType::Number => value.is_number(),
            SchemaType::Integer => is_integral(value),
            SchemaType::Boolean => value.is_boolean(),
            SchemaType::Null => value.is_null(),
            SchemaType::Unknown(_) => true,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_integral(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        _ => false,
    }
}

/// Runtime type name of a payload value, as reported in `received`.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) if is_integral(value) => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Keyword payloads
// ---------------------------------------------------------------------------

/// A compiled `pattern` keyword.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(source)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A numeric bound (`minimum`/`maximum`, optionally exclusive).
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub limit: Number,
    pub exclusive: bool,
}

impl Bound {
    pub fn as_f64(&self) -> f64 {
        self.limit.as_f64().unwrap_or(0.0)
    }

    /// `true` when `value` is below this bound used as a lower limit.
    pub fn rejects_below(&self, value: &Number) -> bool {
        match compare_numbers(value, &self.limit) {
            Ordering::Less => true,
            Ordering::Equal => self.exclusive,
            Ordering::Greater => false,
        }
    }

    /// `true` when `value` is above this bound used as an upper limit.
    pub fn rejects_above(&self, value: &Number) -> bool {
        match compare_numbers(value, &self.limit) {
            Ordering::Greater => true,
            Ordering::Equal => self.exclusive,
            Ordering::Less => false,
        }
    }
}

/// Compare two JSON numbers, staying in integer space when both sides allow it.
fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }
    let x = a.as_f64().unwrap_or(f64::NAN);
    let y = b.as_f64().unwrap_or(f64::NAN);
    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
}

/// Compile a `pattern`. Look-around and backreferences are valid ECMA-262
/// but outside the `regex` dialect; such patterns are not enforced.
fn compile_pattern(source: &str, path: &str) -> Result<Option<Pattern>, SchemaError> {
    match Pattern::new(source) {
        Ok(pattern) => Ok(Some(pattern)),
        Err(_) if uses_unsupported_syntax(source) => {
            tracing::debug!(path, pattern = source, "pattern uses look-around or backreferences, not enforced");
            Ok(None)
        }
        Err(e) => Err(SchemaError::InvalidPattern {
            path: path.to_string(),
            pattern: source.to_string(),
            message: e.to_string(),
        }),
    }
}

fn uses_unsupported_syntax(source: &str) -> bool {
    use regex_syntax::ast::{parse::Parser, ErrorKind};

    match Parser::new().parse(source) {
        Ok(_) => false,
        Err(e) => matches!(
            e.kind(),
            ErrorKind::UnsupportedLookAround | ErrorKind::UnsupportedBackreference
        ),
    }
}

/// JSON equality where numbers compare by value, so `1.0` equals `1`.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Ordering::Equal,
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

/// `additionalProperties` when it constrains anything.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    /// `additionalProperties: false`.
    Forbidden,
    /// `additionalProperties: { ... }`.
    Schema(Box<SchemaNode>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionKind {
    AllOf,
    AnyOf,
    OneOf,
    Not,
}

impl CompositionKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            CompositionKind::AllOf => "allOf",
            CompositionKind::AnyOf => "anyOf",
            CompositionKind::OneOf => "oneOf",
            CompositionKind::Not => "not",
        }
    }
}

/// A combinator and the branches that compiled successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub kind: CompositionKind,
    pub branches: Vec<SchemaNode>,
}

// ---------------------------------------------------------------------------
// SchemaNode
// ---------------------------------------------------------------------------

/// One compiled node of a resolved schema.
///
/// The default value is the empty schema, which accepts anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaNode {
    pub schema_type: Option<SchemaType>,
    /// `nullable: true` or a `[T, "null"]` type union.
    pub nullable: bool,
    pub format: Option<Format>,
    pub pattern: Option<Pattern>,
    pub enum_values: Option<Vec<Value>>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub minimum: Option<Bound>,
    pub maximum: Option<Bound>,
    pub required: Vec<String>,
    /// Declaration order is preserved.
    pub properties: Vec<(String, SchemaNode)>,
    pub items: Option<Box<SchemaNode>>,
    pub additional_properties: Option<AdditionalProperties>,
    pub description: Option<String>,
    pub deprecated: bool,
    pub compositions: Vec<Composition>,
    /// Unresolved `$ref`; the node accepts anything.
    pub reference: Option<String>,
}

/// Compile a resolved JSON Schema into a [`SchemaNode`] tree.
pub fn compile(schema: &Value) -> Result<SchemaNode, SchemaError> {
    SchemaNode::compile(schema, "#")
}

impl SchemaNode {
    /// Compile the schema node found at JSON Pointer `path`.
    pub fn compile(value: &Value, path: &str) -> Result<Self, SchemaError> {
        let obj = match value {
            Value::Object(obj) => obj,
            // `true` / `false` schemas: `false` is not enforced (documented gap).
            Value::Bool(_) => return Ok(Self::default()),
            other => {
                return Err(SchemaError::NotASchema {
                    path: path.to_string(),
                    found: json_type_name(other).to_string(),
                })
            }
        };

        let mut node = SchemaNode::default();

        if let Some(reference) = obj.get("$ref") {
            let Some(reference) = reference.as_str() else {
                return Err(SchemaError::MalformedReference {
                    path: path.to_string(),
                });
            };
            tracing::debug!(path, reference, "unresolved $ref accepted permissively");
            node.reference = Some(reference.to_string());
            return Ok(node);
        }

        compile_type(obj, path, &mut node)?;
        if obj.get("nullable").and_then(Value::as_bool) == Some(true) {
            node.nullable = true;
        }

        node.format = optional_str(obj, "format", path)?.map(Format::parse);
        node.pattern = match optional_str(obj, "pattern", path)? {
            Some(source) => compile_pattern(source, path)?,
            None => None,
        };

        node.enum_values = match obj.get("enum") {
            None => None,
            Some(Value::Array(values)) => Some(values.clone()),
            Some(_) => return Err(SchemaError::invalid_keyword(path, "enum", "an array")),
        };

        node.min_length = optional_length(obj, "minLength", path)?;
        node.max_length = optional_length(obj, "maxLength", path)?;
        node.minimum = optional_bound(obj, "minimum", "exclusiveMinimum", path)?;
        node.maximum = optional_bound(obj, "maximum", "exclusiveMaximum", path)?;

        node.required = match obj.get("required") {
            None => Vec::new(),
            Some(Value::Array(names)) => names
                .iter()
                .map(|name| {
                    name.as_str().map(str::to_string).ok_or_else(|| {
                        SchemaError::invalid_keyword(path, "required", "an array of strings")
                    })
                })
                .collect::<Result<_, _>>()?,
            // Property-level `required: true` (Swagger 2 / draft 3 dialect).
            Some(Value::Bool(_)) => {
                tracing::debug!(path, "legacy boolean 'required' ignored");
                Vec::new()
            }
            Some(_) => {
                return Err(SchemaError::invalid_keyword(
                    path,
                    "required",
                    "an array of strings",
                ))
            }
        };

        match obj.get("properties") {
            None => {}
            Some(Value::Object(props)) => {
                for (name, child) in props {
                    let child_path = build_path(path, &["properties", name]);
                    node.properties
                        .push((name.clone(), SchemaNode::compile(child, &child_path)?));
                }
            }
            Some(_) => return Err(SchemaError::invalid_keyword(path, "properties", "an object")),
        }

        node.items = match obj.get("items") {
            None => None,
            Some(items @ (Value::Object(_) | Value::Bool(_))) => Some(Box::new(
                SchemaNode::compile(items, &build_path(path, &["items"]))?,
            )),
            // Tuple-form `items` is outside the supported subset.
            Some(Value::Array(_)) => {
                tracing::debug!(path, "tuple-form items accepted permissively");
                None
            }
            Some(_) => {
                return Err(SchemaError::invalid_keyword(
                    path,
                    "items",
                    "a schema object or boolean",
                ))
            }
        };

        node.additional_properties = match obj.get("additionalProperties") {
            None | Some(Value::Bool(true)) => None,
            Some(Value::Bool(false)) => Some(AdditionalProperties::Forbidden),
            Some(schema @ Value::Object(_)) => Some(AdditionalProperties::Schema(Box::new(
                SchemaNode::compile(schema, &build_path(path, &["additionalProperties"]))?,
            ))),
            Some(_) => {
                return Err(SchemaError::invalid_keyword(
                    path,
                    "additionalProperties",
                    "a boolean or a schema object",
                ))
            }
        };

        node.description = obj
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);
        node.deprecated = obj.get("deprecated").and_then(Value::as_bool) == Some(true);
        node.compositions = compile_compositions(obj, path);

        Ok(node)
    }

    /// Declared property by name.
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, node)| node)
    }

    /// Declared property by name, falling back to combinator branches.
    pub fn find_property(&self, name: &str) -> Option<&SchemaNode> {
        self.property(name).or_else(|| {
            self.compositions
                .iter()
                .filter(|c| c.kind != CompositionKind::Not)
                .flat_map(|c| c.branches.iter())
                .find_map(|branch| branch.find_property(name))
        })
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// The type this node describes: the declared tag, or one inferred from
    /// the keywords present when `type` is absent or unknown.
    pub fn effective_type(&self) -> Option<SchemaType> {
        match &self.schema_type {
            Some(SchemaType::Unknown(_)) | None => {}
            Some(known) => return Some(known.clone()),
        }
        if !self.properties.is_empty()
            || !self.required.is_empty()
            || self.additional_properties.is_some()
        {
            Some(SchemaType::Object)
        } else if self.items.is_some() {
            Some(SchemaType::Array)
        } else if self.pattern.is_some()
            || self.format.is_some()
            || self.min_length.is_some()
            || self.max_length.is_some()
        {
            Some(SchemaType::String)
        } else if self.minimum.is_some() || self.maximum.is_some() {
            Some(SchemaType::Number)
        } else {
            None
        }
    }

    /// Render the node back into JSON Schema form.
    ///
    /// Used for field introspection output; keys appear in a fixed order.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        if let Some(reference) = &self.reference {
            out.insert("$ref".to_string(), json!(reference));
            return Value::Object(out);
        }
        if let Some(t) = &self.schema_type {
            out.insert("type".to_string(), json!(t.as_str()));
        }
        if self.nullable {
            out.insert("nullable".to_string(), json!(true));
        }
        if let Some(description) = &self.description {
            out.insert("description".to_string(), json!(description));
        }
        if let Some(format) = &self.format {
            out.insert("format".to_string(), json!(format.name()));
        }
        if let Some(pattern) = &self.pattern {
            out.insert("pattern".to_string(), json!(pattern.source()));
        }
        if let Some(values) = &self.enum_values {
            out.insert("enum".to_string(), Value::Array(values.clone()));
        }
        if let Some(n) = self.min_length {
            out.insert("minLength".to_string(), json!(n));
        }
        if let Some(n) = self.max_length {
            out.insert("maxLength".to_string(), json!(n));
        }
        for (bound, inclusive_kw, exclusive_kw) in [
            (&self.minimum, "minimum", "exclusiveMinimum"),
            (&self.maximum, "maximum", "exclusiveMaximum"),
        ] {
            if let Some(bound) = bound {
                let keyword = if bound.exclusive { exclusive_kw } else { inclusive_kw };
                out.insert(keyword.to_string(), Value::Number(bound.limit.clone()));
            }
        }
        if !self.required.is_empty() {
            out.insert("required".to_string(), json!(self.required));
        }
        if !self.properties.is_empty() {
            let props: Map<String, Value> = self
                .properties
                .iter()
                .map(|(name, node)| (name.clone(), node.to_value()))
                .collect();
            out.insert("properties".to_string(), Value::Object(props));
        }
        if let Some(items) = &self.items {
            out.insert("items".to_string(), items.to_value());
        }
        match &self.additional_properties {
            Some(AdditionalProperties::Forbidden) => {
                out.insert("additionalProperties".to_string(), json!(false));
            }
            Some(AdditionalProperties::Schema(schema)) => {
                out.insert("additionalProperties".to_string(), schema.to_value());
            }
            None => {}
        }
        if self.deprecated {
            out.insert("deprecated".to_string(), json!(true));
        }
        for composition in &self.compositions {
            let branches: Vec<Value> = composition.branches.iter().map(SchemaNode::to_value).collect();
            let value = match (composition.kind, branches.as_slice()) {
                (CompositionKind::Not, [single]) => single.clone(),
                _ => Value::Array(branches),
            };
            out.insert(composition.kind.keyword().to_string(), value);
        }
        Value::Object(out)
    }
}

// ---------------------------------------------------------------------------
// Keyword helpers
// ---------------------------------------------------------------------------

fn compile_type(obj: &Map<String, Value>, path: &str, node: &mut SchemaNode) -> Result<(), SchemaError> {
    match obj.get("type") {
        None => {}
        Some(Value::String(tag)) => node.schema_type = Some(SchemaType::parse(tag)),
        Some(Value::Array(tags)) => {
            let mut concrete = Vec::new();
            for tag in tags {
                let tag = tag.as_str().ok_or_else(|| {
                    SchemaError::invalid_keyword(path, "type", "a string or an array of strings")
                })?;
                match SchemaType::parse(tag) {
                    SchemaType::Null => node.nullable = true,
                    other => concrete.push(other),
                }
            }
            node.schema_type = match concrete.len() {
                0 if node.nullable => Some(SchemaType::Null),
                0 => None,
                1 => concrete.pop(),
                // Multi-type unions fall outside the closed set.
                _ => Some(SchemaType::Unknown(
                    concrete.iter().map(SchemaType::as_str).collect::<Vec<_>>().join("|"),
                )),
            };
        }
        Some(_) => {
            return Err(SchemaError::invalid_keyword(
                path,
                "type",
                "a string or an array of strings",
            ))
        }
    }
    Ok(())
}

fn optional_str<'v>(
    obj: &'v Map<String, Value>,
    keyword: &str,
    path: &str,
) -> Result<Option<&'v str>, SchemaError> {
    match obj.get(keyword) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(SchemaError::invalid_keyword(path, keyword, "a string")),
    }
}

fn optional_length(
    obj: &Map<String, Value>,
    keyword: &str,
    path: &str,
) -> Result<Option<u64>, SchemaError> {
    let Some(value) = obj.get(keyword) else {
        return Ok(None);
    };
    if let Some(n) = value.as_u64() {
        return Ok(Some(n));
    }
    // Integral floats such as `3.0` are accepted.
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(Some(f as u64)),
        _ => Err(SchemaError::invalid_keyword(
            path,
            keyword,
            "a non-negative integer",
        )),
    }
}

/// Read an inclusive bound and its exclusive companion.
///
/// A numeric `exclusiveMinimum` (draft 6+) takes precedence; a boolean one
/// (draft 4 / OpenAPI 3.0) marks the inclusive bound as exclusive.
fn optional_bound(
    obj: &Map<String, Value>,
    inclusive: &str,
    exclusive: &str,
    path: &str,
) -> Result<Option<Bound>, SchemaError> {
    let limit = match obj.get(inclusive) {
        None => None,
        Some(Value::Number(n)) => Some(n.clone()),
        Some(_) => return Err(SchemaError::invalid_keyword(path, inclusive, "a number")),
    };
    match obj.get(exclusive) {
        Some(Value::Number(n)) => Ok(Some(Bound {
            limit: n.clone(),
            exclusive: true,
        })),
        Some(Value::Bool(flag)) => Ok(limit.map(|limit| Bound {
            limit,
            exclusive: *flag,
        })),
        None => Ok(limit.map(|limit| Bound {
            limit,
            exclusive: false,
        })),
        Some(_) => Err(SchemaError::invalid_keyword(
            path,
            exclusive,
            "a number or a boolean",
        )),
    }
}

/// Compile combinator branches. Branches that fail to compile are dropped:
/// combinators are never validated, so a broken branch cannot affect results.
fn compile_compositions(obj: &Map<String, Value>, path: &str) -> Vec<Composition> {
    let mut compositions = Vec::new();

    for kind in [CompositionKind::AllOf, CompositionKind::AnyOf, CompositionKind::OneOf] {
        let keyword = kind.keyword();
        let Some(value) = obj.get(keyword) else {
            continue;
        };
        let Some(variants) = value.as_array() else {
            tracing::debug!(path, keyword, "non-array combinator ignored");
            continue;
        };
        let branches = variants
            .iter()
            .enumerate()
            .filter_map(|(i, variant)| {
                let branch_path = build_path(path, &[keyword, &i.to_string()]);
                SchemaNode::compile(variant, &branch_path)
                    .map_err(|e| tracing::debug!(path = %branch_path, error = %e, "combinator branch dropped"))
                    .ok()
            })
            .collect();
        compositions.push(Composition { kind, branches });
    }

    if let Some(negated) = obj.get("not") {
        let branch_path = build_path(path, &["not"]);
        let branches = SchemaNode::compile(negated, &branch_path)
            .map(|node| vec![node])
            .unwrap_or_default();
        compositions.push(Composition {
            kind: CompositionKind::Not,
            branches,
        });
    }

    compositions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn compiles_object_in_declaration_order() {
        let node = compile(&json!({
            "type": "object",
            "required": ["zeta", "alpha"],
            "properties": {
                "zeta": { "type": "string" },
                "alpha": { "type": "integer" },
                "mid": { "type": "boolean" }
            }
        }))
        .unwrap();

        let names: Vec<&str> = node.properties.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(node.required, vec!["zeta", "alpha"]);
    }

    #[test]
    fn integer_rejects_fractions_but_accepts_integral_floats() {
        assert!(SchemaType::Integer.matches(&json!(3)));
        assert!(SchemaType::Integer.matches(&json!(3.0)));
        assert!(!SchemaType::Integer.matches(&json!(3.5)));
        assert!(SchemaType::Number.matches(&json!(3.5)));
        assert_eq!(json_type_name(&json!(3.5)), "number");
        assert_eq!(json_type_name(&json!(-7)), "integer");
    }

    #[test]
    fn unknown_type_tag_matches_everything() {
        let node = compile(&json!({ "type": "file" })).unwrap();
        assert_eq!(node.schema_type, Some(SchemaType::Unknown("file".to_string())));
        assert!(SchemaType::Unknown("file".to_string()).matches(&json!({"any": "thing"})));
    }

    #[test]
    fn nullable_forms() {
        let node = compile(&json!({ "type": ["string", "null"] })).unwrap();
        assert_eq!(node.schema_type, Some(SchemaType::String));
        assert!(node.nullable);

        let node = compile(&json!({ "type": "string", "nullable": true })).unwrap();
        assert!(node.nullable);
    }

    #[test]
    fn look_around_patterns_are_not_enforced() {
        let node = compile(&json!({ "type": "string", "pattern": r"^(?!000)\d{3}-\d{2}-\d{4}$" })).unwrap();
        assert_eq!(node.pattern, None);
        let node = compile(&json!({ "type": "string", "pattern": r"^(a)\1$" })).unwrap();
        assert_eq!(node.pattern, None);

        let err = compile(&json!({ "type": "string", "pattern": "[unclosed" })).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPattern { .. }));
    }

    #[test]
    fn numeric_equality_ignores_representation() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!([1, { "a": 2.0 }]), &json!([1.0, { "a": 2 }])));
        assert!(!values_equal(&json!(1), &json!("1")));
    }

    #[test]
    fn exclusive_bounds() {
        let node = compile(&json!({ "type": "number", "exclusiveMinimum": 0, "maximum": 10, "exclusiveMaximum": true })).unwrap();
        let min = node.minimum.unwrap();
        let max = node.maximum.unwrap();
        assert!(min.exclusive && min.rejects_below(&Number::from(0)));
        assert!(max.exclusive && max.rejects_above(&Number::from(10)));
        assert!(!max.rejects_above(&Number::from(9)));
    }

    #[test]
    fn string_ref_is_permissive() {
        let node = compile(&json!({ "$ref": "#/components/schemas/Pet" })).unwrap();
        assert_eq!(node.reference.as_deref(), Some("#/components/schemas/Pet"));
    }

    #[test]
    fn malformed_keywords_fail() {
        let cases = [
            json!({ "$ref": 42 }),
            json!({ "type": 42 }),
            json!({ "properties": "a_string" }),
            json!({ "required": "name" }),
            json!({ "enum": "active" }),
            json!({ "minLength": -1 }),
            json!({ "maximum": "10" }),
            json!({ "pattern": "([a-z" }),
            json!({ "items": 7 }),
            json!("not a schema"),
        ];
        for case in cases {
            assert!(compile(&case).is_err(), "expected compile error for {case}");
        }
    }

    #[test]
    fn nested_error_reports_pointer() {
        let err = compile(&json!({
            "properties": { "a/b": { "pattern": "(" } }
        }))
        .unwrap_err();
        assert_eq!(err.path(), "#/properties/a~1b");
    }

    #[test]
    fn broken_combinator_branch_is_dropped() {
        let node = compile(&json!({
            "oneOf": [ { "type": 5 }, { "type": "string" } ]
        }))
        .unwrap();
        assert_eq!(node.compositions.len(), 1);
        assert_eq!(node.compositions[0].branches.len(), 1);
    }

    #[test]
    fn effective_type_is_inferred() {
        let node = compile(&json!({ "properties": { "a": {} } })).unwrap();
        assert_eq!(node.effective_type(), Some(SchemaType::Object));
        let node = compile(&json!({ "format": "email" })).unwrap();
        assert_eq!(node.effective_type(), Some(SchemaType::String));
        assert_eq!(compile(&json!({})).unwrap().effective_type(), None);
    }

    #[test]
    fn to_value_round_trips_supported_keywords() {
        let schema = json!({
            "type": "object",
            "description": "A user",
            "required": ["email"],
            "properties": {
                "email": { "type": "string", "format": "email", "maxLength": 64 },
                "age": { "type": "integer", "minimum": 0 }
            },
            "additionalProperties": false
        });
        assert_eq!(compile(&schema).unwrap().to_value(), schema);
    }
}
