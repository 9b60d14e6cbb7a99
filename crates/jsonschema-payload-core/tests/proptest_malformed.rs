//! Negative tests for malformed JSON Schemas.
//!
//! `validate()` must **never panic** on a malformed schema. Keywords of the
//! wrong JSON type collapse into exactly one `custom` error on the `schema`
//! field; combinator keywords of the wrong shape are ignored because
//! combinators are never validated.

use jsonschema_payload_core::{compile, generate_example, validate, ErrorKind, ExampleOptions};
use proptest::prelude::*;
use serde_json::json;

fn assert_single_schema_error(schema: serde_json::Value) {
    let result = validate(&json!({ "name": "x" }), &schema);
    assert!(!result.valid, "expected malformed schema to fail: {schema}");
    assert_eq!(result.errors.len(), 1, "errors: {:?}", result.errors);
    assert_eq!(result.errors[0].field, "schema");
    assert_eq!(result.errors[0].kind, ErrorKind::Custom);
    assert!(!result.errors[0].message.is_empty());
}

// ===========================================================================
// 1. Deterministic negative tests: known malformed schemas
// ===========================================================================

#[test]
fn malformed_required_as_string() {
    assert_single_schema_error(json!({
        "type": "object",
        "properties": { "name": { "type": "string" } },
        "required": "not_an_array"
    }));
}

#[test]
fn malformed_properties_as_array() {
    assert_single_schema_error(json!({ "type": "object", "properties": ["a", "b"] }));
}

#[test]
fn malformed_type_as_number() {
    assert_single_schema_error(json!({ "type": 42 }));
}

#[test]
fn malformed_enum_as_string() {
    assert_single_schema_error(json!({ "enum": "active" }));
}

#[test]
fn malformed_bound_as_string() {
    assert_single_schema_error(json!({ "type": "integer", "minimum": "0" }));
}

#[test]
fn malformed_format_as_number() {
    assert_single_schema_error(json!({ "type": "string", "format": 7 }));
}

#[test]
fn uncompilable_pattern() {
    assert_single_schema_error(json!({ "type": "string", "pattern": "[unclosed" }));
}

#[test]
fn ref_as_number() {
    assert_single_schema_error(json!({ "$ref": 42 }));
}

#[test]
fn schema_is_not_an_object() {
    assert_single_schema_error(json!("just a string"));
    assert_single_schema_error(json!([1, 2, 3]));
}

#[test]
fn deeply_nested_malformed_keyword() {
    assert_single_schema_error(json!({
        "type": "object",
        "properties": {
            "level1": {
                "type": "object",
                "properties": {
                    "level2": {
                        "type": "object",
                        "properties": { "level3": { "required": 42 } }
                    }
                }
            }
        }
    }));
}

#[test]
fn malformed_combinators_are_ignored() {
    let result = validate(
        &json!("anything"),
        &json!({ "anyOf": { "not": "an_array" }, "oneOf": true }),
    );
    assert!(result.valid);
}

#[test]
fn boolean_schemas_are_accepted() {
    assert!(validate(&json!(1), &json!(true)).valid);
    assert!(validate(&json!({ "a": 1 }), &json!({ "properties": { "a": true } })).valid);
}

// ===========================================================================
// 2. Property-based negative tests: proptest strategies
// ===========================================================================

/// Strategy: generate a JSON Schema keyword with the WRONG value type.
fn arb_malformed_keyword() -> impl Strategy<Value = (&'static str, serde_json::Value)> {
    prop_oneof![
        Just(("required", json!("not_an_array"))),
        Just(("required", json!(42))),
        Just(("required", json!({"key": "value"}))),
        Just(("required", json!([1, 2]))),
        Just(("properties", json!("not_an_object"))),
        Just(("properties", json!(["a", "b"]))),
        Just(("properties", json!(99))),
        Just(("properties", json!({ "a": 5 }))),
        Just(("type", json!(42))),
        Just(("type", json!([1, 2, 3]))),
        Just(("type", json!(null))),
        Just(("items", json!(99))),
        Just(("items", json!("bad"))),
        Just(("enum", json!("bad"))),
        Just(("$ref", json!(42))),
        Just(("$ref", json!(["a", "b"]))),
        Just(("pattern", json!("(unclosed"))),
        Just(("pattern", json!(12))),
        Just(("format", json!(["email"]))),
        Just(("minLength", json!(-3))),
        Just(("maxLength", json!("ten"))),
        Just(("minimum", json!({"value": 1}))),
        Just(("maximum", json!(true))),
        Just(("exclusiveMinimum", json!("0"))),
        Just(("additionalProperties", json!([1, 2]))),
        Just(("additionalProperties", json!("bad"))),
    ]
}

/// Strategy: a malformed schema with 1-3 wrong keywords, optionally nested
/// under a well-formed parent.
fn arb_malformed_schema() -> impl Strategy<Value = serde_json::Value> {
    (proptest::collection::vec(arb_malformed_keyword(), 1..=3), any::<bool>()).prop_map(
        |(keywords, nested)| {
            let mut obj = serde_json::Map::new();
            for (key, value) in keywords {
                obj.insert(key.to_string(), value);
            }
            let broken = serde_json::Value::Object(obj);
            if nested {
                json!({ "type": "object", "properties": { "child": broken } })
            } else {
                broken
            }
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, ..Default::default() })]

    /// Property: a malformed schema always yields exactly one `custom` error.
    #[test]
    fn malformed_schema_yields_single_custom_error(schema in arb_malformed_schema()) {
        let result = validate(&json!({ "child": "value" }), &schema);
        prop_assert_eq!(result.errors.len(), 1);
        prop_assert_eq!(result.errors[0].kind, ErrorKind::Custom);
        prop_assert_eq!(result.errors[0].field.as_str(), "schema");
    }

    /// Property: compile errors carry a non-empty message and a pointer path.
    #[test]
    fn compile_errors_have_messages(schema in arb_malformed_schema()) {
        let err = compile(&schema).expect_err("schema is malformed");
        prop_assert!(!err.to_string().is_empty());
        prop_assert!(err.path().starts_with('#'));
    }

    /// Property: generation never panics on arbitrary JSON, compiled or not.
    #[test]
    fn generation_never_panics(schema in any::<u8>().prop_map(|n| json!({
        "type": (["object", "string", "array", "integer", "mystery"][usize::from(n % 5)]),
        "minimum": n,
        "maxLength": n % 4,
        "items": { "type": "number", "maximum": -f64::from(n) }
    }))) {
        if let Ok(node) = compile(&schema) {
            let _ = generate_example(&node, &ExampleOptions::default());
        }
    }
}
