//! Schema provider tests over the petstore OpenAPI fixture.

use jsonschema_payload_core::{
    validate, EndpointRef, OpenApiDocument, SchemaLookup, SchemaProvider,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../tests/schemas");

fn petstore() -> OpenApiDocument {
    let path = Path::new(FIXTURES_DIR).join("petstore.openapi.json");
    let content = fs::read_to_string(&path).expect("petstore fixture is readable");
    let document: Value = serde_json::from_str(&content).expect("petstore fixture is JSON");
    OpenApiDocument::new(document)
}

#[test]
fn request_body_schema_is_found() {
    let lookup = petstore().lookup(&EndpointRef::request("/pets", "POST"));
    let schema = lookup.found().expect("POST /pets declares a JSON body");
    assert_eq!(schema["required"], json!(["name"]));

    let result = validate(&json!({ "name": "Rex", "species": "dog" }), schema);
    assert!(result.valid);
}

#[test]
fn default_response_is_lowest_success_code() {
    let lookup = petstore().lookup(&EndpointRef::response("/pets", "get", None));
    assert_eq!(lookup.found().map(|s| s["type"].clone()), Some(json!("array")));
}

#[test]
fn explicit_status_selects_that_response() {
    let lookup = petstore().lookup(&EndpointRef::response(
        "/pets/{petId}",
        "put",
        Some("default".to_string()),
    ));
    let schema = lookup.into_found().expect("problem+json schema");
    assert_eq!(schema["required"], json!(["code", "message"]));
}

#[test]
fn response_without_status_falls_back_to_default() {
    let lookup = petstore().lookup(&EndpointRef::response("/pets/{petId}", "put", None));
    assert!(lookup.found().is_some());
}

#[test]
fn each_absence_has_its_own_sentinel() {
    let doc = petstore();
    let cases = [
        (EndpointRef::request("/owners", "get"), SchemaLookup::UnknownPath),
        (EndpointRef::request("/pets", "patch"), SchemaLookup::UnknownMethod),
        (EndpointRef::request("/pets", "get"), SchemaLookup::NoRequestBody),
        (
            EndpointRef::response("/pets", "post", Some("400".to_string())),
            SchemaLookup::NoResponse,
        ),
        (
            EndpointRef::response("/pets", "post", None),
            SchemaLookup::NoJsonContent,
        ),
        (EndpointRef::request("/pets/{petId}", "put"), SchemaLookup::NoJsonContent),
    ];

    for (endpoint, expected) in cases {
        assert_eq!(doc.lookup(&endpoint), expected, "lookup for {endpoint}");
    }
}

#[test]
fn delete_without_body_has_no_success_content() {
    let lookup = petstore().lookup(&EndpointRef::response("/pets", "delete", None));
    assert_eq!(lookup, SchemaLookup::NoJsonContent);
}
