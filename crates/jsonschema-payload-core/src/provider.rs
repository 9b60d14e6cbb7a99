//! Schema providers: where resolved schemas come from.
//!
//! The engine itself only ever sees a resolved schema value. A
//! [`SchemaProvider`] maps an endpoint reference (path, method, request or
//! response) onto that value. [`OpenApiDocument`] is the local provider over
//! an in-memory OpenAPI 3.x document whose `$ref`s have already been inlined.

use std::fmt;

use serde_json::{Map, Value};

/// Which body of an operation a lookup targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BodyTarget {
    Request,
    /// Response body for the given status code (`"201"`, `"default"`), or the
    /// operation's primary success response when `None`.
    Response(Option<String>),
}

/// Identifies one request or response body of an API operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointRef {
    pub path: String,
    pub method: String,
    pub target: BodyTarget,
}

impl EndpointRef {
    pub fn request(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            target: BodyTarget::Request,
        }
    }

    pub fn response(path: impl Into<String>, method: impl Into<String>, status: Option<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            target: BodyTarget::Response(status),
        }
    }
}

impl fmt::Display for EndpointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method.to_ascii_uppercase(), self.path)?;
        match &self.target {
            BodyTarget::Request => f.write_str(" (request)"),
            BodyTarget::Response(Some(status)) => write!(f, " (response {status})"),
            BodyTarget::Response(None) => f.write_str(" (response)"),
        }
    }
}

/// Result of a provider lookup. Each way a schema can be absent is distinct.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaLookup {
    Found(Value),
    UnknownPath,
    UnknownMethod,
    NoRequestBody,
    NoResponse,
    /// The body exists but declares no media type with a schema.
    NoJsonContent,
}

impl SchemaLookup {
    pub fn found(&self) -> Option<&Value> {
        match self {
            SchemaLookup::Found(schema) => Some(schema),
            _ => None,
        }
    }

    pub fn into_found(self) -> Option<Value> {
        match self {
            SchemaLookup::Found(schema) => Some(schema),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaLookup::Found(_) => f.write_str("schema found"),
            SchemaLookup::UnknownPath => f.write_str("path is not declared in the document"),
            SchemaLookup::UnknownMethod => f.write_str("method is not declared for this path"),
            SchemaLookup::NoRequestBody => f.write_str("operation has no request body"),
            SchemaLookup::NoResponse => f.write_str("operation declares no matching response"),
            SchemaLookup::NoJsonContent => f.write_str("body declares no content schema"),
        }
    }
}

/// Source of resolved schemas for API endpoints.
pub trait SchemaProvider {
    fn lookup(&self, endpoint: &EndpointRef) -> SchemaLookup;
}

// ---------------------------------------------------------------------------
// OpenAPI document
// ---------------------------------------------------------------------------

const JSON_MEDIA_TYPE: &str = "application/json";

/// Provider over a dereferenced OpenAPI 3.x document.
#[derive(Debug, Clone)]
pub struct OpenApiDocument {
    document: Value,
}

impl OpenApiDocument {
    pub fn new(document: Value) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Value {
        &self.document
    }
}

impl SchemaProvider for OpenApiDocument {
    fn lookup(&self, endpoint: &EndpointRef) -> SchemaLookup {
        let Some(path_item) = self.document.get("paths").and_then(|p| p.get(&endpoint.path)) else {
            return SchemaLookup::UnknownPath;
        };
        let Some(operation) = path_item.get(endpoint.method.to_ascii_lowercase()) else {
            return SchemaLookup::UnknownMethod;
        };

        let lookup = match &endpoint.target {
            BodyTarget::Request => match operation.get("requestBody") {
                Some(body) => content_schema(body),
                None => SchemaLookup::NoRequestBody,
            },
            BodyTarget::Response(status) => {
                let response = operation
                    .get("responses")
                    .and_then(Value::as_object)
                    .and_then(|responses| match status {
                        Some(code) => responses.get(code),
                        None => primary_response(responses),
                    });
                match response {
                    Some(response) => content_schema(response),
                    None => SchemaLookup::NoResponse,
                }
            }
        };
        tracing::debug!(endpoint = %endpoint, found = lookup.found().is_some(), "schema lookup");
        lookup
    }
}

/// Lowest declared 2xx response, falling back to `default`.
fn primary_response(responses: &Map<String, Value>) -> Option<&Value> {
    responses
        .iter()
        .filter_map(|(code, response)| {
            code.parse::<u16>()
                .ok()
                .filter(|c| (200..300).contains(c))
                .map(|c| (c, response))
        })
        .min_by_key(|(code, _)| *code)
        .map(|(_, response)| response)
        .or_else(|| responses.get("default"))
}

/// Schema of the preferred media type: `application/json`, then any `+json`
/// type, then whichever is declared first.
fn content_schema(body: &Value) -> SchemaLookup {
    let Some(content) = body.get("content").and_then(Value::as_object) else {
        return SchemaLookup::NoJsonContent;
    };
    let media = content
        .get(JSON_MEDIA_TYPE)
        .or_else(|| {
            content
                .iter()
                .find(|(media_type, _)| media_type.ends_with("+json"))
                .map(|(_, media)| media)
        })
        .or_else(|| content.values().next());

    match media.and_then(|m| m.get("schema")) {
        Some(schema) => SchemaLookup::Found(schema.clone()),
        None => SchemaLookup::NoJsonContent,
    }
}
