//! Field paths and sub-schema lookup.
//!
//! Provides two concerns shared by the validator and the field-introspection API:
//! 1. **Typed field paths**: a dot path such as `items.0.id` is parsed once into
//!    [`Segment::Name`] / [`Segment::Index`] segments and rendered either as a
//!    dot path (`items.0.id`) or as a JSON Pointer (`/items/0/id`).
//! 2. **Sub-schema resolution** ([`get_field_schema`]) that walks a compiled
//!    [`SchemaNode`] along such a path.

use std::borrow::Cow;
use std::fmt;

use crate::schema::SchemaNode;

// ---------------------------------------------------------------------------
// JSON Pointer escaping (RFC 6901)
// ---------------------------------------------------------------------------

/// Escape a single path segment per RFC 6901.
///
/// - `~` → `~0`
/// - `/` → `~1`
///
/// Returns `Cow::Borrowed` when no escaping is needed (the common case).
pub fn escape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') || segment.contains('/') {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Build a JSON Pointer path by appending segments to a parent path.
///
/// # Example
/// ```
/// use jsonschema_payload_core::build_path;
/// assert_eq!(build_path("#", &["properties", "a/b"]), "#/properties/a~1b");
/// ```
pub fn build_path(parent: &str, segments: &[&str]) -> String {
    let mut path = parent.to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&escape_pointer_segment(segment));
    }
    path
}

// ---------------------------------------------------------------------------
// Field paths
// ---------------------------------------------------------------------------

/// One step of a field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object key.
    Name(String),
    /// Array element position.
    Index(usize),
}

impl Segment {
    /// Interpret a raw dot-path segment. Canonical non-negative integers
    /// (`0`, `12`, but not `01`) become indices; everything else is a name.
    fn parse(raw: &str) -> Self {
        let canonical = !raw.is_empty()
            && raw.bytes().all(|b| b.is_ascii_digit())
            && (raw == "0" || !raw.starts_with('0'));
        match raw.parse::<usize>() {
            Ok(index) if canonical => Segment::Index(index),
            _ => Segment::Name(raw.to_string()),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Name(name) => f.write_str(name),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// A location inside a payload, as a sequence of typed segments.
///
/// The empty path denotes the payload root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dot path (`data.items.0.id`).
    ///
    /// Returns `None` when the path contains an empty segment (`a..b`, `.a`).
    /// The empty string parses to the root path.
    pub fn parse(dot_path: &str) -> Option<Self> {
        if dot_path.is_empty() {
            return Some(Self::root());
        }
        let mut segments = Vec::new();
        for raw in dot_path.split('.') {
            if raw.is_empty() {
                return None;
            }
            segments.push(Segment::parse(raw));
        }
        Some(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    /// Dot-notation rendering (`items.0.id`). Empty for the root.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&segment.to_string());
        }
        out
    }

    /// JSON Pointer rendering (`/items/0/id`). Empty for the root.
    pub fn to_pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Name(name) => out.push_str(&escape_pointer_segment(name)),
                Segment::Index(index) => out.push_str(&index.to_string()),
            }
        }
        out
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dot())
    }
}

// ---------------------------------------------------------------------------
// Sub-schema lookup
// ---------------------------------------------------------------------------

/// Why a dot path could not be resolved against a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The dot path itself is malformed (empty segment).
    InvalidPath,
    /// The current node declares no property with this name.
    UnknownProperty,
    /// An index segment was applied to a node that does not describe an array.
    NotAnArray,
}

/// Outcome of [`get_field_schema`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldLookup<'a> {
    Resolved(&'a SchemaNode),
    /// `at` is the dot path up to and including the segment that failed.
    Unresolved { at: String, reason: UnresolvedReason },
}

impl<'a> FieldLookup<'a> {
    pub fn resolved(&self) -> Option<&'a SchemaNode> {
        match self {
            FieldLookup::Resolved(node) => Some(node),
            FieldLookup::Unresolved { .. } => None,
        }
    }
}

/// Fetch the sub-schema addressed by a dot path.
///
/// Object nodes descend into `properties[name]`, index segments on array
/// nodes descend into `items`. `allOf`/`anyOf`/`oneOf` branches are searched
/// when the node itself does not declare the property. Anything that cannot be
/// resolved yields [`FieldLookup::Unresolved`].
pub fn get_field_schema<'a>(schema: &'a SchemaNode, dot_path: &str) -> FieldLookup<'a> {
    let Some(path) = FieldPath::parse(dot_path) else {
        return FieldLookup::Unresolved {
            at: dot_path.to_string(),
            reason: UnresolvedReason::InvalidPath,
        };
    };
    resolve(schema, &path)
}

/// [`get_field_schema`] over an already-parsed path.
pub fn resolve<'a>(schema: &'a SchemaNode, path: &FieldPath) -> FieldLookup<'a> {
    let mut current = schema;
    let mut walked = FieldPath::root();

    for segment in path.segments() {
        walked.push(segment.clone());
        let next = match segment {
            Segment::Name(name) => current.find_property(name).ok_or(UnresolvedReason::UnknownProperty),
            Segment::Index(index) => match current.items.as_deref() {
                Some(items) => Ok(items),
                // A property literally named "0" still resolves on object nodes.
                None => current
                    .find_property(&index.to_string())
                    .ok_or(UnresolvedReason::NotAnArray),
            },
        };
        match next {
            Ok(node) => current = node,
            Err(reason) => {
                tracing::debug!(path = %walked, ?reason, "field path did not resolve");
                return FieldLookup::Unresolved {
                    at: walked.to_dot(),
                    reason,
                };
            }
        }
    }

    FieldLookup::Resolved(current)
}
