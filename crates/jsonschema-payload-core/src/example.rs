//! Example payload synthesis.
//!
//! [`generate_example`] walks a compiled schema and produces a representative
//! JSON value that the same schema accepts. Leaf values are chosen by
//! priority: `enum` → `pattern` → `format` → bare `type`.
//!
//! Generation always terminates: every object/array descent increments the
//! depth, and containers at `depth >= max_depth` collapse to `{}` / `[]`.

use regex_syntax::hir::{Class, Hir, HirKind};
use serde_json::{json, Map, Number, Value};

use crate::config::ExampleOptions;
use crate::format::recognize_pattern;
use crate::schema::{AdditionalProperties, CompositionKind, Pattern, SchemaNode, SchemaType};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Value used where the schema gives nothing better to go on.
const PLACEHOLDER: &str = "example";

/// Base word for bare string schemas, padded or truncated to length bounds.
const SAMPLE_STRING: &str = "string";

const SAMPLE_INTEGER: i64 = 42;
const SAMPLE_NUMBER: f64 = 42.5;

/// Key used for the single entry emitted for an `additionalProperties` schema.
const ADDITIONAL_KEY: &str = "key";

/// Characters tried, in order, when a regex character class must be satisfied.
const PREFERRED_CHARS: &[char] = &['a', 'A', '0', '_', '-', ' '];

/// Upper bound on repetitions expanded during pattern synthesis.
const MAX_REPEAT: u32 = 256;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Synthesize an example payload for `schema`.
///
/// # Example
/// ```
/// use jsonschema_payload_core::{compile, generate_example, ExampleOptions};
/// use serde_json::json;
///
/// let schema = compile(&json!({
///     "type": "object",
///     "required": ["email"],
///     "properties": {
///         "email": { "type": "string", "format": "email" },
///         "nickname": { "type": "string" }
///     }
/// }))
/// .unwrap();
///
/// let options = ExampleOptions { required_only: true, ..ExampleOptions::default() };
/// assert_eq!(generate_example(&schema, &options), json!({ "email": "user@example.com" }));
/// ```
pub fn generate_example(schema: &SchemaNode, options: &ExampleOptions) -> Value {
    generate(schema, options, 0)
}

fn generate(node: &SchemaNode, options: &ExampleOptions, depth: usize) -> Value {
    if node.reference.is_some() {
        return Value::Null;
    }
    if let Some(first) = node.enum_values.as_ref().and_then(|values| values.first()) {
        return first.clone();
    }
    if let Some(merged) = merge_all_of(node) {
        return generate(&merged, options, depth);
    }

    match node.effective_type() {
        Some(SchemaType::Object) => object_example(node, options, depth),
        Some(SchemaType::Array) => array_example(node, options, depth),
        Some(SchemaType::String) => string_example(node),
        Some(SchemaType::Integer) => integer_example(node),
        Some(SchemaType::Number) => number_example(node),
        Some(SchemaType::Boolean) => Value::Bool(true),
        Some(SchemaType::Null) => Value::Null,
        Some(SchemaType::Unknown(_)) | None => match first_alternative(node) {
            Some(branch) => generate(branch, options, depth),
            None => Value::Null,
        },
    }
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

fn object_example(node: &SchemaNode, options: &ExampleOptions, depth: usize) -> Value {
    if depth >= options.max_depth {
        tracing::debug!(depth, "example depth limit reached, emitting empty object");
        return Value::Object(Map::new());
    }

    let mut out = Map::new();
    for (name, child) in &node.properties {
        if options.required_only && !node.is_required(name) {
            continue;
        }
        out.insert(name.clone(), generate(child, options, depth + 1));
    }
    // Required names with no declared schema still have to be present.
    for name in &node.required {
        if !out.contains_key(name) {
            out.insert(name.clone(), json!(PLACEHOLDER));
        }
    }
    if let Some(AdditionalProperties::Schema(schema)) = &node.additional_properties {
        if !options.required_only && node.property(ADDITIONAL_KEY).is_none() {
            out.insert(ADDITIONAL_KEY.to_string(), generate(schema, options, depth + 1));
        }
    }
    Value::Object(out)
}

fn array_example(node: &SchemaNode, options: &ExampleOptions, depth: usize) -> Value {
    if depth >= options.max_depth {
        tracing::debug!(depth, "example depth limit reached, emitting empty array");
        return Value::Array(Vec::new());
    }
    let item = match node.items.as_deref() {
        Some(items) => generate(items, options, depth + 1),
        None => json!(PLACEHOLDER),
    };
    Value::Array(vec![item])
}

/// First `oneOf` / `anyOf` branch, used when a node has no type of its own.
fn first_alternative(node: &SchemaNode) -> Option<&SchemaNode> {
    node.compositions
        .iter()
        .filter(|c| matches!(c.kind, CompositionKind::OneOf | CompositionKind::AnyOf))
        .find_map(|c| c.branches.first())
}

/// Fold `allOf` branches into a single node. Returns `None` when the node has
/// no `allOf` to merge.
fn merge_all_of(node: &SchemaNode) -> Option<SchemaNode> {
    let index = node
        .compositions
        .iter()
        .position(|c| c.kind == CompositionKind::AllOf && !c.branches.is_empty())?;

    let mut merged = node.clone();
    let composition = merged.compositions.remove(index);
    for branch in composition.branches {
        let branch = merge_all_of(&branch).unwrap_or(branch);
        absorb(&mut merged, branch);
    }
    Some(merged)
}

fn absorb(target: &mut SchemaNode, branch: SchemaNode) {
    for (name, child) in branch.properties {
        if target.property(&name).is_none() {
            target.properties.push((name, child));
        }
    }
    for name in branch.required {
        if !target.is_required(&name) {
            target.required.push(name);
        }
    }
    if matches!(target.schema_type, None | Some(SchemaType::Unknown(_))) {
        target.schema_type = branch.schema_type;
    }
    target.format = target.format.take().or(branch.format);
    target.pattern = target.pattern.take().or(branch.pattern);
    target.enum_values = target.enum_values.take().or(branch.enum_values);
    target.min_length = target.min_length.or(branch.min_length);
    target.max_length = target.max_length.or(branch.max_length);
    target.minimum = target.minimum.take().or(branch.minimum);
    target.maximum = target.maximum.take().or(branch.maximum);
    target.items = target.items.take().or(branch.items);
    target.additional_properties = target
        .additional_properties
        .take()
        .or(branch.additional_properties);
    target.compositions.extend(branch.compositions);
}

// ---------------------------------------------------------------------------
// Leaves
// ---------------------------------------------------------------------------

fn string_example(node: &SchemaNode) -> Value {
    let (min, max) = (node.min_length, node.max_length);
    let accepts = |candidate: &str| {
        length_fits(candidate, min, max) && node.pattern.as_ref().map_or(true, |p| p.is_match(candidate))
    };

    if let Some(pattern) = &node.pattern {
        let canonical = recognize_pattern(pattern.source()).and_then(|f| f.example());
        if let Some(literal) = canonical.filter(|&literal| accepts(literal)) {
            return json!(literal);
        }
        if let Some(synthesized) = synthesize(pattern, min, max) {
            return json!(synthesized);
        }
        tracing::debug!(pattern = pattern.source(), "no matching string synthesized for pattern");
    }
    if let Some(format) = &node.format {
        if let Some(literal) = format.examples().iter().copied().find(|&literal| accepts(literal)) {
            return json!(literal);
        }
    }
    json!(fit_length(SAMPLE_STRING, min, max))
}

fn length_fits(value: &str, min: Option<u64>, max: Option<u64>) -> bool {
    let length = value.chars().count() as u64;
    min.map_or(true, |min| length >= min) && max.map_or(true, |max| length <= max)
}

fn fit_length(base: &str, min: Option<u64>, max: Option<u64>) -> String {
    let mut out: String = match max {
        Some(max) => base.chars().take(usize::try_from(max).unwrap_or(usize::MAX)).collect(),
        None => base.to_string(),
    };
    if let Some(min) = min {
        let missing = usize::try_from(min)
            .unwrap_or(usize::MAX)
            .saturating_sub(out.chars().count());
        out.extend(std::iter::repeat('x').take(missing));
    }
    out
}

fn integer_example(node: &SchemaNode) -> Value {
    let mut candidate = SAMPLE_INTEGER as f64;
    if let Some(min) = &node.minimum {
        let lowest = if min.exclusive {
            min.as_f64().floor() + 1.0
        } else {
            min.as_f64().ceil()
        };
        candidate = candidate.max(lowest);
    }
    if let Some(max) = &node.maximum {
        let highest = if max.exclusive {
            max.as_f64().ceil() - 1.0
        } else {
            max.as_f64().floor()
        };
        candidate = candidate.min(highest);
    }
    // Saturating conversion for bounds beyond the i64 range.
    json!(candidate as i64)
}

fn number_example(node: &SchemaNode) -> Value {
    let low = node.minimum.as_ref().map(|b| (b.as_f64(), b.exclusive));
    let high = node.maximum.as_ref().map(|b| (b.as_f64(), b.exclusive));

    let mut candidate = SAMPLE_NUMBER;
    if let Some((lo, exclusive)) = low {
        if candidate < lo || (exclusive && candidate <= lo) {
            candidate = match high {
                Some((hi, _)) => (lo + hi) / 2.0,
                None if exclusive => lo + 1.0,
                None => lo,
            };
        }
    }
    if let Some((hi, exclusive)) = high {
        if candidate > hi || (exclusive && candidate >= hi) {
            candidate = match low {
                Some((lo, _)) => (lo + hi) / 2.0,
                None if exclusive => hi - 1.0,
                None => hi,
            };
        }
    }
    Number::from_f64(candidate).map_or(Value::Null, Value::Number)
}

// ---------------------------------------------------------------------------
// Pattern synthesis
// ---------------------------------------------------------------------------

/// Build a string from the regex structure, keeping it only when the
/// compiled pattern and the length bounds accept it.
///
/// The shortest expansion is tried first. When it falls short of `min`,
/// unbounded repetitions are expanded further until the length is reached.
fn synthesize(pattern: &Pattern, min: Option<u64>, max: Option<u64>) -> Option<String> {
    let hir = regex_syntax::parse(pattern.source()).ok()?;
    let mut synth = Synth::default();
    synth.emit(&hir)?;

    let wanted = min.map_or(0, |m| usize::try_from(m).unwrap_or(usize::MAX));
    let shortest = synth.out.chars().count();
    if shortest < wanted {
        synth = Synth {
            growth: wanted - shortest,
            ..Synth::default()
        };
        synth.emit(&hir)?;
    }

    let accepts = |candidate: &str| pattern.is_match(candidate) && length_fits(candidate, min, max);
    if accepts(synth.out.as_str()) {
        return Some(synth.out);
    }
    // Unanchored patterns still match after padding.
    let padded = fit_length(&synth.out, min, max);
    accepts(padded.as_str()).then_some(padded)
}

#[derive(Default)]
struct Synth {
    out: String,
    /// Characters still to add through optional repetitions.
    growth: usize,
}

impl Synth {
    fn emit(&mut self, hir: &Hir) -> Option<()> {
        match hir.kind() {
            HirKind::Empty | HirKind::Look(_) => {}
            HirKind::Literal(literal) => self.out.push_str(std::str::from_utf8(&literal.0).ok()?),
            HirKind::Class(class) => self.out.push(pick_char(class)?),
            HirKind::Repetition(repetition) => {
                if repetition.min > MAX_REPEAT {
                    return None;
                }
                for _ in 0..repetition.min {
                    self.emit(&repetition.sub)?;
                }
                let mut count = repetition.min;
                while self.growth > 0
                    && count < MAX_REPEAT
                    && repetition.max.map_or(true, |max| count < max)
                {
                    let before = self.out.chars().count();
                    self.emit(&repetition.sub)?;
                    let added = self.out.chars().count() - before;
                    if added == 0 {
                        break;
                    }
                    self.growth = self.growth.saturating_sub(added);
                    count += 1;
                }
            }
            HirKind::Capture(capture) => self.emit(&capture.sub)?,
            HirKind::Concat(parts) => {
                for part in parts {
                    self.emit(part)?;
                }
            }
            HirKind::Alternation(branches) => self.emit(branches.first()?)?,
        }
        Some(())
    }
}

fn pick_char(class: &Class) -> Option<char> {
    match class {
        Class::Unicode(unicode) => {
            let ranges = unicode.ranges();
            PREFERRED_CHARS
                .iter()
                .copied()
                .find(|c| ranges.iter().any(|r| r.start() <= *c && *c <= r.end()))
                .or_else(|| ranges.first().map(|r| r.start()))
        }
        Class::Bytes(bytes) => {
            let ranges = bytes.ranges();
            PREFERRED_CHARS
                .iter()
                .copied()
                .find(|c| {
                    c.is_ascii()
                        && ranges
                            .iter()
                            .any(|r| r.start() <= *c as u8 && *c as u8 <= r.end())
                })
                .or_else(|| {
                    ranges
                        .iter()
                        .find(|r| r.start().is_ascii())
                        .map(|r| char::from(r.start()))
                })
        }
    }
}
