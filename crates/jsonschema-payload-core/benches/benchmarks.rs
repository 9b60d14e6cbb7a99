//! Criterion benchmarks for compilation, validation and example generation.
//!
//! Fixtures are pre-parsed outside the benchmark loop to measure only the
//! engine, not JSON parsing or file I/O.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use jsonschema_payload_core::{compile, generate_example, validate, ExampleOptions, Validator};

/// Load and parse a fixture schema from the shared test fixtures directory.
fn load_fixture(name: &str) -> Value {
    let fixtures_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../tests/schemas");
    let path = Path::new(fixtures_dir).join(name);
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

fn bench_compile(c: &mut Criterion) {
    let schema = load_fixture("user.json");

    c.bench_function("compile/user", |b| {
        b.iter(|| compile(black_box(&schema)).unwrap())
    });
}

fn bench_validate_invalid(c: &mut Criterion) {
    let schema = load_fixture("user.json");
    let payload = json!({
        "email": "not-an-email",
        "ssn": "123456789",
        "status": "archived",
        "age": 12,
        "address": { "street": "", "postalCode": "ABCDE", "unit": "4B" }
    });

    c.bench_function("validate/user_invalid", |b| {
        b.iter(|| validate(black_box(&payload), black_box(&schema)))
    });
}

fn bench_validate_precompiled(c: &mut Criterion) {
    let schema = load_fixture("order.json");
    let validator = Validator::new(compile(&schema).unwrap());
    // Generated examples are valid by construction.
    let payload = generate_example(validator.schema(), &ExampleOptions::default());

    c.bench_function("validate/order_precompiled", |b| {
        b.iter(|| validator.validate(black_box(&payload)))
    });
}

fn bench_generate_example(c: &mut Criterion) {
    let node = compile(&load_fixture("order.json")).unwrap();
    let options = ExampleOptions::default();

    c.bench_function("example/order", |b| {
        b.iter(|| generate_example(black_box(&node), black_box(&options)))
    });
}

criterion_group!(
    benches,
    bench_compile,
    bench_validate_invalid,
    bench_validate_precompiled,
    bench_generate_example,
);
criterion_main!(benches);
