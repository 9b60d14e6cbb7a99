#![no_main]

use libfuzzer_sys::fuzz_target;

// Accepts arbitrary bytes, attempts to parse them as a JSON array of
// `[schema, payload]`, then validates and generates an example.
// Goal: no panics, even on malformed schemas.
fuzz_target!(|data: &[u8]| {
    let Ok(serde_json::Value::Array(pair)) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let [schema, payload] = pair.as_slice() else {
        return;
    };
    let _ = jsonschema_payload_core::validate(payload, schema);
    if let Ok(node) = jsonschema_payload_core::compile(schema) {
        let _ = jsonschema_payload_core::generate_example(&node, &Default::default());
    }
});
