#![no_main]

//! Fuzz target for option schema parsing.
//!
//! Every format must reject malformed input with a `SchemaError`, and a
//! schema that loads must satisfy validation.

use libfuzzer_sys::fuzz_target;
use optbind_schema::{SchemaFormat, parse_schema, validate_schema};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    for format in [SchemaFormat::Toml, SchemaFormat::Json, SchemaFormat::Yaml] {
        if let Ok(schema) = parse_schema(s, format) {
            assert!(validate_schema(&schema).is_empty());
        }
    }
});
