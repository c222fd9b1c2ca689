//! Property-based serialization tests for the schema and stamp DTOs.
//!
//! Whatever a schema or cache stamp holds, writing it out and reading it
//! back must give the same value. The cache key hashes canonical schema
//! JSON, so a lossy round trip would silently change keys.

use optbind_types::generation::{CacheStamp, StampedFile};
use optbind_types::options::{
    DefaultValue, Deprecation, OptionDescriptor, OptionKind, OptionSchema, ValueType,
};
use optbind_types::target::TargetId;
use proptest::prelude::*;

fn arb_text() -> impl Strategy<Value = String> {
    prop::string::string_regex(r#"[A-Za-z0-9 .,:*/<>"'-]{0,24}"#).unwrap()
}

fn arb_kind() -> impl Strategy<Value = OptionKind> {
    prop_oneof![
        Just(OptionKind::Flag),
        Just(OptionKind::Value),
        Just(OptionKind::Choice),
        Just(OptionKind::Repeatable),
    ]
}

fn arb_value_type() -> impl Strategy<Value = ValueType> {
    prop_oneof![
        Just(ValueType::String),
        Just(ValueType::File),
        Just(ValueType::Integer),
        Just(ValueType::Long),
        Just(ValueType::Counter),
    ]
}

fn arb_default() -> impl Strategy<Value = DefaultValue> {
    prop_oneof![
        any::<bool>().prop_map(DefaultValue::Bool),
        arb_text().prop_map(DefaultValue::Text),
        prop::collection::vec(arb_text(), 0..4).prop_map(DefaultValue::List),
    ]
}

fn arb_deprecation() -> impl Strategy<Value = Deprecation> {
    (
        prop::option::of(r"[0-9]\.[0-9]{1,2}"),
        any::<bool>(),
        prop::option::of(arb_text()),
    )
        .prop_map(|(since, for_removal, note)| Deprecation {
            since,
            for_removal,
            note,
        })
}

fn arb_descriptor() -> impl Strategy<Value = OptionDescriptor> {
    (
        r"[a-z]{1,8}(-[a-z]{1,8}){0,2}",
        prop::option::of(r"[a-zA-Z]"),
        arb_text(),
        arb_kind(),
        arb_value_type(),
        prop::option::of(r"[A-Z][A-Za-z]{0,10}"),
        prop::collection::vec(r"[a-z-]{1,10}", 0..3),
        prop::option::of(arb_default()),
        prop::option::of(arb_deprecation()),
    )
        .prop_map(
            |(id, short, description, kind, value_type, arg_name, choices, default, deprecated)| {
                OptionDescriptor {
                    id,
                    short,
                    description,
                    kind,
                    value_type,
                    arg_name,
                    choices,
                    default,
                    deprecated,
                }
            },
        )
}

fn arb_schema() -> impl Strategy<Value = OptionSchema> {
    prop::collection::vec(arb_descriptor(), 0..6).prop_map(OptionSchema::new)
}

fn arb_stamp() -> impl Strategy<Value = CacheStamp> {
    (
        prop_oneof![Just(TargetId::Gradle), Just(TargetId::Maven)],
        r"[0-9a-f]{64}",
        prop::collection::vec(
            (r"[a-z]{1,6}(/[A-Za-z]{1,8}){0,3}\.java", r"[0-9a-f]{64}")
                .prop_map(|(path, sha256)| StampedFile { path, sha256 }),
            0..5,
        ),
    )
        .prop_map(|(target, key, files)| CacheStamp::new(target, key, files))
}

proptest! {
    /// Schemas survive a JSON round trip unchanged.
    #[test]
    fn schema_json_roundtrip(schema in arb_schema()) {
        let json = serde_json::to_string(&schema).unwrap();
        let back: OptionSchema = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, schema);
    }

    /// Schemas survive a TOML round trip unchanged.
    #[test]
    fn schema_toml_roundtrip(schema in arb_schema()) {
        let text = toml::to_string(&schema).unwrap();
        let back: OptionSchema = toml::from_str(&text).unwrap();
        prop_assert_eq!(back, schema);
    }

    /// Serializing the same schema twice gives identical bytes.
    #[test]
    fn schema_json_is_stable(schema in arb_schema()) {
        let first = serde_json::to_vec(&schema).unwrap();
        let second = serde_json::to_vec(&schema.clone()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Cache stamps read back exactly as written.
    #[test]
    fn cache_stamp_roundtrip(stamp in arb_stamp()) {
        let json = serde_json::to_string_pretty(&stamp).unwrap();
        let back: CacheStamp = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, stamp);
    }
}
