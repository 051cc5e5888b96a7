//! Property-based tests for the loader and the literal grammar.
//!
//! These complement the integration suites by checking invariants over
//! generated records and values rather than hand-picked inputs.

use latex2pydata::{
    loads, loads_with_options, parse_literal, DataNode, LoadOptions, PyDict, Schema, Value,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::None),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Value::Float),
        "\\PC{0,12}".prop_map(Value::Str),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(Value::Bytes),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Tuple),
            prop::collection::vec(("\\PC{0,6}", inner), 0..4).prop_map(|pairs| {
                Value::Dict(
                    pairs
                        .into_iter()
                        .map(|(k, v)| (Value::Str(k), v))
                        .collect(),
                )
            }),
            prop::collection::vec(any::<i64>(), 0..4)
                .prop_map(|items| Value::Set(items.into_iter().map(Value::Int).collect())),
        ]
    })
}

fn record_text<K: AsRef<str>, V: AsRef<str>>(pairs: impl Iterator<Item = (K, V)>) -> String {
    let dict: PyDict = pairs
        .map(|(k, v)| (Value::from(k.as_ref()), Value::from(v.as_ref())))
        .collect();
    Value::Dict(dict).to_string()
}

proptest! {
    // Without a schema every raw string comes back unchanged
    #[test]
    fn prop_no_schema_identity(
        record in prop::collection::btree_map("[a-z_][a-z0-9_]{0,8}", "\\PC{0,20}", 0..8)
    ) {
        let data = loads(&record_text(record.iter())).unwrap();
        let loaded = data.as_record().unwrap();
        prop_assert_eq!(loaded.len(), record.len());
        for (key, raw) in &record {
            prop_assert_eq!(
                loaded.get(key),
                Some(&DataNode::Value(Value::Str(raw.clone())))
            );
        }
    }

    #[test]
    fn prop_int_roundtrip(n in any::<i64>()) {
        prop_assert_eq!(parse_literal(&Value::Int(n).to_string()).unwrap(), Value::Int(n));
    }

    #[test]
    fn prop_float_roundtrip(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        prop_assert_eq!(parse_literal(&Value::Float(f).to_string()).unwrap(), Value::Float(f));
    }

    #[test]
    fn prop_str_roundtrip(s in any::<String>()) {
        let value = Value::Str(s);
        prop_assert_eq!(parse_literal(&value.to_string()).unwrap(), value);
    }

    // Key order in the payload does not change the loaded record
    #[test]
    fn prop_key_order_independence(
        record in prop::collection::btree_map("[a-z][a-z0-9]{0,5}", any::<i64>(), 1..8)
    ) {
        let schema = Schema::from_pairs(record.keys().map(|k| (k.as_str(), "int"))).unwrap();
        let options = LoadOptions::new().with_schema(schema);

        let values: BTreeMap<_, _> = record.iter().map(|(k, v)| (k, v.to_string())).collect();
        let forward = record_text(values.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let backward = record_text(values.iter().rev().map(|(k, v)| (k.as_str(), v.as_str())));

        let forward = loads_with_options(&forward, &options).unwrap();
        let backward = loads_with_options(&backward, &options).unwrap();
        prop_assert_eq!(forward.to_value(), backward.to_value());

        let loaded = forward.as_record().unwrap();
        for (key, n) in &record {
            prop_assert_eq!(loaded.get(key).and_then(DataNode::as_value), Some(&Value::Int(*n)));
        }
    }

    // Rendering a value and parsing it again gives the same value
    #[test]
    fn prop_render_reparse(v in value()) {
        let rendered = v.to_string();
        let reparsed = parse_literal(&rendered);
        prop_assert!(reparsed.is_ok(), "{} failed: {:?}", rendered, reparsed);
        prop_assert_eq!(reparsed.unwrap(), v);
    }

    // The parser returns an error instead of panicking on arbitrary input
    #[test]
    fn prop_parser_total(s in "\\PC{0,40}") {
        let _ = parse_literal(&s);
        let _ = loads(&s);
    }
}
