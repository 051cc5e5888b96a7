//! Schemas, missing-key policies and error reporting.
//!
//! Run with: cargo run --example schema

use latex2pydata::{loads, loads_with_options, LoadOptions, Schema, SchemaMissing};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let input = r#"# latex2pydata metadata: {"schema": {"year": "int", "scores": "dict[str, list[float]]"}, "schema_missing": "verbatim"}
[
{"year": "2023", "scores": "{'a': [1.0, 2.5]}", "note": "'kept as text'"},
{"year": "2024", "scores": "{}", "note": "{'not': 'parsed'}"},
]"#;

    let data = loads(input)?;
    for (i, record) in data.records().iter().enumerate() {
        println!("record {}: {}", i, record.to_value());
    }
    println!();

    // Options take precedence over the directive
    let options = LoadOptions::new().with_schema_missing(SchemaMissing::EvalAny);
    let data = loads_with_options(input, &options)?;
    println!("with evalany: {}\n", data.to_value());

    // A programmatic schema replaces the directive's schema
    let schema = Schema::from_pairs([("year", "str"), ("scores", "verbatim"), ("note", "verbatim")])?;
    let options = LoadOptions::new().with_schema(schema);
    match loads_with_options(input, &options) {
        Ok(data) => println!("unexpected success: {}", data.to_value()),
        Err(e) => println!("error ({:?}): {}\n", e.kind(), e),
    }

    // Invalid annotations are reported before any record is read
    let broken = "# latex2pydata metadata: {'schema': {'k': 'list[list[list[int]]]'}}\n{'k': '[]'}";
    if let Err(e) = loads(broken) {
        println!("error ({:?}): {}", e.kind(), e);
    }

    Ok(())
}
