//! Working with Value for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use latex2pydata::{parse_literal, pydata, Value, ValidatorCompiler};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Build a value with the pydata! macro
    let config = pydata!({
        "host": "localhost",
        "port": 8080,
        "features": ["auth", "logging"],
        "limits": (1, 2.5, None),
        "tags": {"a", "b"}
    });
    println!("Built with pydata!:\n{}\n", config);

    // Parse one from literal text
    let parsed = parse_literal("{'host': 'localhost', 'port': 0x1F90, 'features': ['auth', 'logging'], 'limits': (1, 2.5, None), 'tags': {'b', 'a'}}")?;
    println!("Parsed value equals built value: {}\n", parsed == config);

    // Access values dynamically
    if let Value::Dict(dict) = &config {
        if let Some(port) = dict.get_str("port").and_then(Value::as_i64) {
            println!("Accessing field 'port': {}", port);
        }
        if let Some(features) = dict.get_str("features").and_then(Value::as_slice) {
            println!("Accessing field 'features': {} items", features.len());
        }
        for (key, value) in dict {
            println!("  {} is {}", key, value.type_name());
        }
    }
    println!();

    // Check values against annotations
    let compiler = ValidatorCompiler::new();
    let validator = compiler.compile("list[str]")?;
    if let Value::Dict(dict) = &config {
        for key in ["features", "tags"] {
            if let Some(value) = dict.get_str(key) {
                println!("{} matches {}: {}", key, validator.annotation(), validator.validate(value));
            }
        }
    }

    // Serialize through serde
    println!("As JSON: {}", serde_json::to_string(&config)?);

    Ok(())
}
