//! Loading a record without a schema.
//!
//! Run with: cargo run --example simple

use latex2pydata::loads;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let input = r#"{
"title": "A Tale of Two Parsers",
"author.first": "Ada",
"author.last": "Lovelace",
}"#;

    // Without a schema every value stays a raw string
    let data = loads(input)?;
    let record = data.as_record().ok_or("expected a single record")?;

    println!("Loaded record:\n{}\n", record.to_value());

    if let Some(last) = record.get_path("author.last").and_then(|n| n.as_value()) {
        println!("author.last = {}", last);
    }

    // Dotted keys were expanded into a nested map
    let author = record.get("author").and_then(|n| n.as_map()).ok_or("missing author")?;
    println!("author has {} fields", author.len());

    Ok(())
}
