//! The optional metadata directive on the first line of the input.
//!
//! ```text
//! # latex2pydata metadata: {'schema': {'key1': 'int'}, 'schema_missing': 'evalany'}
//! ```
//!
//! The directive is a `#` comment as far as the payload is concerned, so the
//! payload parser skips it without special handling.

use crate::literal::LiteralParser;
use crate::{Error, Result, Schema, SchemaMissing, Value};
use tracing::debug;

/// Prefix that marks the first line as a metadata directive.
pub const METADATA_MARKER: &str = "# latex2pydata metadata:";

/// Settings carried by a metadata directive. Fields the directive does not
/// mention are `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata {
    pub schema: Option<Schema>,
    pub schema_missing: Option<SchemaMissing>,
}

/// Parses the directive at the start of `input`, if there is one.
///
/// # Errors
///
/// - [`Error::InvalidMetadata`] if the directive is not a literal dict
/// - [`Error::Schema`] if the schema or `schema_missing` value is invalid
///
/// # Examples
///
/// ```rust
/// use latex2pydata::metadata::parse_directive;
/// use latex2pydata::{SchemaMissing, DEFAULT_MAX_DEPTH};
///
/// let input = "# latex2pydata metadata: {'schema_missing': 'evalany'}\n{}";
/// let metadata = parse_directive(input, DEFAULT_MAX_DEPTH).unwrap().unwrap();
/// assert_eq!(metadata.schema_missing, Some(SchemaMissing::EvalAny));
/// assert!(metadata.schema.is_none());
///
/// assert!(parse_directive("{}", DEFAULT_MAX_DEPTH).unwrap().is_none());
/// ```
pub fn parse_directive(input: &str, max_depth: usize) -> Result<Option<Metadata>> {
    let rest = match input.strip_prefix(METADATA_MARKER) {
        Some(rest) => rest,
        None => return Ok(None),
    };
    let line = rest.split('\n').next().unwrap_or(rest);
    let line = line.strip_suffix('\r').unwrap_or(line).trim();
    debug!(directive = line, "found metadata directive");

    let parsed = LiteralParser::new(line)
        .with_max_depth(max_depth)
        .parse()
        .map_err(|e| Error::metadata(format!("Loading metadata failed:\n{}", e)))?;
    let fields = match parsed {
        Value::Dict(fields) => fields,
        _ => return Err(Error::metadata("Invalid metadata (must be a dict)")),
    };

    let mut metadata = Metadata::default();
    for (key, value) in &fields {
        match key.as_str() {
            Some("schema") => {
                metadata.schema = match value {
                    Value::None => None,
                    other => Some(Schema::from_value(other)?),
                };
            }
            Some("schema_missing") => {
                let policy = match value {
                    Value::Str(token) => token.parse::<SchemaMissing>()?,
                    other => {
                        return Err(Error::schema(format!(
                            "Invalid \"schema_missing\" value {}",
                            other
                        )))
                    }
                };
                metadata.schema_missing = Some(policy);
            }
            _ => debug!(field = %key, "ignoring unknown metadata field"),
        }
    }
    Ok(Some(metadata))
}
