//! The record loader.
//!
//! A load runs in fixed stages, and any failure aborts the whole load:
//!
//! 1. read the metadata directive and merge it with [`LoadOptions`]
//! 2. compile a validator for every typed schema entry
//! 3. parse the payload and check that it is `dict[str, str]` or a list of them
//! 4. resolve every raw value and expand its key-path into the record
//!
//! A [`Loader`] keeps its [`ValidatorCompiler`] between loads, so repeated
//! loads with the same schema reuse compiled validators.
//!
//! ## Examples
//!
//! ```rust
//! use latex2pydata::{LoadOptions, Loader, Value};
//!
//! let loader = Loader::new();
//! let input = "# latex2pydata metadata: {'schema': {'year': 'int'}}\n\
//!              [{'year': '2023'}, {'year': '2024'}]";
//!
//! let data = loader.load_str(input, &LoadOptions::new()).unwrap();
//! let years: Vec<_> = data
//!     .records()
//!     .iter()
//!     .map(|r| r.get_path("year").unwrap().to_value())
//!     .collect();
//! assert_eq!(years, vec![Value::Int(2023), Value::Int(2024)]);
//! assert_eq!(loader.compiler().cached_len(), 1);
//! ```

use crate::literal::{LiteralParser, DEFAULT_MAX_DEPTH};
use crate::metadata::{self, Metadata};
use crate::schema::is_valid_keypath;
use crate::validator::{Validator, ValidatorCompiler};
use crate::{
    DataMap, Error, LoadOptions, LoadedData, PyDict, Result, Schema, SchemaEntry, SchemaMissing,
    Value,
};
use std::collections::HashMap;
use std::io::Read;
use tracing::debug;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const SHAPE_ERROR: &str =
    "Before any schema is applied, data must be dict[str, str] or list[dict[str, str]]";

/// Loads literal-encoded records.
#[derive(Debug, Default)]
pub struct Loader {
    compiler: ValidatorCompiler,
}

/// How a key with a schema entry is resolved.
enum Resolution {
    Verbatim,
    Typed(Validator),
}

/// Settings for one load after merging options and directive.
struct Plan<'s> {
    entries: Option<HashMap<&'s str, Resolution>>,
    schema_missing: SchemaMissing,
    max_depth: usize,
}

type RawRecord<'a> = Vec<(&'a str, &'a str)>;

impl Loader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiler whose cache this loader fills.
    #[must_use]
    pub fn compiler(&self) -> &ValidatorCompiler {
        &self.compiler
    }

    /// Loads records from a string.
    ///
    /// # Errors
    ///
    /// See [`Error`] for the possible failures. Nothing is returned on
    /// failure; there are no partial results.
    pub fn load_str(&self, input: &str, options: &LoadOptions) -> Result<LoadedData> {
        let Metadata {
            schema: directive_schema,
            schema_missing: directive_missing,
        } = metadata::parse_directive(input, DEFAULT_MAX_DEPTH)?.unwrap_or_default();

        let schema = options.schema.as_ref().or(directive_schema.as_ref());
        let schema_missing = options
            .schema_missing
            .or(directive_missing)
            .unwrap_or_default();
        let plan = Plan {
            entries: schema.map(|s| self.compile_schema(s)).transpose()?,
            schema_missing,
            max_depth: options.max_depth,
        };

        let payload = LiteralParser::new(input)
            .with_max_depth(options.max_depth)
            .parse()?;
        let (raw_records, is_batch) = split_records(&payload)?;

        debug!(
            records = raw_records.len(),
            schema_entries = schema.map_or(0, Schema::len),
            %schema_missing,
            "loading records"
        );

        let records = raw_records
            .iter()
            .map(|raw| plan.build_record(raw))
            .collect::<Result<Vec<_>>>()?;

        if is_batch {
            Ok(LoadedData::Batch(records))
        } else {
            records
                .into_iter()
                .next()
                .map(LoadedData::Record)
                .ok_or_else(|| Error::record_shape(SHAPE_ERROR))
        }
    }

    /// Loads records from a byte reader. A leading UTF-8 byte-order mark is
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if reading fails and [`Error::Decode`] if the
    /// bytes are not UTF-8, in addition to the errors of
    /// [`Loader::load_str`].
    pub fn load_reader<R: Read>(&self, mut reader: R, options: &LoadOptions) -> Result<LoadedData> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| Error::io(&e.to_string()))?;
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
        let input = std::str::from_utf8(bytes).map_err(|e| Error::decode(&e.to_string()))?;
        self.load_str(input, options)
    }

    fn compile_schema<'s>(&self, schema: &'s Schema) -> Result<HashMap<&'s str, Resolution>> {
        schema
            .iter()
            .map(|(key, entry)| {
                let resolution = match entry {
                    SchemaEntry::Verbatim => Resolution::Verbatim,
                    SchemaEntry::Typed(annotation) => {
                        Resolution::Typed(self.compiler.compile_annotation(annotation)?)
                    }
                };
                Ok((key.as_str(), resolution))
            })
            .collect()
    }
}

impl Plan<'_> {
    fn build_record(&self, raw: &RawRecord<'_>) -> Result<DataMap> {
        let mut record = DataMap::new();
        for &(key, text) in raw {
            let value = self.resolve(key, text)?;
            record.insert_path(key, value)?;
        }
        Ok(record)
    }

    fn resolve(&self, key: &str, text: &str) -> Result<Value> {
        let entries = match &self.entries {
            Some(entries) => entries,
            None => return Ok(Value::from(text)),
        };
        match entries.get(key) {
            Some(Resolution::Verbatim) => Ok(Value::from(text)),
            Some(Resolution::Typed(validator)) => {
                let value = self.parse_value(key, text)?;
                if validator.validate(&value) {
                    Ok(value)
                } else {
                    Err(Error::type_mismatch(key, validator.annotation()))
                }
            }
            None => match self.schema_missing {
                SchemaMissing::Error => Err(Error::missing_schema_entry(key)),
                SchemaMissing::Verbatim => Ok(Value::from(text)),
                SchemaMissing::EvalAny => self.parse_value(key, text),
            },
        }
    }

    fn parse_value(&self, key: &str, text: &str) -> Result<Value> {
        LiteralParser::new(text)
            .with_max_depth(self.max_depth)
            .parse()
            .map_err(|e| Error::invalid_value(key, e))
    }
}

// All records are checked before any of them is resolved.
fn split_records(payload: &Value) -> Result<(Vec<RawRecord<'_>>, bool)> {
    match payload {
        Value::Dict(dict) => Ok((vec![raw_record(dict)?], false)),
        Value::List(items) => {
            let records = items
                .iter()
                .map(|item| match item {
                    Value::Dict(dict) => raw_record(dict),
                    _ => Err(Error::record_shape(SHAPE_ERROR)),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok((records, true))
        }
        _ => Err(Error::record_shape(SHAPE_ERROR)),
    }
}

fn raw_record(dict: &PyDict) -> Result<RawRecord<'_>> {
    dict.iter()
        .map(|(key, value)| match (key, value) {
            (Value::Str(key), Value::Str(text)) => {
                if is_valid_keypath(key) {
                    Ok((key.as_str(), text.as_str()))
                } else {
                    Err(Error::record_shape(format!("Unsupported key name \"{}\"", key)))
                }
            }
            _ => Err(Error::record_shape(SHAPE_ERROR)),
        })
        .collect()
}
