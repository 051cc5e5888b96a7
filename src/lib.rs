//! # latex2pydata
//!
//! Loads literal-encoded records, as written by the `latex2pydata` LaTeX
//! package, into typed and nested values.
//!
//! ## What is the input?
//!
//! A record is a dict literal whose keys are key-paths and whose values are
//! strings holding literals. An optional first line carries a schema that
//! maps key-paths to type annotations:
//!
//! ```text
//! # latex2pydata metadata: {"schema": {"key1": "int", "main.sub": "list[float]"}}
//! {
//! "key1": "123",
//! "main.sub": "[1.0, 2.5]",
//! }
//! ```
//!
//! The payload may also be a list of such records sharing one schema.
//!
//! ## Key Features
//!
//! - **Safe**: values are parsed by a closed literal grammar and never evaluated
//! - **Typed**: annotations such as `dict[str, list[int]]` are compiled into
//!   validators once and cached
//! - **Nested**: dotted key-paths expand into nested maps
//! - **Fail-fast**: any invalid key, value or type aborts the load with a
//!   precise [`Error`]
//!
//! ## Quick Start
//!
//! ```rust
//! use latex2pydata::{loads, Value};
//!
//! let input = "# latex2pydata metadata: {'schema': {'key1': 'int', 'main.sub': 'list[float]'}}\n\
//!              {'key1': '123', 'main.sub': '[1.0, 2.5]'}";
//!
//! let data = loads(input).unwrap();
//! let record = data.as_record().unwrap();
//! assert_eq!(record.get_path("key1").unwrap().to_value(), Value::Int(123));
//! assert_eq!(record.to_value().to_string(), "{'key1': 123, 'main': {'sub': [1.0, 2.5]}}");
//! ```
//!
//! ### Keys Without Schema Entry
//!
//! By default a key missing from the schema is an error. The directive (or
//! [`LoadOptions`]) can choose to keep the raw string instead, or to parse it
//! as a literal of any type:
//!
//! ```rust
//! use latex2pydata::{loads, ErrorKind, Value};
//!
//! let strict = "# latex2pydata metadata: {'schema': {}}\n{'n': '1'}";
//! assert_eq!(loads(strict).unwrap_err().kind(), ErrorKind::MissingSchemaEntry);
//!
//! let lenient = "# latex2pydata metadata: {'schema': {}, 'schema_missing': 'evalany'}\n{'n': '1'}";
//! let data = loads(lenient).unwrap();
//! assert_eq!(data.as_record().unwrap().get_path("n").unwrap().to_value(), Value::Int(1));
//! ```
//!
//! ### Building Values with pydata! Macro
//!
//! ```rust
//! use latex2pydata::{parse_literal, pydata};
//!
//! let value = pydata!({"name": "Alice", "tags": {"a", "b"}});
//! assert_eq!(value, parse_literal("{'name': 'Alice', 'tags': {'b', 'a'}}").unwrap());
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (directive found, load started,
//! validator cache activity, deprecated `rawstr` tokens) and never installs a
//! subscriber.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Loading a record without schema
//! - **`schema.rs`** - Schemas, policies and error reporting
//! - **`dynamic_values.rs`** - Working with [`Value`] directly
//!
//! Run any example with: `cargo run --example <name>`

pub mod annotation;
pub mod data;
pub mod error;
pub mod literal;
pub mod loader;
pub mod macros;
pub mod map;
pub mod metadata;
pub mod options;
pub mod schema;
pub mod validator;
pub mod value;

pub use annotation::{Annotation, ScalarType, ScalarUnion, SequenceKind};
pub use data::{DataMap, DataNode, LoadedData};
pub use error::{Error, ErrorKind, Result};
pub use literal::{parse_literal, LiteralParser, DEFAULT_MAX_DEPTH};
pub use loader::Loader;
pub use map::{PyDict, PySet};
pub use metadata::{Metadata, METADATA_MARKER};
pub use options::LoadOptions;
pub use schema::{Schema, SchemaEntry, SchemaMissing};
pub use validator::{Validator, ValidatorCompiler};
pub use value::Value;

use std::io;

/// Loads records from a string.
///
/// # Examples
///
/// ```rust
/// use latex2pydata::loads;
///
/// let data = loads("[{'a': 'x'}, {'a': 'y'}]").unwrap();
/// assert_eq!(data.records().len(), 2);
/// ```
///
/// # Errors
///
/// Returns an error if the directive, the schema, the payload shape or any
/// value is invalid.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn loads(input: &str) -> Result<LoadedData> {
    loads_with_options(input, &LoadOptions::default())
}

/// Loads records from a string, with options taking precedence over the
/// metadata directive.
///
/// # Errors
///
/// Same as [`loads`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn loads_with_options(input: &str, options: &LoadOptions) -> Result<LoadedData> {
    Loader::new().load_str(input, options)
}

/// Loads records from an I/O stream of UTF-8 text, skipping a byte-order mark.
///
/// # Examples
///
/// ```rust
/// use latex2pydata::load;
/// use std::io::Cursor;
///
/// let data = load(Cursor::new(b"\xEF\xBB\xBF{'a': 'b'}")).unwrap();
/// assert!(data.as_record().is_some());
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the bytes are not UTF-8, or the text
/// does not load.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn load<R>(reader: R) -> Result<LoadedData>
where
    R: io::Read,
{
    load_with_options(reader, &LoadOptions::default())
}

/// Loads records from an I/O stream with options.
///
/// # Errors
///
/// Same as [`load`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn load_with_options<R>(reader: R, options: &LoadOptions) -> Result<LoadedData>
where
    R: io::Read,
{
    Loader::new().load_reader(reader, options)
}
