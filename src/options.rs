//! Configuration options for loading.
//!
//! [`LoadOptions`] carries settings that take precedence over the metadata
//! directive, plus the literal nesting limit.
//!
//! ## Examples
//!
//! ```rust
//! use latex2pydata::{loads_with_options, LoadOptions, Schema, SchemaMissing, Value};
//!
//! let schema = Schema::from_pairs([("count", "int")]).unwrap();
//! let options = LoadOptions::new()
//!     .with_schema(schema)
//!     .with_schema_missing(SchemaMissing::Verbatim);
//!
//! let data = loads_with_options("{'count': '3', 'note': 'raw'}", &options).unwrap();
//! let record = data.as_record().unwrap();
//! assert_eq!(record.get_path("count").unwrap().as_value(), Some(&Value::Int(3)));
//! assert_eq!(record.get_path("note").unwrap().as_value(), Some(&Value::from("raw")));
//! ```

use crate::literal::DEFAULT_MAX_DEPTH;
use crate::{Schema, SchemaMissing};

/// Options for a single load.
///
/// `schema` and `schema_missing` override the metadata directive when set;
/// left as `None`, the directive (or the built-in default) applies.
///
/// # Examples
///
/// ```rust
/// use latex2pydata::{LoadOptions, DEFAULT_MAX_DEPTH};
///
/// let options = LoadOptions::new();
/// assert!(options.schema.is_none());
/// assert!(options.schema_missing.is_none());
/// assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LoadOptions {
    pub schema: Option<Schema>,
    pub schema_missing: Option<SchemaMissing>,
    pub max_depth: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            schema: None,
            schema_missing: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl LoadOptions {
    /// Creates default options: no overrides, default nesting limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses this schema instead of the directive's.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Uses this policy for keys without schema entry instead of the
    /// directive's.
    #[must_use]
    pub fn with_schema_missing(mut self, schema_missing: SchemaMissing) -> Self {
        self.schema_missing = Some(schema_missing);
        self
    }

    /// Sets the maximum container nesting for the payload and for every
    /// value parsed from it. The metadata directive is always parsed with
    /// [`DEFAULT_MAX_DEPTH`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use latex2pydata::{loads_with_options, LoadOptions};
    ///
    /// let options = LoadOptions::new().with_max_depth(1);
    /// assert!(loads_with_options("{'a': 'b'}", &options).is_ok());
    /// assert!(loads_with_options("[{'a': 'b'}]", &options).is_err());
    ///
    /// // the metadata directive keeps the default limit
    /// let input = "# latex2pydata metadata: {'schema': {'a': 'int'}}\n{'a': '1'}";
    /// assert!(loads_with_options(input, &options).is_ok());
    /// ```
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
