//! Schemas mapping key-paths to type annotations.
//!
//! A [`Schema`] is validated as it is built: every key must be a key-path
//! (dot-separated identifiers) and every value must be either a valid
//! [`Annotation`] or the reserved `verbatim` marker, which keeps the raw
//! string of the key untouched.
//!
//! ## Examples
//!
//! ```rust
//! use latex2pydata::{Schema, SchemaEntry};
//!
//! let schema = Schema::from_pairs([
//!     ("title", "str"),
//!     ("meta.year", "int"),
//!     ("body", "verbatim"),
//! ])
//! .unwrap();
//!
//! assert_eq!(schema.len(), 3);
//! assert_eq!(schema.get("body"), Some(&SchemaEntry::Verbatim));
//! assert!(Schema::from_pairs([("1st", "int")]).is_err());
//! ```

use crate::annotation::{self, Annotation};
use crate::{Error, Result, Value};
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

const VERBATIM: &str = "verbatim";
const RAWSTR: &str = "rawstr";

/// Returns `true` if `key` is a key-path: one or more ASCII identifiers
/// joined by single dots.
///
/// # Examples
///
/// ```rust
/// use latex2pydata::schema::is_valid_keypath;
///
/// assert!(is_valid_keypath("main_1.sub2.__subsub"));
/// assert!(!is_valid_keypath("main..sub"));
/// assert!(!is_valid_keypath("2nd"));
/// ```
#[must_use]
pub fn is_valid_keypath(key: &str) -> bool {
    !key.is_empty() && key.split('.').all(is_identifier)
}

fn is_identifier(segment: &str) -> bool {
    let mut bytes = segment.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() || first == b'_' => {
            bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
        }
        _ => false,
    }
}

/// What a schema says about one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaEntry {
    /// Keep the raw string.
    Verbatim,
    /// Parse the raw string as a literal and check it against the annotation.
    Typed(Annotation),
}

impl SchemaEntry {
    /// Parses a schema value: `verbatim`, the deprecated `rawstr`, or an
    /// annotation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if the value is not a valid annotation.
    pub fn parse(value: &str) -> Result<Self> {
        let normalized = annotation::normalize(value);
        match normalized.as_str() {
            VERBATIM => Ok(SchemaEntry::Verbatim),
            RAWSTR => {
                warn!("schema value \"rawstr\" is deprecated, use \"verbatim\"");
                Ok(SchemaEntry::Verbatim)
            }
            _ => Annotation::parse(&normalized).map(SchemaEntry::Typed),
        }
    }
}

impl fmt::Display for SchemaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaEntry::Verbatim => f.write_str(VERBATIM),
            SchemaEntry::Typed(annotation) => write!(f, "{}", annotation),
        }
    }
}

/// An insertion-ordered mapping from key-path to [`SchemaEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    entries: IndexMap<String, SchemaEntry>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing any previous entry for the key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if the key is not a key-path or the value is
    /// neither `verbatim` nor a valid annotation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use latex2pydata::Schema;
    ///
    /// let mut schema = Schema::new();
    /// schema.insert("scores", "dict[str, list[int]]").unwrap();
    /// assert_eq!(schema.get("scores").unwrap().to_string(), "dict[str,list[int]]");
    ///
    /// assert!(schema.insert("scores", "list[int").is_err());
    /// ```
    pub fn insert(&mut self, key: &str, value: &str) -> Result<&mut Self> {
        if !is_valid_keypath(key) {
            return Err(Error::schema(format!(
                "Invalid or unsupported schema key \"{}\"",
                key
            )));
        }
        let entry = SchemaEntry::parse(value)?;
        self.entries.insert(key.to_string(), entry);
        Ok(self)
    }

    /// Builds a schema from `(key, value)` pairs, validating each one.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut schema = Schema::new();
        for (key, value) in pairs {
            schema.insert(key.as_ref(), value.as_ref())?;
        }
        Ok(schema)
    }

    /// Builds a schema from a parsed literal, which must be a dict of
    /// strings to strings.
    pub fn from_value(value: &Value) -> Result<Self> {
        const SHAPE: &str = "Invalid schema (must be dict[str, str])";

        let dict = value.as_dict().ok_or_else(|| Error::schema(SHAPE))?;
        let mut schema = Schema::new();
        for (key, value) in dict {
            match (key, value) {
                (Value::Str(key), Value::Str(value)) => {
                    schema.insert(key, value)?;
                }
                _ => return Err(Error::schema(SHAPE)),
            }
        }
        Ok(schema)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SchemaEntry> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in declaration order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, SchemaEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = (&'a String, &'a SchemaEntry);
    type IntoIter = indexmap::map::Iter<'a, String, SchemaEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Policy for keys that have no schema entry.
///
/// # Examples
///
/// ```rust
/// use latex2pydata::SchemaMissing;
///
/// let policy: SchemaMissing = "evalany".parse().unwrap();
/// assert_eq!(policy, SchemaMissing::EvalAny);
/// assert_eq!(SchemaMissing::default(), SchemaMissing::Error);
/// assert!("ignore".parse::<SchemaMissing>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchemaMissing {
    /// Fail the load.
    #[default]
    Error,
    /// Keep the raw string.
    Verbatim,
    /// Parse the raw string as a literal of any type.
    EvalAny,
}

impl SchemaMissing {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SchemaMissing::Error => "error",
            SchemaMissing::Verbatim => VERBATIM,
            SchemaMissing::EvalAny => "evalany",
        }
    }
}

impl FromStr for SchemaMissing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "error" => Ok(SchemaMissing::Error),
            VERBATIM => Ok(SchemaMissing::Verbatim),
            RAWSTR => {
                warn!("schema_missing value \"rawstr\" is deprecated, use \"verbatim\"");
                Ok(SchemaMissing::Verbatim)
            }
            "evalany" => Ok(SchemaMissing::EvalAny),
            other => Err(Error::schema(format!(
                "Invalid \"schema_missing\" value \"{}\"",
                other
            ))),
        }
    }
}

impl fmt::Display for SchemaMissing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
