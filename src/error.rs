//! Error types for loading literal-encoded records.
//!
//! Every failure aborts the whole load: there are no partial results, and
//! loading the same input again reproduces the same error.
//!
//! ## Error Categories
//!
//! - **Metadata Errors**: the leading directive line is not a literal dict
//! - **Schema Errors**: invalid key-paths, annotations or `schema_missing` values
//! - **Record Shape Errors**: the payload is not `dict[str, str]` or a list of
//!   them, a key is not a valid key-path, or two key-paths collide
//! - **Syntax Errors**: a value or the payload is not a valid literal
//! - **Type Mismatches**: a parsed value does not satisfy its annotation
//! - **Missing Schema Entries**: a key has no schema entry under the `error` policy
//!
//! [`Error::kind`] folds the variants into these categories.
//!
//! ## Examples
//!
//! ```rust
//! use latex2pydata::{loads, ErrorKind};
//!
//! let err = loads("{'a': 1}").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::RecordShape);
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while loading records.
///
/// Each error variant includes enough context (key, annotation or source
/// position) to diagnose the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error while reading the input
    #[error("IO error: {0}")]
    Io(String),

    /// The input bytes are not valid UTF-8
    #[error("Decoding input failed: {0}")]
    Decode(String),

    /// The metadata directive is malformed or not a dict
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Invalid schema key, annotation or `schema_missing` value
    #[error("Invalid schema: {0}")]
    Schema(String),

    /// The payload is not `dict[str, str]` or `list[dict[str, str]]`
    #[error("Invalid data: {0}")]
    RecordShape(String),

    /// A key-path runs into a segment that already holds a different kind of value
    #[error("Key \"{key}\" conflicts with the existing value at \"{segment}\"")]
    KeypathConflict { key: String, segment: String },

    /// Literal syntax error with source position
    #[error("Syntax error at line {line}, column {col}: {msg}\n{context}")]
    Syntax {
        line: usize,
        col: usize,
        msg: String,
        context: String,
    },

    /// The raw value of a key could not be parsed as a literal
    #[error("Invalid value for key \"{key}\":\n{source}")]
    InvalidValue { key: String, source: Box<Error> },

    /// The parsed value does not satisfy the declared annotation
    #[error("Key \"{key}\" should have value with type \"{expected}\"")]
    TypeMismatch { key: String, expected: String },

    /// The key has no schema entry and the policy is `error`
    #[error("Key \"{key}\" is missing a schema entry")]
    MissingSchemaEntry { key: String },
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    MetadataDirective,
    SchemaDeclaration,
    RecordShape,
    LiteralSyntax,
    TypeMismatch,
    MissingSchemaEntry,
}

impl Error {
    /// Returns the category this error belongs to.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use latex2pydata::{Error, ErrorKind};
    ///
    /// let err = Error::missing_schema_entry("title");
    /// assert_eq!(err.kind(), ErrorKind::MissingSchemaEntry);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) | Error::Decode(_) => ErrorKind::Io,
            Error::InvalidMetadata(_) => ErrorKind::MetadataDirective,
            Error::Schema(_) => ErrorKind::SchemaDeclaration,
            Error::RecordShape(_) | Error::KeypathConflict { .. } => ErrorKind::RecordShape,
            Error::Syntax { .. } | Error::InvalidValue { .. } => ErrorKind::LiteralSyntax,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::MissingSchemaEntry { .. } => ErrorKind::MissingSchemaEntry,
        }
    }

    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use latex2pydata::Error;
    ///
    /// let err = Error::syntax(10, 5, "unexpected token", "{'a' 1}");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str, context: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
            context: context.to_string(),
        }
    }

    /// Wraps a literal parsing failure with the key whose value failed.
    pub fn invalid_value(key: &str, source: Error) -> Self {
        Error::InvalidValue {
            key: key.to_string(),
            source: Box::new(source),
        }
    }

    /// Creates a type mismatch error for a key and its expected annotation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use latex2pydata::Error;
    ///
    /// let err = Error::type_mismatch("key1", "int");
    /// assert!(err.to_string().contains("type \"int\""));
    /// ```
    pub fn type_mismatch(key: &str, expected: &str) -> Self {
        Error::TypeMismatch {
            key: key.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Creates an error for a key without schema entry.
    pub fn missing_schema_entry(key: &str) -> Self {
        Error::MissingSchemaEntry {
            key: key.to_string(),
        }
    }

    /// Creates a key-path conflict error.
    pub fn keypath_conflict(key: &str, segment: &str) -> Self {
        Error::KeypathConflict {
            key: key.to_string(),
            segment: segment.to_string(),
        }
    }

    /// Creates an invalid metadata error.
    pub fn metadata<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidMetadata(msg.to_string())
    }

    /// Creates a schema declaration error.
    pub fn schema<T: fmt::Display>(msg: T) -> Self {
        Error::Schema(msg.to_string())
    }

    /// Creates a record shape error.
    pub fn record_shape<T: fmt::Display>(msg: T) -> Self {
        Error::RecordShape(msg.to_string())
    }

    /// Creates an I/O error for reading failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a decoding error for input that is not valid UTF-8.
    pub fn decode(msg: &str) -> Self {
        Error::Decode(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
