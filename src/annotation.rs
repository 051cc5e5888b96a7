//! Type annotation grammar.
//!
//! Annotations describe the expected type of a schema value:
//!
//! ```text
//! annotation := scalar-union | collection(2)
//! collection(n) := ("list" | "set") "[" element(n) "]"
//!                | "dict" "[" scalar-union "," element(n) "]"
//! element(n) := scalar-union | collection(n - 1)      (only when n > 1)
//! scalar-union := scalar ("|" scalar)*
//! scalar := "bool" | "bytes" | "float" | "int" | "None" | "str" | "tuple"
//! ```
//!
//! Collections therefore nest at most two levels deep, dict keys are always
//! scalar unions, and a union never contains a collection. Whitespace is
//! removed before matching, so `dict[int, float]` and `dict[int,float]` are
//! the same annotation.
//!
//! ## Examples
//!
//! ```rust
//! use latex2pydata::Annotation;
//!
//! let annotation = Annotation::parse("list[set[int | float]]").unwrap();
//! assert_eq!(annotation.to_string(), "list[set[int|float]]");
//! assert_eq!(annotation.depth(), 2);
//!
//! assert!(Annotation::parse("list[list[list[int]]]").is_err());
//! ```

use crate::{Error, Result, Value};
use std::fmt;
use std::str::FromStr;

/// A scalar type name. `tuple` is a scalar: its elements are not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    Bytes,
    Float,
    Int,
    None,
    Str,
    Tuple,
}

impl ScalarType {
    /// Looks up a scalar type by its annotation name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(ScalarType::Bool),
            "bytes" => Some(ScalarType::Bytes),
            "float" => Some(ScalarType::Float),
            "int" => Some(ScalarType::Int),
            "None" => Some(ScalarType::None),
            "str" => Some(ScalarType::Str),
            "tuple" => Some(ScalarType::Tuple),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Bytes => "bytes",
            ScalarType::Float => "float",
            ScalarType::Int => "int",
            ScalarType::None => "None",
            ScalarType::Str => "str",
            ScalarType::Tuple => "tuple",
        }
    }

    /// Returns `true` if the value carries this type tag. `bool` is not an
    /// `int`, and `int` is not a `float`.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            ScalarType::Bool => value.is_bool(),
            ScalarType::Bytes => value.is_bytes(),
            ScalarType::Float => value.is_float(),
            ScalarType::Int => value.is_int(),
            ScalarType::None => value.is_none(),
            ScalarType::Str => value.is_str(),
            ScalarType::Tuple => value.is_tuple(),
        }
    }
}

/// A non-empty `|`-joined union of scalar types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScalarUnion(Vec<ScalarType>);

impl ScalarUnion {
    #[must_use]
    pub fn members(&self) -> &[ScalarType] {
        &self.0
    }

    /// Returns `true` if any member matches the value.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        self.0.iter().any(|t| t.matches(value))
    }
}

impl fmt::Display for ScalarUnion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, t) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(t.name())?;
        }
        Ok(())
    }
}

/// Homogeneous collection kinds with a single element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    List,
    Set,
}

impl SequenceKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SequenceKind::List => "list",
            SequenceKind::Set => "set",
        }
    }
}

/// A parsed type annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Annotation {
    Scalar(ScalarUnion),
    Sequence {
        kind: SequenceKind,
        item: Box<Annotation>,
    },
    Mapping {
        key: ScalarUnion,
        value: Box<Annotation>,
    },
}

impl Annotation {
    /// Maximum collection nesting.
    pub const MAX_DEPTH: usize = 2;

    /// Parses an annotation, ignoring whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] for unknown names, dangling `|`, unbalanced
    /// brackets, wrong dict arity, unions containing collections, trailing
    /// input, or nesting deeper than [`Annotation::MAX_DEPTH`].
    pub fn parse(annotation: &str) -> Result<Self> {
        let normalized = normalize(annotation);
        let mut parser = AnnotationParser {
            source: &normalized,
            position: 0,
        };
        let parsed = parser
            .parse_annotation(Self::MAX_DEPTH)
            .and_then(|parsed| {
                if parser.position == normalized.len() {
                    Ok(parsed)
                } else {
                    Err("unexpected trailing input".to_string())
                }
            });
        parsed.map_err(|detail| {
            Error::schema(format!(
                "Invalid or unsupported type annotation \"{}\" ({})",
                annotation, detail
            ))
        })
    }

    /// Number of collection levels: 0 for scalars, at most 2.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Annotation::Scalar(_) => 0,
            Annotation::Sequence { item, .. } => 1 + item.depth(),
            Annotation::Mapping { value, .. } => 1 + value.depth(),
        }
    }

    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Annotation::Scalar(_))
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Scalar(union) => write!(f, "{}", union),
            Annotation::Sequence { kind, item } => write!(f, "{}[{}]", kind.name(), item),
            Annotation::Mapping { key, value } => write!(f, "dict[{},{}]", key, value),
        }
    }
}

impl FromStr for Annotation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Annotation::parse(s)
    }
}

/// Removes all whitespace from an annotation string.
#[must_use]
pub fn normalize(annotation: &str) -> String {
    annotation.chars().filter(|c| !c.is_whitespace()).collect()
}

struct AnnotationParser<'a> {
    source: &'a str,
    position: usize,
}

type ParseResult<T> = std::result::Result<T, String>;

impl<'a> AnnotationParser<'a> {
    fn peek_char(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.position += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> ParseResult<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            match self.peek_char() {
                Some(found) => Err(format!("expected '{}', found '{}'", expected, found)),
                None => Err(format!("expected '{}', found end of annotation", expected)),
            }
        }
    }

    fn read_name(&mut self) -> &'a str {
        let source = self.source;
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.position += 1;
            } else {
                break;
            }
        }
        &source[start..self.position]
    }

    fn parse_annotation(&mut self, levels_left: usize) -> ParseResult<Annotation> {
        let name = self.read_name();
        let kind = match name {
            "list" => Some(SequenceKind::List),
            "set" => Some(SequenceKind::Set),
            "dict" => None,
            _ => return self.parse_union(name).map(Annotation::Scalar),
        };

        if levels_left == 0 {
            return Err("collections nest at most two levels deep".to_string());
        }
        self.expect('[')?;

        let annotation = match kind {
            Some(kind) => {
                let item = self.parse_annotation(levels_left - 1)?;
                Annotation::Sequence {
                    kind,
                    item: Box::new(item),
                }
            }
            None => {
                let key_name = self.read_name();
                let key = self.parse_union(key_name)?;
                self.expect(',')?;
                let value = self.parse_annotation(levels_left - 1)?;
                Annotation::Mapping {
                    key,
                    value: Box::new(value),
                }
            }
        };

        self.expect(']')?;
        Ok(annotation)
    }

    fn parse_union(&mut self, first: &str) -> ParseResult<ScalarUnion> {
        let mut members = vec![scalar(first)?];
        while self.eat('|') {
            let name = self.read_name();
            members.push(scalar(name)?);
        }
        Ok(ScalarUnion(members))
    }
}

fn scalar(name: &str) -> ParseResult<ScalarType> {
    if name.is_empty() {
        return Err("expected a type name".to_string());
    }
    ScalarType::from_name(name).ok_or_else(|| format!("\"{}\" is not a scalar type", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(s: &str) -> String {
        Annotation::parse(s).unwrap().to_string()
    }

    #[test]
    fn test_scalars() {
        for name in ["bool", "bytes", "float", "int", "None", "str", "tuple"] {
            assert_eq!(canonical(name), name);
        }
        assert_eq!(canonical(" int | float "), "int|float");
        assert!(Annotation::parse("int").unwrap().is_scalar());
    }

    #[test]
    fn test_collections() {
        assert_eq!(canonical("list[int]"), "list[int]");
        assert_eq!(canonical("set[ str|bytes ]"), "set[str|bytes]");
        assert_eq!(canonical("dict[int, float]"), "dict[int,float]");
        assert_eq!(canonical("list[set[int|float]]"), "list[set[int|float]]");
        assert_eq!(canonical("set[list[int]]"), "set[list[int]]");
        assert_eq!(canonical("dict[str,list[int]]"), "dict[str,list[int]]");
        assert_eq!(canonical("list[dict[str,int]]"), "list[dict[str,int]]");
    }

    #[test]
    fn test_structure() {
        let parsed = Annotation::parse("dict[str,set[int]]").unwrap();
        match parsed {
            Annotation::Mapping { key, value } => {
                assert_eq!(key.members(), &[ScalarType::Str]);
                assert_eq!(value.depth(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rejections() {
        for bad in [
            "",
            "int|",
            "|int",
            "int||float",
            "list int]",
            "list[int",
            "list[]",
            "list",
            "list[int]]",
            "list[list[list[int]]]",
            "dict[int]",
            "dict[int,float,str]",
            "dict[list[int],int]",
            "dict[str,dict[str,dict[str,int]]]",
            "int|list[int]",
            "list[int]|int",
            "Int",
            "none",
            "complex",
            "tuple[int]",
        ] {
            let err = Annotation::parse(bad).unwrap_err();
            assert!(
                matches!(err, Error::Schema(_)),
                "{:?} should be rejected as a schema error",
                bad
            );
        }
    }

    #[test]
    fn test_scalar_matching() {
        assert!(ScalarType::Int.matches(&Value::Int(1)));
        assert!(!ScalarType::Int.matches(&Value::Bool(true)));
        assert!(!ScalarType::Float.matches(&Value::Int(1)));
        assert!(ScalarType::None.matches(&Value::None));
        assert!(ScalarType::Tuple.matches(&Value::Tuple(vec![Value::from("x")])));
    }
}
