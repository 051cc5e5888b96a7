//! Compilation of annotations into validator predicates.
//!
//! A [`ValidatorCompiler`] turns annotation strings into [`Validator`]s and
//! memoizes them by normalized annotation, so every record and every key
//! sharing a type shares one predicate. Element validators of collections go
//! through the same cache: compiling `dict[str,list[int]]` also caches
//! `str` and `list[int]`, which in turn caches `int`.
//!
//! The cache is guarded by a [`RwLock`], so one compiler can serve loads on
//! several threads at once.
//!
//! ## Examples
//!
//! ```rust
//! use latex2pydata::{parse_literal, ValidatorCompiler};
//!
//! let compiler = ValidatorCompiler::new();
//! let validator = compiler.compile("dict[int, float]").unwrap();
//!
//! assert!(validator.validate(&parse_literal("{1: 1.0, 2: 2.0}").unwrap()));
//! assert!(!validator.validate(&parse_literal("{1: 'x'}").unwrap()));
//! assert_eq!(validator.annotation(), "dict[int,float]");
//! ```

use crate::annotation::{self, Annotation, SequenceKind};
use crate::{Result, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;

type Predicate = dyn Fn(&Value) -> bool + Send + Sync;

/// A compiled, immutable type check for one annotation.
///
/// Cloning is cheap; clones share the same predicate.
#[derive(Clone)]
pub struct Validator {
    annotation: Arc<str>,
    predicate: Arc<Predicate>,
}

impl Validator {
    fn new<F>(annotation: &Annotation, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Validator {
            annotation: Arc::from(annotation.to_string()),
            predicate: Arc::new(predicate),
        }
    }

    /// Returns `true` if the value satisfies the annotation.
    #[inline]
    #[must_use]
    pub fn validate(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    /// The normalized annotation this validator was compiled from.
    #[must_use]
    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    /// Returns `true` if both validators share one compiled predicate.
    #[must_use]
    pub fn shares_predicate(&self, other: &Validator) -> bool {
        Arc::ptr_eq(&self.predicate, &other.predicate)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("annotation", &self.annotation)
            .finish_non_exhaustive()
    }
}

/// Compiles annotations into [`Validator`]s, caching one per normalized
/// annotation for the lifetime of the compiler.
#[derive(Default)]
pub struct ValidatorCompiler {
    cache: RwLock<HashMap<String, Validator>>,
}

impl ValidatorCompiler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles an annotation string, reusing a cached validator when the
    /// normalized annotation was compiled before.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`](crate::Error::Schema) if the annotation does
    /// not match the grammar.
    pub fn compile(&self, annotation: &str) -> Result<Validator> {
        let normalized = annotation::normalize(annotation);
        if let Some(validator) = self.lookup(&normalized) {
            return Ok(validator);
        }
        let parsed = Annotation::parse(&normalized)?;
        self.compile_annotation(&parsed)
    }

    /// Compiles an already parsed annotation.
    pub fn compile_annotation(&self, annotation: &Annotation) -> Result<Validator> {
        let key = annotation.to_string();
        if let Some(validator) = self.lookup(&key) {
            return Ok(validator);
        }

        trace!(annotation = %key, "validator cache miss");
        let validator = self.build(annotation)?;

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        // another thread may have raced us here; keep the first entry
        Ok(cache.entry(key).or_insert(validator).clone())
    }

    /// Number of cached validators.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn lookup(&self, key: &str) -> Option<Validator> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        let found = cache.get(key).cloned();
        if found.is_some() {
            trace!(annotation = %key, "validator cache hit");
        }
        found
    }

    fn build(&self, annotation: &Annotation) -> Result<Validator> {
        let validator = match annotation {
            Annotation::Scalar(union) => {
                if let [single] = union.members() {
                    let single = *single;
                    Validator::new(annotation, move |value| single.matches(value))
                } else {
                    let union = union.clone();
                    Validator::new(annotation, move |value| union.matches(value))
                }
            }
            Annotation::Sequence { kind, item } => {
                let item = self.compile_annotation(item)?;
                match kind {
                    SequenceKind::List => Validator::new(annotation, move |value| match value {
                        Value::List(items) => items.iter().all(|x| item.validate(x)),
                        _ => false,
                    }),
                    SequenceKind::Set => Validator::new(annotation, move |value| match value {
                        Value::Set(items) => items.iter().all(|x| item.validate(x)),
                        _ => false,
                    }),
                }
            }
            Annotation::Mapping { key, value } => {
                let key = self.compile_annotation(&Annotation::Scalar(key.clone()))?;
                let value_validator = self.compile_annotation(value)?;
                Validator::new(annotation, move |candidate| match candidate {
                    Value::Dict(dict) => dict
                        .iter()
                        .all(|(k, v)| key.validate(k) && value_validator.validate(v)),
                    _ => false,
                })
            }
        };
        Ok(validator)
    }
}

impl fmt::Debug for ValidatorCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorCompiler")
            .field("cached", &self.cached_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_literal, Error};

    fn check(annotation: &str, literal: &str) -> bool {
        ValidatorCompiler::new()
            .compile(annotation)
            .unwrap()
            .validate(&parse_literal(literal).unwrap())
    }

    #[test]
    fn test_scalar_validators() {
        assert!(check("int", "123"));
        assert!(check("int", "123456789012345678901234567890"));
        assert!(!check("int", "True"));
        assert!(check("bool", "True"));
        assert!(check("str", "'abc'"));
        assert!(check("None", "None"));
        assert!(check("bytes", "b'x'"));
        assert!(check("tuple", "(1, 'a', [2])"));
        assert!(check("int|float", "1.5"));
        assert!(!check("int|float", "'1.5'"));
    }

    #[test]
    fn test_collection_validators() {
        assert!(check("list[int]", "[1, 2, 3]"));
        assert!(check("list[int]", "[]"));
        assert!(!check("list[int]", "(1, 2)"));
        assert!(!check("list[int]", "[1, 'x']"));
        assert!(check("set[str]", "{'a', 'b'}"));
        assert!(check("set[str]", "set()"));
        assert!(!check("set[str]", "{}"));
        assert!(check("dict[int,float]", "{1: 1.0, 2: 2.0}"));
        assert!(!check("dict[int,float]", "{1: 'x'}"));
        assert!(!check("dict[int,float]", "{'1': 1.0}"));
    }

    #[test]
    fn test_nested_validators() {
        assert!(check("list[set[int|float]]", "[{1, 2.3}, {4, 5}, {6.0, 7.1}]"));
        assert!(!check("list[set[int|float]]", "[{1, 2.3}, [4]]"));
        assert!(check("dict[str,list[int]]", "{'a': [1], 'b': []}"));
        assert!(!check("dict[str,list[int]]", "{'a': [1.0]}"));
        assert!(!check("set[list[int]]", "{(1,)}"));
        assert!(check("set[tuple]", "{(1,), (2, 3)}"));
    }

    #[test]
    fn test_memoization() {
        let compiler = ValidatorCompiler::new();
        let a = compiler.compile("dict[int, list[float]]").unwrap();
        let b = compiler.compile("dict[int,list[float]]").unwrap();
        assert!(a.shares_predicate(&b));
        // dict[int,list[float]], int, list[float], float
        assert_eq!(compiler.cached_len(), 4);

        let c = compiler.compile("list[float]").unwrap();
        assert_eq!(compiler.cached_len(), 4);
        assert_eq!(c.annotation(), "list[float]");
    }

    #[test]
    fn test_invalid_annotation() {
        let compiler = ValidatorCompiler::new();
        assert!(matches!(compiler.compile("list[int"), Err(Error::Schema(_))));
        assert_eq!(compiler.cached_len(), 0);
    }

    #[test]
    fn test_shared_across_threads() {
        let compiler = Arc::new(ValidatorCompiler::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let compiler = Arc::clone(&compiler);
                std::thread::spawn(move || {
                    let annotation = if i % 2 == 0 { "list[int]" } else { "set[str]" };
                    compiler.compile(annotation).unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        // list[int], int, set[str], str
        assert_eq!(compiler.cached_len(), 4);
    }
}
