//! Ordered containers for dict and set literals.
//!
//! [`PyDict`] and [`PySet`] wrap [`IndexMap`] and [`IndexSet`] so that
//! iteration follows source order, while equality and hashing ignore order
//! the way dict and set comparison does.
//!
//! ## Examples
//!
//! ```rust
//! use latex2pydata::{PyDict, Value};
//!
//! let mut dict = PyDict::new();
//! dict.insert(Value::from("b"), Value::from(2));
//! dict.insert(Value::from("a"), Value::from(1));
//!
//! let keys: Vec<_> = dict.keys().cloned().collect();
//! assert_eq!(keys, vec![Value::from("b"), Value::from("a")]);
//! ```

use crate::Value;
use indexmap::{IndexMap, IndexSet};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// An insertion-ordered dict of literal values.
///
/// Re-inserting an existing key replaces its value but keeps its position,
/// which gives "last value wins" for duplicate keys in a literal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PyDict(IndexMap<Value, Value>);

impl PyDict {
    /// Creates an empty `PyDict`.
    #[must_use]
    pub fn new() -> Self {
        PyDict(IndexMap::new())
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use latex2pydata::{PyDict, Value};
    ///
    /// let mut dict = PyDict::new();
    /// dict.insert(Value::from(1), Value::from(1.5));
    /// assert_eq!(dict.get(&Value::from(1)), Some(&Value::Float(1.5)));
    /// ```
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0.get(key)
    }

    /// Looks up a value by text key.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.0.get(&Value::Str(key.to_string()))
    }

    #[must_use]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Value, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, Value, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Value, Value> {
        self.0.iter()
    }
}

impl Hash for PyDict {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
        unordered_hash(self.0.iter()).hash(state);
    }
}

impl IntoIterator for PyDict {
    type Item = (Value, Value);
    type IntoIter = indexmap::map::IntoIter<Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PyDict {
    type Item = (&'a Value, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(Value, Value)> for PyDict {
    fn from_iter<T: IntoIterator<Item = (Value, Value)>>(iter: T) -> Self {
        PyDict(IndexMap::from_iter(iter))
    }
}

/// An insertion-ordered set of literal values. Duplicates collapse onto the
/// first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PySet(IndexSet<Value>);

impl PySet {
    /// Creates an empty `PySet`.
    #[must_use]
    pub fn new() -> Self {
        PySet(IndexSet::new())
    }

    /// Adds a value, returning `false` if it was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        self.0.insert(value)
    }

    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains(value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the elements, in insertion order.
    pub fn iter(&self) -> indexmap::set::Iter<'_, Value> {
        self.0.iter()
    }
}

impl Hash for PySet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
        unordered_hash(self.0.iter()).hash(state);
    }
}

impl IntoIterator for PySet {
    type Item = Value;
    type IntoIter = indexmap::set::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PySet {
    type Item = &'a Value;
    type IntoIter = indexmap::set::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Value> for PySet {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        PySet(IndexSet::from_iter(iter))
    }
}

// Order-independent combination so that equal sets and dicts hash equally.
fn unordered_hash<I, T>(items: I) -> u64
where
    I: Iterator<Item = T>,
    T: Hash,
{
    items
        .map(|item| {
            let mut hasher = DefaultHasher::new();
            item.hash(&mut hasher);
            hasher.finish()
        })
        .fold(0u64, u64::wrapping_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_dict_last_value_wins_first_position_kept() {
        let mut dict = PyDict::new();
        dict.insert(Value::from("a"), Value::from(1));
        dict.insert(Value::from("b"), Value::from(2));
        dict.insert(Value::from("a"), Value::from(3));

        let pairs: Vec<_> = dict.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        assert_eq!(
            pairs,
            vec![
                (Value::from("a"), Value::from(3)),
                (Value::from("b"), Value::from(2)),
            ]
        );
    }

    #[test]
    fn test_set_equality_ignores_order() {
        let a: PySet = vec![Value::from(1), Value::from(2)].into_iter().collect();
        let b: PySet = vec![Value::from(2), Value::from(1)].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_dict_hash_ignores_order() {
        let a: PyDict = vec![(Value::from(1), Value::from("x")), (Value::from(2), Value::from("y"))]
            .into_iter()
            .collect();
        let b: PyDict = vec![(Value::from(2), Value::from("y")), (Value::from(1), Value::from("x"))]
            .into_iter()
            .collect();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }
}
