//! Loaded records.
//!
//! A record's dotted key-paths are expanded into nested [`DataMap`]s, so the
//! key `main.sub.leaf` ends up as `main -> sub -> leaf`. Key order follows the
//! order in which keys first appear in the record.
//!
//! ## Examples
//!
//! ```rust
//! use latex2pydata::{DataMap, Value};
//!
//! let mut record = DataMap::new();
//! record.insert_path("main.sub", Value::from(1.5)).unwrap();
//! record.insert_path("main.other", Value::from("x")).unwrap();
//!
//! assert_eq!(record.get_path("main.sub").unwrap().as_value(), Some(&Value::Float(1.5)));
//! assert_eq!(record.to_value().to_string(), "{'main': {'sub': 1.5, 'other': 'x'}}");
//!
//! assert!(record.insert_path("main.sub.deeper", Value::None).is_err());
//! ```

use crate::{Error, PyDict, Result, Value};
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// An insertion-ordered map from key segment to [`DataNode`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataMap(IndexMap<String, DataNode>);

/// A leaf value or a nested map created by a dotted key-path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataNode {
    Value(Value),
    Map(DataMap),
}

impl DataMap {
    #[must_use]
    pub fn new() -> Self {
        DataMap(IndexMap::new())
    }

    /// Looks up a single segment.
    #[must_use]
    pub fn get(&self, segment: &str) -> Option<&DataNode> {
        self.0.get(segment)
    }

    /// Walks a dotted key-path through nested maps.
    #[must_use]
    pub fn get_path(&self, keypath: &str) -> Option<&DataNode> {
        let mut segments = keypath.split('.');
        let first = segments.next()?;
        let mut node = self.0.get(first)?;
        for segment in segments {
            node = node.as_map()?.0.get(segment)?;
        }
        Some(node)
    }

    /// Inserts a value at a dotted key-path, creating intermediate maps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeypathConflict`] if the path descends through a
    /// segment that holds a value, or if the leaf already holds a nested map.
    pub fn insert_path(&mut self, keypath: &str, value: Value) -> Result<()> {
        let segments: Vec<&str> = keypath.split('.').collect();
        let (leaf, parents) = segments
            .split_last()
            .ok_or_else(|| Error::record_shape(format!("Unsupported key name \"{}\"", keypath)))?;

        let mut current = self;
        for (i, segment) in parents.iter().enumerate() {
            let node = current
                .0
                .entry((*segment).to_string())
                .or_insert_with(|| DataNode::Map(DataMap::new()));
            current = match node {
                DataNode::Map(map) => map,
                DataNode::Value(_) => {
                    return Err(Error::keypath_conflict(keypath, &segments[..=i].join(".")))
                }
            };
        }

        match current.0.entry((*leaf).to_string()) {
            Entry::Occupied(mut occupied) => {
                if let DataNode::Map(_) = occupied.get() {
                    return Err(Error::keypath_conflict(keypath, keypath));
                }
                occupied.insert(DataNode::Value(value));
            }
            Entry::Vacant(vacant) => {
                vacant.insert(DataNode::Value(value));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, DataNode> {
        self.0.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, DataNode> {
        self.0.iter()
    }

    /// Converts into a string-keyed [`Value::Dict`], recursively.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let dict: PyDict = self
            .0
            .iter()
            .map(|(k, node)| (Value::Str(k.clone()), node.to_value()))
            .collect();
        Value::Dict(dict)
    }
}

impl<'a> IntoIterator for &'a DataMap {
    type Item = (&'a String, &'a DataNode);
    type IntoIter = indexmap::map::Iter<'a, String, DataNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl DataNode {
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            DataNode::Value(v) => Some(v),
            DataNode::Map(_) => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&DataMap> {
        match self {
            DataNode::Map(m) => Some(m),
            DataNode::Value(_) => None,
        }
    }

    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, DataNode::Map(_))
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            DataNode::Value(v) => v.clone(),
            DataNode::Map(m) => m.to_value(),
        }
    }
}

/// The result of a load: one record, or a list of records when the payload
/// was a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedData {
    Record(DataMap),
    Batch(Vec<DataMap>),
}

impl LoadedData {
    #[must_use]
    pub fn as_record(&self) -> Option<&DataMap> {
        match self {
            LoadedData::Record(record) => Some(record),
            LoadedData::Batch(_) => None,
        }
    }

    #[must_use]
    pub fn as_batch(&self) -> Option<&[DataMap]> {
        match self {
            LoadedData::Batch(records) => Some(records),
            LoadedData::Record(_) => None,
        }
    }

    /// All records, a single record counting as a batch of one.
    #[must_use]
    pub fn records(&self) -> &[DataMap] {
        match self {
            LoadedData::Record(record) => std::slice::from_ref(record),
            LoadedData::Batch(records) => records,
        }
    }

    /// Converts into a [`Value::Dict`] or a [`Value::List`] of dicts.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            LoadedData::Record(record) => record.to_value(),
            LoadedData::Batch(records) => {
                Value::List(records.iter().map(DataMap::to_value).collect())
            }
        }
    }
}

impl Serialize for DataMap {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl Serialize for DataNode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DataNode::Value(v) => v.serialize(serializer),
            DataNode::Map(m) => m.serialize(serializer),
        }
    }
}

impl Serialize for LoadedData {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            LoadedData::Record(record) => record.serialize(serializer),
            LoadedData::Batch(records) => {
                let mut seq = serializer.serialize_seq(Some(records.len()))?;
                for record in records {
                    seq.serialize_element(record)?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_insert() {
        let mut record = DataMap::new();
        record.insert_path("main_1.sub2.__subsub", Value::from(1.23)).unwrap();
        record.insert_path("top", Value::from(true)).unwrap();

        let sub = record.get("main_1").unwrap().as_map().unwrap();
        assert!(sub.get("sub2").unwrap().is_map());
        assert_eq!(
            record.get_path("main_1.sub2.__subsub"),
            Some(&DataNode::Value(Value::Float(1.23)))
        );
        assert_eq!(record.get_path("main_1.missing"), None);
        assert_eq!(record.get_path("top.deeper"), None);
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["main_1", "top"]);
    }

    #[test]
    fn test_conflict_descending_through_value() {
        let mut record = DataMap::new();
        record.insert_path("a.b", Value::from(1)).unwrap();
        let err = record.insert_path("a.b.c", Value::from(2)).unwrap_err();
        assert_eq!(err, Error::keypath_conflict("a.b.c", "a.b"));
    }

    #[test]
    fn test_conflict_overwriting_map() {
        let mut record = DataMap::new();
        record.insert_path("a.b", Value::from(1)).unwrap();
        let err = record.insert_path("a", Value::from(2)).unwrap_err();
        assert_eq!(err, Error::keypath_conflict("a", "a"));
    }

    #[test]
    fn test_batch_views() {
        let mut record = DataMap::new();
        record.insert_path("k", Value::from("v")).unwrap();

        let single = LoadedData::Record(record.clone());
        assert_eq!(single.records().len(), 1);
        assert!(single.as_batch().is_none());

        let batch = LoadedData::Batch(vec![record.clone(), record]);
        assert_eq!(batch.records().len(), 2);
        assert_eq!(batch.to_value().to_string(), "[{'k': 'v'}, {'k': 'v'}]");
    }
}
