// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered property bags with insert-once keys
//!
//! A [`PropertyBag`] backs both the per-operation custom properties and the
//! process-wide [`GlobalProps`] registry. Keys are unique: inserting an
//! existing key is an error, never an overwrite.

use crate::error::{OplogError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// A property value: a scalar or a nested bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bag(PropertyBag),
}

impl PropValue {
    /// Short type label used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            PropValue::Null => "null",
            PropValue::Bool(_) => "bool",
            PropValue::Int(_) => "integer",
            PropValue::Float(_) => "float",
            PropValue::Str(_) => "string",
            PropValue::Bag(_) => "bag",
        }
    }

    /// True for string, bool, integer and float values
    pub fn is_primitive_scalar(&self) -> bool {
        matches!(
            self,
            PropValue::Bool(_) | PropValue::Int(_) | PropValue::Float(_) | PropValue::Str(_)
        )
    }
}

impl std::fmt::Display for PropValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropValue::Null => write!(f, "null"),
            PropValue::Bool(v) => write!(f, "{}", v),
            PropValue::Int(v) => write!(f, "{}", v),
            PropValue::Float(v) => write!(f, "{}", v),
            PropValue::Str(v) => write!(f, "{}", v),
            PropValue::Bag(bag) => write!(f, "{}", bag),
        }
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Bool(v)
    }
}

impl From<i32> for PropValue {
    fn from(v: i32) -> Self {
        PropValue::Int(v.into())
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        PropValue::Int(v)
    }
}

impl From<u32> for PropValue {
    fn from(v: u32) -> Self {
        PropValue::Int(v.into())
    }
}

impl From<u64> for PropValue {
    fn from(v: u64) -> Self {
        // Values past i64::MAX keep their magnitude as a float
        match i64::try_from(v) {
            Ok(v) => PropValue::Int(v),
            Err(_) => PropValue::Float(v as f64),
        }
    }
}

impl From<usize> for PropValue {
    fn from(v: usize) -> Self {
        PropValue::from(v as u64)
    }
}

impl From<f32> for PropValue {
    fn from(v: f32) -> Self {
        PropValue::Float(v.into())
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Float(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Str(v.to_string())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::Str(v)
    }
}

impl From<PropertyBag> for PropValue {
    fn from(v: PropertyBag) -> Self {
        PropValue::Bag(v)
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(PropValue::Null, Into::into)
    }
}

/// Ordered key/value store that rejects duplicate keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag {
    entries: IndexMap<String, PropValue>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from pairs, failing on the first repeated key
    pub fn from_pairs<K, V, I>(pairs: I) -> Result<Self>
    where
        K: Into<String>,
        V: Into<PropValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut bag = Self::new();
        for (key, value) in pairs {
            bag.insert(key, value)?;
        }
        Ok(bag)
    }

    /// Insert a new key. An existing key is left untouched and reported.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Result<()> {
        self.insert_in("property bag", key.into(), value.into())
    }

    pub(crate) fn insert_in(&mut self, scope: &str, key: String, value: PropValue) -> Result<()> {
        if self.entries.contains_key(&key) {
            return Err(OplogError::DuplicateProperty {
                scope: scope.to_string(),
                key,
            });
        }
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

impl std::fmt::Display for PropertyBag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

/// Process-wide properties attached to every emitted record
///
/// This is an explicit registry object rather than hidden static state:
/// whoever builds an [`crate::Oplog`] decides which registry it reads, and
/// tests call [`GlobalProps::reset`] to isolate themselves. Clones share the
/// same underlying bag.
#[derive(Debug, Clone, Default)]
pub struct GlobalProps {
    inner: Arc<RwLock<PropertyBag>>,
}

impl GlobalProps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a process-wide property. Only primitive scalars are accepted.
    pub fn add(&self, key: impl Into<String>, value: impl Into<PropValue>) -> Result<()> {
        let key = key.into();
        let value = value.into();
        if !value.is_primitive_scalar() {
            return Err(OplogError::UnsupportedGlobalPropertyType {
                key,
                kind: value.kind(),
            });
        }
        let mut bag = self.inner.write().unwrap_or_else(|e| e.into_inner());
        bag.insert_in("global props", key, value)
    }

    pub fn get(&self, key: &str) -> Option<PropValue> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current properties, in registration order
    pub fn snapshot(&self) -> PropertyBag {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Remove every registered property
    pub fn reset(&self) {
        self.inner.write().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[cfg(test)]
#[path = "props_tests.rs"]
mod tests;
