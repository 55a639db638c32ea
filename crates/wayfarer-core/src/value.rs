//! Default-valued tables for values, Q-values, weights and features

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::Hash;

/// Mapping from keys to real-valued estimates.
///
/// Reading a key that was never written yields the table's default (0.0
/// unless built with [`ValueTable::with_default`]); it is never an error.
/// Entries iterate in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable<K: Eq + Hash> {
    entries: IndexMap<K, f64>,
    default_value: f64,
}

impl<K: Eq + Hash> ValueTable<K> {
    /// Create an empty table defaulting to 0.0
    #[must_use]
    pub fn new() -> Self {
        Self::with_default(0.0)
    }

    /// Create an empty table with a custom default value
    #[must_use]
    pub fn with_default(default_value: f64) -> Self {
        Self {
            entries: IndexMap::new(),
            default_value,
        }
    }

    /// Value stored for `key`, or the default
    pub fn get(&self, key: &K) -> f64 {
        self.entries.get(key).copied().unwrap_or(self.default_value)
    }

    /// Overwrite the value for `key`
    pub fn set(&mut self, key: K, value: f64) {
        self.entries.insert(key, value);
    }

    /// Add `delta` to the value for `key`, starting from the default
    pub fn add(&mut self, key: K, delta: f64) {
        let default_value = self.default_value;
        *self.entries.entry(key).or_insert(default_value) += delta;
    }

    /// Number of explicit entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key has been written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Explicit entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    /// Sparse dot product over this table's explicit entries.
    ///
    /// Keys missing from `other` read as `other`'s default.
    pub fn dot(&self, other: &Self) -> f64 {
        self.iter().map(|(key, value)| value * other.get(key)).sum()
    }
}

impl<K: Eq + Hash> Default for ValueTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> FromIterator<(K, f64)> for ValueTable<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            default_value: 0.0,
        }
    }
}

impl<K: Eq + Hash> Extend<(K, f64)> for ValueTable<K> {
    fn extend<I: IntoIterator<Item = (K, f64)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

/// Serialized form; entries are a list of pairs so that composite keys
/// such as `(state, action)` survive formats with string-only map keys.
#[derive(Serialize)]
struct TableRef<'a, K> {
    default: f64,
    entries: Vec<(&'a K, f64)>,
}

#[derive(Deserialize)]
struct TableOwned<K> {
    default: f64,
    entries: Vec<(K, f64)>,
}

impl<K: Eq + Hash + Serialize> Serialize for ValueTable<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        TableRef {
            default: self.default_value,
            entries: self.entries.iter().map(|(k, v)| (k, *v)).collect(),
        }
        .serialize(serializer)
    }
}

impl<'de, K: Eq + Hash + DeserializeOwned> Deserialize<'de> for ValueTable<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let owned = TableOwned::<K>::deserialize(deserializer)?;
        Ok(Self {
            entries: owned.entries.into_iter().collect(),
            default_value: owned.default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_missing_keys_read_as_default() {
        let table: ValueTable<&str> = ValueTable::new();
        assert_eq!(table.get(&"anything"), 0.0);

        let table: ValueTable<&str> = ValueTable::with_default(-1.5);
        assert_eq!(table.get(&"anything"), -1.5);
        assert!(table.is_empty());
    }

    #[test]
    fn test_add_starts_from_default() {
        let mut table = ValueTable::with_default(2.0);
        table.add("a", 0.5);
        table.add("a", 0.5);
        assert_relative_eq!(table.get(&"a"), 3.0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let mut table = ValueTable::new();
        table.set("c", 1.0);
        table.set("a", 2.0);
        table.set("c", 3.0);
        let keys: Vec<_> = table.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, ["c", "a"]);
    }

    #[test]
    fn test_dot_is_sparse() {
        let features: ValueTable<String> =
            [("bias".to_string(), 1.0), ("x".to_string(), 2.0)].into_iter().collect();
        let weights: ValueTable<String> = [("x".to_string(), 0.25)].into_iter().collect();
        assert_relative_eq!(features.dot(&weights), 0.5);
    }

    #[test]
    fn test_serde_keeps_composite_keys() {
        let mut table = ValueTable::new();
        table.set((1u32, "go".to_string()), 0.5);
        table.set((2u32, "stay".to_string()), -1.0);

        let json = serde_json::to_string(&table).unwrap();
        let back: ValueTable<(u32, String)> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
