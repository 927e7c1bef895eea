//! Environment mappings and the sources that produce them.
//!
//! Every source yields an [`EnvMap`]: a flat mapping from uppercase keys to
//! raw string values. Sources are combined with [`merge`], where later maps
//! override earlier ones key by key.
//!
//! - [`dotenv`]: `KEY=VALUE` buffers and files
//! - [`process`]: a snapshot of the current process environment

pub mod dotenv;
pub mod process;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A flat key to value mapping with uppercase keys.
///
/// Keys are uppercased on insertion and lookup, so `get("database_host")`
/// and `get("DATABASE_HOST")` are the same entry.
///
/// # Examples
///
/// ```
/// use envconf::EnvMap;
///
/// let mut env = EnvMap::new();
/// env.insert("database_host", "localhost");
/// assert_eq!(env.get("DATABASE_HOST"), Some("localhost"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvMap(BTreeMap<String, String>);

impl EnvMap {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Inserts a value, returning the one it replaced.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.as_ref().to_uppercase(), value.into())
    }

    /// Looks up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(&key.to_uppercase()).map(String::as_str)
    }

    /// Returns true if `key` has a value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(&key.to_uppercase())
    }

    /// Removes a value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(&key.to_uppercase())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copies every entry of `other` into `self`, overwriting on conflict.
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }
}

impl<'de> Deserialize<'de> for EnvMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, String>::deserialize(deserializer).map(|map| map.into_iter().collect())
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for EnvMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Self::new();
        env.extend(iter);
        env
    }
}

impl<K: AsRef<str>, V: Into<String>> Extend<(K, V)> for EnvMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for EnvMap {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Merges mappings in order from lowest to highest precedence.
///
/// # Examples
///
/// ```
/// use envconf::source::merge;
/// use envconf::EnvMap;
///
/// let low: EnvMap = [("PORT", "80"), ("HOST", "a")].into_iter().collect();
/// let high: EnvMap = [("port", "8080")].into_iter().collect();
///
/// let merged = merge([low, high]);
/// assert_eq!(merged.get("PORT"), Some("8080"));
/// assert_eq!(merged.get("HOST"), Some("a"));
/// ```
pub fn merge<I>(maps: I) -> EnvMap
where
    I: IntoIterator<Item = EnvMap>,
{
    let mut result = EnvMap::new();

    for map in maps {
        result.merge_from(&map);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_uppercased() {
        let mut env = EnvMap::new();
        env.insert("MixedCase_Key", "v");
        assert_eq!(env.iter().next(), Some(("MIXEDCASE_KEY", "v")));
        assert!(env.contains_key("mixedcase_key"));
        assert_eq!(env.remove("MIXEDCASE_key"), Some("v".to_string()));
        assert!(env.is_empty());
    }

    #[test]
    fn test_insert_returns_replaced() {
        let mut env = EnvMap::new();
        assert_eq!(env.insert("a", "1"), None);
        assert_eq!(env.insert("A", "2"), Some("1".to_string()));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_merge_later_wins() {
        let first: EnvMap = [("a", "1"), ("b", "1")].into_iter().collect();
        let second: EnvMap = [("b", "2"), ("c", "2")].into_iter().collect();
        let third: EnvMap = [("c", "3")].into_iter().collect();

        let merged = merge([first, second, third]);
        assert_eq!(merged.get("a"), Some("1"));
        assert_eq!(merged.get("b"), Some("2"));
        assert_eq!(merged.get("c"), Some("3"));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge(Vec::new()).is_empty());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let env: EnvMap = [("host", "x")].into_iter().collect();
        let json = serde_json::to_string(&env).unwrap();
        assert_eq!(json, r#"{"HOST":"x"}"#);
    }

    #[test]
    fn test_deserialize_normalizes_keys() {
        let env: EnvMap = serde_json::from_str(r#"{"host":"x","Port":"1"}"#).unwrap();
        assert_eq!(env.iter().collect::<Vec<_>>(), vec![("HOST", "x"), ("PORT", "1")]);
    }
}
