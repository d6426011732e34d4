//! Sorted multimap keyed by composite (tuple-like) keys.

use std::collections::BTreeMap;

/// Map from a composite key to a list of values, kept in key order.
///
/// Keys are sequences of atoms compared lexicographically, so a key is
/// ordered before every longer key it is a prefix of. Values under one key
/// keep their insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedMultiMap<A: Ord, V> {
    map: BTreeMap<Vec<A>, Vec<V>>,
}

impl<A: Ord, V> Default for SortedMultiMap<A, V> {
    fn default() -> Self {
        Self { map: BTreeMap::new() }
    }
}

impl<A: Ord + Clone, V> SortedMultiMap<A, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the list stored at `key`.
    pub fn insert(&mut self, key: impl Into<Vec<A>>, value: V) {
        self.map.entry(key.into()).or_default().push(value);
    }

    pub fn get(&self, key: &[A]) -> Option<&[V]> {
        self.map.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &[A]) -> bool {
        self.map.contains_key(key)
    }

    /// Remove and return every value at `key`.
    pub fn remove(&mut self, key: &[A]) -> Option<Vec<V>> {
        self.map.remove(key)
    }

    /// Remove the first occurrence of `value` at `key`; the key disappears
    /// with its last value. Returns whether anything was removed.
    pub fn remove_value(&mut self, key: &[A], value: &V) -> bool
    where
        V: PartialEq,
    {
        let Some(values) = self.map.get_mut(key) else {
            return false;
        };
        let Some(pos) = values.iter().position(|v| v == value) else {
            return false;
        };
        values.remove(pos);
        if values.is_empty() {
            self.map.remove(key);
        }
        true
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of values across all keys.
    pub fn value_count(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[A], &[V])> {
        self.map.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &[A]> {
        self.map.keys().map(Vec::as_slice)
    }

    /// Every value, in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.map.values().flatten()
    }

    /// Entries whose key starts with `prefix`, in key order.
    pub fn prefix_range<'a>(&'a self, prefix: &'a [A]) -> impl Iterator<Item = (&'a [A], &'a [V])> + 'a {
        self.map
            .range(prefix.to_vec()..)
            .take_while(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    /// Regroup by the first `n` atoms of every key. Values of merged keys are
    /// concatenated in the original key order. Keys shorter than `n` stay as
    /// they are.
    pub fn trim_to_prefix(self, n: usize) -> Self {
        let mut out = Self::new();
        for (mut key, values) in self.map {
            key.truncate(n);
            out.map.entry(key).or_default().extend(values);
        }
        out
    }

    /// Append `other`'s values after this map's values at each key.
    pub fn merge(&mut self, other: Self) {
        for (key, values) in other.map {
            self.map.entry(key).or_default().extend(values);
        }
    }
}

impl<A: Ord + Clone, V, K: Into<Vec<A>>> FromIterator<(K, V)> for SortedMultiMap<A, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}
