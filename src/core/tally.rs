//! Insertion-ordered maps and counters.
//!
//! Every per-key statistic (sender counts, word counts, emoji counts, ...)
//! is an [`OrderedMap`]. Iteration always follows first-insertion order and
//! ranking uses a stable sort, so equal counts keep the order in which their
//! keys were first seen. Two runs over the same messages therefore produce
//! the same tallies in the same order.
//!
//! # Example
//!
//! ```
//! use chatwrap::core::tally::Tally;
//!
//! let mut senders: Tally<String> = Tally::new();
//! senders.increment("Bob");
//! senders.increment("Alice");
//! senders.increment("Alice");
//! senders.increment("Carol");
//!
//! let top: Vec<_> = senders.top(2).into_iter().map(|(k, n)| (k.as_str(), n)).collect();
//! assert_eq!(top, vec![("Alice", 2), ("Bob", 1)]);
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use serde::{Serialize, Serializer};

/// A map that remembers the order in which keys were first inserted.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

/// A counter keyed by `K`.
pub type Tally<K> = OrderedMap<K, u64>;

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone, V> OrderedMap<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Returns the value for `key`, inserting `V::default()` at the end of
    /// the order if the key is new.
    pub fn get_or_default<Q>(&mut self, key: &Q) -> &mut V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
        V: Default,
    {
        let idx = if let Some(&i) = self.index.get(key) {
            i
        } else {
            let owned = key.to_owned();
            let i = self.entries.len();
            self.index.insert(owned.clone(), i);
            self.entries.push((owned, V::default()));
            i
        };
        &mut self.entries[idx].1
    }

    /// Inserts or replaces a value. A replaced key keeps its original position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&i) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Entries sorted by `score` descending, equal scores in insertion order,
    /// truncated to `limit`.
    pub fn ranked_by<F>(&self, limit: usize, score: F) -> Vec<(&K, &V)>
    where
        F: Fn(&V) -> u64,
    {
        let mut ranked: Vec<(&K, &V)> = self.iter().collect();
        ranked.sort_by(|a, b| score(b.1).cmp(&score(a.1)));
        ranked.truncate(limit);
        ranked
    }
}

impl<K: Hash + Eq + Clone> OrderedMap<K, u64> {
    /// Adds one to the count for `key`.
    pub fn increment<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        *self.get_or_default(key) += 1;
    }

    /// Adds `n` to the count for `key`, inserting it even when `n` is zero.
    pub fn add<Q>(&mut self, key: &Q, n: u64)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        *self.get_or_default(key) += n;
    }

    /// Ensures `key` is present without changing its count.
    pub fn touch<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        self.get_or_default(key);
    }

    /// Count for `key`, zero when absent.
    pub fn count<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.values().sum()
    }

    /// The `n` highest counts, ties in insertion order.
    pub fn top(&self, n: usize) -> Vec<(&K, u64)> {
        self.ranked_by(n, |v| *v)
            .into_iter()
            .map(|(k, v)| (k, *v))
            .collect()
    }

    /// Every entry sorted by count, ties in insertion order.
    pub fn sorted(&self) -> Vec<(&K, u64)> {
        self.top(self.len())
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Serialize, V: Serialize> Serialize for OrderedMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

impl<K: Hash + Eq + Clone, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
