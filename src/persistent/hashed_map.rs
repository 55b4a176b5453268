//! Persistent (immutable) hash map built on a red-black tree.
//!
//! This module provides [`HashedMap`], the map value type of the runtime.
//!
//! # Overview
//!
//! Keys are hashed by the map's oracle down to the `i64` key space of an
//! [`RBTree`]. Each tree node carries a `NodeValue`: a primary entry, an
//! overflow chain for other keys that collided on the same hash, and a
//! tombstone flag.
//!
//! - O(log N) `get`, `put`, `del` (plus the length of a collision chain)
//! - O(1) `len` and `is_empty`
//! - O(N) `keys`, `values`, `key_value_pairs`, in no particular order
//!
//! Deletion never restructures the tree. It tombstones the node, or shrinks
//! its collision chain, through [`RBTree::modify`]. Once enough deletions
//! accumulate the map compacts itself by rebuilding a tree without
//! tombstoned nodes (see [`HashedMapConfig`]).
//!
//! # Examples
//!
//! ```rust
//! use weft::persistent::HashedMap;
//! use weft::CoreError;
//!
//! let empty: HashedMap<i64, &str> = HashedMap::new();
//! let one = empty.put(1, "a")?;
//! let two = one.put(2, "b")?;
//!
//! assert_eq!(two.get(&1), Ok(&"a"));
//! assert_eq!(one.get(&2), Err(CoreError::KeyNotFound));
//! assert_eq!(one.put(1, "x").err(), Some(CoreError::DuplicateKey));
//!
//! let (found, three) = two.del_with_flag(&1)?;
//! assert!(found);
//! assert!(three.get(&1).is_err());
//! assert_eq!(two.get(&1), Ok(&"a"));
//! # Ok::<(), CoreError>(())
//! ```

use std::fmt;

use tracing::debug;

use super::ReferenceCounter;
use super::list::PList;
use super::oracle::{DeepEqual, KeyHasher, StdOracle};
use super::rbtree::{NodeHandler, RBTree, RBTreeIterator};
use crate::error::{CoreError, CoreResult};

// =============================================================================
// Configuration
// =============================================================================

/// Number of deletions after which a map considers compacting itself.
pub const DEFAULT_COMPACTION_THRESHOLD: usize = 1000;

/// Compaction settings carried by every version of a [`HashedMap`].
///
/// When a deletion pushes the map's deletion counter past
/// `compaction_threshold`, the map counts its tombstoned nodes. With at
/// least `min_tombstones_to_rebuild` of them it rebuilds a tree without
/// tombstones; otherwise it only resets the counter and keeps its tree.
///
/// # Examples
///
/// ```rust
/// use weft::persistent::HashedMapConfig;
///
/// let config = HashedMapConfig::default().with_compaction_threshold(10);
/// assert_eq!(config.compaction_threshold(), 10);
/// assert_eq!(config.min_tombstones_to_rebuild(), 5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashedMapConfig {
    compaction_threshold: usize,
    min_tombstones_to_rebuild: usize,
}

impl HashedMapConfig {
    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            compaction_threshold: DEFAULT_COMPACTION_THRESHOLD,
            min_tombstones_to_rebuild: DEFAULT_COMPACTION_THRESHOLD / 2,
        }
    }

    /// Sets the deletion count that triggers a compaction check.
    ///
    /// Also resets `min_tombstones_to_rebuild` to half the threshold.
    #[must_use]
    pub const fn with_compaction_threshold(self, compaction_threshold: usize) -> Self {
        Self {
            compaction_threshold,
            min_tombstones_to_rebuild: compaction_threshold / 2,
        }
    }

    /// Sets how many tombstoned nodes make a rebuild worthwhile.
    #[must_use]
    pub const fn with_min_tombstones_to_rebuild(self, min_tombstones_to_rebuild: usize) -> Self {
        Self {
            compaction_threshold: self.compaction_threshold,
            min_tombstones_to_rebuild,
        }
    }

    /// Returns the deletion count that triggers a compaction check.
    #[must_use]
    pub const fn compaction_threshold(&self) -> usize {
        self.compaction_threshold
    }

    /// Returns how many tombstoned nodes make a rebuild worthwhile.
    #[must_use]
    pub const fn min_tombstones_to_rebuild(&self) -> usize {
        self.min_tombstones_to_rebuild
    }
}

impl Default for HashedMapConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Node Payload
// =============================================================================

/// Payload of one tree node: every live entry whose key hashed to the
/// node's tree key.
///
/// When `deleted` is set the node holds no live entries: `same_key_values`
/// is empty and the primary entry is stale.
#[derive(Clone)]
struct NodeValue<K, V> {
    key: K,
    value: V,
    same_key_values: ReferenceCounter<[(K, V)]>,
    deleted: bool,
}

impl<K, V> NodeValue<K, V> {
    fn live(key: K, value: V) -> Self {
        Self {
            key,
            value,
            same_key_values: ReferenceCounter::from(Vec::new()),
            deleted: false,
        }
    }

    fn live_count(&self) -> usize {
        if self.deleted {
            0
        } else {
            1 + self.same_key_values.len()
        }
    }

    fn entry(&self, slot: Slot) -> Option<(&K, &V)> {
        match slot {
            Slot::Primary => Some((&self.key, &self.value)),
            Slot::Overflow(index) => self
                .same_key_values
                .get(index)
                .map(|(key, value)| (key, value)),
        }
    }
}

/// Position of a live entry inside a [`NodeValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Primary,
    Overflow(usize),
}

/// Node handler implementing collision chains and tombstones.
///
/// A same-key `put` either revives a tombstoned node or appends to its
/// overflow chain. A `modify` removes the entry at the given [`Slot`].
#[derive(Clone, Copy, Debug, Default)]
struct CollisionHandler;

impl<K: Clone, V: Clone> NodeHandler<NodeValue<K, V>> for CollisionHandler {
    type Edit = Slot;

    fn handle_same_key(
        &self,
        existing: &NodeValue<K, V>,
        incoming: NodeValue<K, V>,
    ) -> NodeValue<K, V> {
        if existing.deleted {
            return incoming;
        }
        let same_key_values: Vec<(K, V)> = existing
            .same_key_values
            .iter()
            .cloned()
            .chain(std::iter::once((incoming.key, incoming.value)))
            .collect();
        NodeValue {
            key: existing.key.clone(),
            value: existing.value.clone(),
            same_key_values: same_key_values.into(),
            deleted: false,
        }
    }

    fn modify(&self, existing: &NodeValue<K, V>, slot: Slot) -> Option<NodeValue<K, V>> {
        if existing.deleted {
            return None;
        }
        match slot {
            Slot::Primary => match existing.same_key_values.split_last() {
                None => Some(NodeValue {
                    key: existing.key.clone(),
                    value: existing.value.clone(),
                    same_key_values: existing.same_key_values.clone(),
                    deleted: true,
                }),
                Some(((key, value), rest)) => Some(NodeValue {
                    key: key.clone(),
                    value: value.clone(),
                    same_key_values: rest.to_vec().into(),
                    deleted: false,
                }),
            },
            Slot::Overflow(index) => {
                if index >= existing.same_key_values.len() {
                    return None;
                }
                let same_key_values: Vec<(K, V)> = existing
                    .same_key_values
                    .iter()
                    .enumerate()
                    .filter(|(position, _)| *position != index)
                    .map(|(_, entry)| entry.clone())
                    .collect();
                Some(NodeValue {
                    key: existing.key.clone(),
                    value: existing.value.clone(),
                    same_key_values: same_key_values.into(),
                    deleted: false,
                })
            }
        }
    }
}

// =============================================================================
// HashedMap Definition
// =============================================================================

/// A persistent (immutable) hash map.
///
/// Keys are hashed and compared by the oracle `O` (see
/// [`KeyHasher`] and [`DeepEqual`]). Iteration order is unspecified.
///
/// # Time Complexity
///
/// | Operation  | Complexity          |
/// |------------|---------------------|
/// | `new`      | O(1)                |
/// | `get`      | O(log N + c)        |
/// | `put`      | O(log N + c)        |
/// | `del`      | O(log N + c), amortized |
/// | `len`      | O(1)                |
/// | `equals`   | O(N (log N + c))    |
///
/// where `c` is the length of the collision chain at the key's hash.
///
/// # Examples
///
/// ```rust
/// use weft::persistent::HashedMap;
///
/// let map: HashedMap<String, i32> = HashedMap::from_pairs([
///     ("one".to_string(), 1),
///     ("two".to_string(), 2),
/// ])?;
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get(&"two".to_string()), Ok(&2));
/// # Ok::<(), weft::CoreError>(())
/// ```
#[derive(Clone)]
pub struct HashedMap<K, V, O = StdOracle> {
    tree: RBTree<NodeValue<K, V>, CollisionHandler>,
    /// Live logical entries
    item_count: usize,
    /// Successful deletions since the last compaction
    del_count: usize,
    config: HashedMapConfig,
    oracle: O,
}

impl<K, V, O: Default> HashedMap<K, V, O> {
    /// Creates a new empty map with the default oracle and configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_oracle(O::default())
    }
}

impl<K, V, O> HashedMap<K, V, O> {
    /// Creates a new empty map that hashes and compares keys with `oracle`.
    #[must_use]
    pub fn with_oracle(oracle: O) -> Self {
        Self::with_config(HashedMapConfig::default(), oracle)
    }

    /// Creates a new empty map with an explicit configuration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weft::persistent::{HashedMap, HashedMapConfig, StdOracle};
    ///
    /// let config = HashedMapConfig::default().with_compaction_threshold(8);
    /// let map: HashedMap<i64, i64> = HashedMap::with_config(config, StdOracle);
    /// assert_eq!(map.config().compaction_threshold(), 8);
    /// ```
    #[must_use]
    pub const fn with_config(config: HashedMapConfig, oracle: O) -> Self {
        Self {
            tree: RBTree::with_handler(CollisionHandler),
            item_count: 0,
            del_count: 0,
            config,
            oracle,
        }
    }

    /// Returns the number of live entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.item_count
    }

    /// Returns `true` if the map has no live entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Returns the number of deletions since the last compaction.
    #[inline]
    #[must_use]
    pub const fn deleted_count(&self) -> usize {
        self.del_count
    }

    /// Returns the number of physical tree nodes, live or tombstoned.
    #[inline]
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.tree.len()
    }

    /// Returns the number of tombstoned tree nodes.
    #[must_use]
    pub fn tombstone_count(&self) -> usize {
        self.tree.iter().filter(|(_, node)| node.deleted).count()
    }

    /// Returns this map's compaction settings.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &HashedMapConfig {
        &self.config
    }

    /// Returns the oracle used to hash and compare keys.
    #[inline]
    #[must_use]
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Returns an iterator over live `(key, value)` pairs, in no particular
    /// order.
    #[must_use]
    pub fn iter(&self) -> HashedMapIterator<'_, K, V> {
        HashedMapIterator {
            nodes: self.tree.iter(),
            current: None,
            overflow_index: 0,
            remaining: self.item_count,
        }
    }
}

impl<K, V, O> HashedMap<K, V, O>
where
    K: Clone,
    V: Clone,
    O: KeyHasher<K> + DeepEqual<K> + Clone,
{
    /// Builds a map from `(key, value)` pairs with the default oracle.
    ///
    /// # Errors
    ///
    /// Fails like [`put`](Self::put): on a repeated key or an unhashable key.
    pub fn from_pairs<I>(pairs: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        O: Default,
    {
        Self::from_pairs_with_oracle(pairs, O::default())
    }

    /// Builds a map from `(key, value)` pairs using `oracle`.
    ///
    /// # Errors
    ///
    /// Fails like [`put`](Self::put): on a repeated key or an unhashable key.
    pub fn from_pairs_with_oracle<I>(pairs: I, oracle: O) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        pairs
            .into_iter()
            .try_fold(Self::with_oracle(oracle), |map, (key, value)| map.put(key, value))
    }

    fn tree_key(&self, key: &K) -> CoreResult<i64> {
        Ok(self.oracle.hash_key(key)?.cast_signed())
    }

    fn keys_equal(&self, left: &K, right: &K) -> CoreResult<bool> {
        <O as DeepEqual<K>>::deep_equal(&self.oracle, left, right)
    }

    /// Finds the live entry equal to `key` inside one node.
    fn find_slot(&self, node: &NodeValue<K, V>, key: &K) -> CoreResult<Option<Slot>> {
        if node.deleted {
            return Ok(None);
        }
        if self.keys_equal(&node.key, key)? {
            return Ok(Some(Slot::Primary));
        }
        for (index, (candidate, _)) in node.same_key_values.iter().enumerate() {
            if self.keys_equal(candidate, key)? {
                return Ok(Some(Slot::Overflow(index)));
            }
        }
        Ok(None)
    }

    fn lookup(&self, key: &K) -> CoreResult<Option<&V>> {
        let hash = self.tree_key(key)?;
        let Some(node) = self.tree.get(hash) else {
            return Ok(None);
        };
        Ok(self
            .find_slot(node, key)?
            .and_then(|slot| node.entry(slot))
            .map(|(_, value)| value))
    }

    /// Returns a new map with `key` bound to `value`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::DuplicateKey`] if an equal key is already present
    /// - any error raised by the oracle while hashing or comparing keys
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weft::persistent::HashedMap;
    /// use weft::CoreError;
    ///
    /// let empty: HashedMap<i64, &str> = HashedMap::new();
    /// let map = empty.put(1, "a")?;
    /// assert_eq!(map.put(1, "b").err(), Some(CoreError::DuplicateKey));
    /// # Ok::<(), CoreError>(())
    /// ```
    pub fn put(&self, key: K, value: V) -> CoreResult<Self> {
        let hash = self.tree_key(&key)?;
        if let Some(node) = self.tree.get(hash)
            && self.find_slot(node, &key)?.is_some()
        {
            return Err(CoreError::DuplicateKey);
        }
        Ok(Self {
            tree: self.tree.put(hash, NodeValue::live(key, value)),
            item_count: self.item_count + 1,
            del_count: self.del_count,
            config: self.config,
            oracle: self.oracle.clone(),
        })
    }

    /// Returns the value bound to `key`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::KeyNotFound`] if the key is absent
    /// - any error raised by the oracle while hashing or comparing keys
    pub fn get(&self, key: &K) -> CoreResult<&V> {
        self.lookup(key)?.ok_or(CoreError::KeyNotFound)
    }

    /// Returns the value bound to `key`, or `default` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the oracle while hashing or comparing keys.
    pub fn get_or<'a>(&'a self, key: &K, default: &'a V) -> CoreResult<&'a V> {
        Ok(self.lookup(key)?.unwrap_or(default))
    }

    /// Looks `key` up without treating absence as an error.
    ///
    /// Returns `(true, Some(value))` when present and `(false, None)`
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the oracle while hashing or comparing keys.
    pub fn get_with_flag(&self, key: &K) -> CoreResult<(bool, Option<&V>)> {
        let value = self.lookup(key)?;
        Ok((value.is_some(), value))
    }

    /// Returns `true` if an equal key is present.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the oracle while hashing or comparing keys.
    pub fn contains_key(&self, key: &K) -> CoreResult<bool> {
        Ok(self.lookup(key)?.is_some())
    }

    /// Returns a new map without `key`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::KeyNotFound`] if the key is absent
    /// - any error raised by the oracle while hashing or comparing keys
    pub fn del(&self, key: &K) -> CoreResult<Self> {
        match self.del_with_flag(key)? {
            (true, map) => Ok(map),
            (false, _) => Err(CoreError::KeyNotFound),
        }
    }

    /// Removes `key` without treating absence as an error.
    ///
    /// Returns `(true, new_map)` when the key was present, and
    /// `(false, unchanged_map)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the oracle while hashing or comparing keys.
    pub fn del_with_flag(&self, key: &K) -> CoreResult<(bool, Self)> {
        let hash = self.tree_key(key)?;
        let Some(node) = self.tree.get(hash) else {
            return Ok((false, self.clone()));
        };
        let Some(slot) = self.find_slot(node, key)? else {
            return Ok((false, self.clone()));
        };
        let (tree, found) = self.tree.modify(hash, slot);
        if !found {
            return Ok((false, self.clone()));
        }
        let map = Self {
            tree,
            item_count: self.item_count - 1,
            del_count: self.del_count + 1,
            config: self.config,
            oracle: self.oracle.clone(),
        };
        Ok((true, map.compact_if_needed()))
    }

    fn compact_if_needed(self) -> Self {
        if self.del_count <= self.config.compaction_threshold {
            return self;
        }
        let tombstones = self.tombstone_count();
        if tombstones < self.config.min_tombstones_to_rebuild {
            debug!(
                del_count = self.del_count,
                tombstones, "compaction deferred, too few tombstoned nodes"
            );
            return Self { del_count: 0, ..self };
        }
        debug!(
            del_count = self.del_count,
            tombstones,
            live = self.item_count,
            "compacting map"
        );
        self.compact()
    }

    /// Rebuilds the map without tombstoned nodes.
    ///
    /// The live entries are unchanged and the deletion counter is reset.
    /// Collision chains are carried over as they are; no key is re-hashed.
    #[must_use]
    pub fn compact(&self) -> Self {
        let tree = self
            .tree
            .iter()
            .filter(|(_, node)| !node.deleted)
            .fold(RBTree::with_handler(CollisionHandler), |tree, (hash, node)| {
                tree.put(hash, node.clone())
            });
        Self {
            tree,
            item_count: self.item_count,
            del_count: 0,
            config: self.config,
            oracle: self.oracle.clone(),
        }
    }

    /// Returns the keys as a list, in no particular order.
    #[must_use]
    pub fn keys(&self) -> PList<K> {
        self.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Returns the values as a list, in no particular order.
    #[must_use]
    pub fn values(&self) -> PList<V> {
        self.iter().map(|(_, value)| value.clone()).collect()
    }

    /// Returns the `(key, value)` pairs as a list, in no particular order.
    #[must_use]
    pub fn key_value_pairs(&self) -> PList<(K, V)> {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Returns whether both maps hold the same live entries.
    ///
    /// Each map's entries must be found in the other with deep-equal values.
    /// Tree identity is never consulted.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the oracle while comparing keys or values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weft::persistent::HashedMap;
    ///
    /// let left: HashedMap<i64, i64> = HashedMap::from_pairs([(1, 10), (2, 20)])?;
    /// let right: HashedMap<i64, i64> = HashedMap::from_pairs([(2, 20), (3, 30)])?;
    /// let right = right.del(&3)?.put(1, 10)?;
    ///
    /// assert_eq!(left.equals(&right), Ok(true));
    /// # Ok::<(), weft::CoreError>(())
    /// ```
    pub fn equals(&self, other: &Self) -> CoreResult<bool>
    where
        O: DeepEqual<V>,
    {
        if self.item_count != other.item_count {
            return Ok(false);
        }
        Ok(self.is_contained_in(other)? && other.is_contained_in(self)?)
    }

    fn is_contained_in(&self, other: &Self) -> CoreResult<bool>
    where
        O: DeepEqual<V>,
    {
        for (key, value) in self {
            let Some(other_value) = other.lookup(key)? else {
                return Ok(false);
            };
            if !<O as DeepEqual<V>>::deep_equal(&self.oracle, value, other_value)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over live `(key, value)` pairs of a [`HashedMap`].
pub struct HashedMapIterator<'a, K, V> {
    nodes: RBTreeIterator<'a, NodeValue<K, V>>,
    current: Option<&'a NodeValue<K, V>>,
    overflow_index: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for HashedMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(node) = self.current {
            if let Some((key, value)) = node.same_key_values.get(self.overflow_index) {
                self.overflow_index += 1;
                self.remaining = self.remaining.saturating_sub(1);
                return Some((key, value));
            }
            self.current = None;
        }
        loop {
            let (_, node) = self.nodes.next()?;
            if node.live_count() == 0 {
                continue;
            }
            self.current = Some(node);
            self.overflow_index = 0;
            self.remaining = self.remaining.saturating_sub(1);
            return Some((&node.key, &node.value));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for HashedMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, O: Default> Default for HashedMap<K, V, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K, V, O> IntoIterator for &'a HashedMap<K, V, O> {
    type Item = (&'a K, &'a V);
    type IntoIter = HashedMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, O> fmt::Debug for HashedMap<K, V, O> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, O> fmt::Display for HashedMap<K, V, O> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K: serde::Serialize, V: serde::Serialize, O> serde::Serialize for HashedMap<K, V, O> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Tests
// =============================================================================
