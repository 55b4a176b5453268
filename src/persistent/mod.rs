//! Persistent (immutable) data structures.
//!
//! This module provides the storage engine behind the runtime's list and
//! map values. Every "mutation" returns a new version, old versions stay
//! valid, and versions share unchanged structure:
//!
//! - [`RBTree`]: Persistent red-black tree keyed by `i64`, with pluggable
//!   per-node behaviour ([`NodeHandler`])
//! - [`HashedMap`]: Persistent hash map built on [`RBTree`], with collision
//!   chains, tombstoning and compaction
//! - [`PList`]: Persistent list with amortized O(1) prepend and append
//!
//! Equality and hashing are capabilities passed in by the caller through
//! the [`DeepEqual`] and [`KeyHasher`] traits; see [`StdOracle`] for the
//! implementation used with ordinary Rust types.
//!
//! # Examples
//!
//! ## `PList`
//!
//! ```rust
//! use weft::persistent::PList;
//!
//! let list = PList::cons_from([1, 2, 3]);
//! let longer = list.append([4, 5]);
//!
//! assert_eq!(list.last(), Ok(&3));   // Original unchanged
//! assert_eq!(longer.last(), Ok(&5)); // New version
//! ```
//!
//! ## `HashedMap`
//!
//! ```rust
//! use weft::persistent::HashedMap;
//!
//! let empty: HashedMap<i64, &str> = HashedMap::new();
//! let map = empty.put(1, "a")?.put(2, "b")?;
//! let smaller = map.del(&1)?;
//!
//! assert_eq!(map.get(&1), Ok(&"a"));  // Original unchanged
//! assert!(smaller.get(&1).is_err());  // New version
//! # Ok::<(), weft::CoreError>(())
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub type ReferenceCounter<T> = std::sync::Arc<T>;

/// Reference-counted smart pointer type (`std::rc::Rc` without `arc`).
#[cfg(not(feature = "arc"))]
pub type ReferenceCounter<T> = std::rc::Rc<T>;

/// Write-once cell used for lazily materialized views.
///
/// `std::sync::OnceLock` under the `arc` feature, `std::cell::OnceCell`
/// otherwise.
#[cfg(feature = "arc")]
pub(crate) type OnceSlot<T> = std::sync::OnceLock<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type OnceSlot<T> = std::cell::OnceCell<T>;

mod hashed_map;
mod list;
mod oracle;
mod rbtree;

pub use hashed_map::DEFAULT_COMPACTION_THRESHOLD;
pub use hashed_map::HashedMap;
pub use hashed_map::HashedMapConfig;
pub use hashed_map::HashedMapIterator;
pub use list::PList;
pub use list::PListIntoIterator;
pub use list::PListIterator;
pub use oracle::DeepEqual;
pub use oracle::Fnv1aHasher;
pub use oracle::KeyHasher;
pub use oracle::StdOracle;
pub use rbtree::NodeHandler;
pub use rbtree::RBTree;
pub use rbtree::RBTreeIterator;
pub use rbtree::ReplaceHandler;

// =============================================================================
// Thread Safety
// =============================================================================

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PList<i64>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(RBTree<String>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(HashedMap<String, i64>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PList<i64>: Send, Sync);
#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(HashedMap<String, i64>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::{OnceSlot, ReferenceCounter};
    use rstest::rstest;

    #[rstest]
    fn test_reference_counter_strong_count() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
        let reference_counter_clone = reference_counter.clone();
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 2);
        drop(reference_counter_clone);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
    }

    #[rstest]
    fn test_once_slot_initializes_once() {
        let slot: OnceSlot<i32> = OnceSlot::new();
        assert_eq!(*slot.get_or_init(|| 1), 1);
        assert_eq!(*slot.get_or_init(|| 2), 1);
    }
}
