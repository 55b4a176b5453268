//! Persistent (immutable) red-black tree keyed by 64-bit integers.
//!
//! This module provides [`RBTree`], the balanced tree underneath
//! [`HashedMap`](super::HashedMap). Keys are plain `i64` hashes; what happens
//! when two payloads land on the same key, and what a `modify` does to a
//! node, is decided by a pluggable [`NodeHandler`].
//!
//! # Overview
//!
//! - O(log N) `get`
//! - O(log N) `put` (path copying, at most O(log N) new nodes)
//! - O(log N) `modify` (path copying, no rebalancing)
//! - O(N) `visit_all`, in *node, right, left* order (not sorted)
//! - O(1) `len` and `is_empty`
//!
//! There is no physical removal. Logical deletion is expressed through
//! [`RBTree::modify`] and a handler that tombstones the payload, so the
//! balancing code only ever deals with insertion.
//!
//! # Examples
//!
//! ```rust
//! use weft::persistent::RBTree;
//!
//! let tree: RBTree<&str> = RBTree::new().put(3, "three").put(1, "one");
//! let updated = tree.put(2, "two");
//!
//! assert_eq!(tree.get(2), None);              // Original unchanged
//! assert_eq!(updated.get(2), Some(&"two"));   // New version
//! assert!(updated.black_height().is_some());  // Invariants hold
//! ```
//!
//! # Internal Structure
//!
//! The tree maintains the following invariants:
//! 1. The root is black
//! 2. Red nodes have only black children
//! 3. Every path from root to an empty child has the same number of black nodes
//! 4. `left.key < key < right.key` at every node

use super::ReferenceCounter;
use std::cmp::Ordering;
use std::fmt;

// =============================================================================
// Color Definition
// =============================================================================

/// The color of a red-black tree node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Color {
    Red,
    Black,
}

// =============================================================================
// Node Definition
// =============================================================================

type Link<V> = Option<ReferenceCounter<Node<V>>>;

/// Internal node structure. Never mutated after construction.
#[derive(Clone)]
struct Node<V> {
    key: i64,
    value: V,
    color: Color,
    left: Link<V>,
    right: Link<V>,
}

impl<V> Node<V> {
    /// Creates a new red node with no children.
    const fn new_red(key: i64, value: V) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
        }
    }

    /// Creates a copy of this node with a new color.
    fn with_color(&self, color: Color) -> Self
    where
        V: Clone,
    {
        Self {
            key: self.key,
            value: self.value.clone(),
            color,
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }

    /// Creates a copy of this node with new children.
    fn with_children(&self, left: Link<V>, right: Link<V>) -> Self
    where
        V: Clone,
    {
        Self {
            key: self.key,
            value: self.value.clone(),
            color: self.color,
            left,
            right,
        }
    }

    /// Creates a copy of this node carrying a different payload.
    fn with_value(&self, value: V) -> Self {
        Self {
            key: self.key,
            value,
            color: self.color,
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }

    fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

/// Helper function to check if an optional node is red.
fn is_red<V>(node: Option<&ReferenceCounter<Node<V>>>) -> bool {
    node.is_some_and(|node| node.is_red())
}

// =============================================================================
// Node Handler
// =============================================================================

/// Per-node behaviour plugged into an [`RBTree`].
///
/// The tree only knows how to order integer keys. Whenever a `put` hits an
/// existing key, or a `modify` reaches its target, the handler decides what
/// the replacement payload is. The tree then path-copies that payload into
/// a new version; the existing node is never touched.
pub trait NodeHandler<V> {
    /// The request carried by [`RBTree::modify`] down to the target node.
    type Edit;

    /// Produces the payload stored when `put` reaches a node whose key is
    /// already present.
    fn handle_same_key(&self, existing: &V, incoming: V) -> V;

    /// Produces the replacement payload for `modify`, or `None` when the
    /// edit does not apply to this node.
    fn modify(&self, existing: &V, edit: Self::Edit) -> Option<V>;
}

/// The default handler: a same-key `put` replaces the payload, and a
/// `modify` edit is the new payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplaceHandler;

impl<V> NodeHandler<V> for ReplaceHandler {
    type Edit = V;

    #[inline]
    fn handle_same_key(&self, _existing: &V, incoming: V) -> V {
        incoming
    }

    #[inline]
    fn modify(&self, _existing: &V, edit: V) -> Option<V> {
        Some(edit)
    }
}

// =============================================================================
// RBTree Definition
// =============================================================================

/// A persistent (immutable) red-black tree keyed by `i64`.
///
/// # Time Complexity
///
/// | Operation   | Complexity |
/// |-------------|------------|
/// | `new`       | O(1)       |
/// | `get`       | O(log N)   |
/// | `put`       | O(log N)   |
/// | `modify`    | O(log N)   |
/// | `visit_all` | O(N)       |
/// | `len`       | O(1)       |
///
/// # Examples
///
/// ```rust
/// use weft::persistent::RBTree;
///
/// let tree: RBTree<i32> = (0..100).map(|key| (key, key as i32 * 2)).collect();
/// let (updated, found) = tree.modify(10, -1);
///
/// assert!(found);
/// assert_eq!(tree.get(10), Some(&20));
/// assert_eq!(updated.get(10), Some(&-1));
/// ```
#[derive(Clone)]
pub struct RBTree<V, H = ReplaceHandler> {
    /// Root node of the tree
    root: Link<V>,
    /// Number of physical nodes
    length: usize,
    /// Injected per-node behaviour
    handler: H,
}

impl<V, H: Default> RBTree<V, H> {
    /// Creates a new empty tree with the default handler.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_handler(H::default())
    }
}

impl<V, H> RBTree<V, H> {
    /// Creates a new empty tree using the given node handler.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weft::persistent::{RBTree, ReplaceHandler};
    ///
    /// let tree: RBTree<String> = RBTree::with_handler(ReplaceHandler);
    /// assert!(tree.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn with_handler(handler: H) -> Self {
        Self {
            root: None,
            length: 0,
            handler,
        }
    }

    /// Returns the number of nodes in the tree.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree has no nodes.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the node handler this tree was built with.
    #[inline]
    #[must_use]
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Returns a reference to the payload stored under `key`.
    #[must_use]
    pub fn get(&self, key: i64) -> Option<&V> {
        Self::get_from_node(self.root.as_ref(), key)
    }

    fn get_from_node(node: Option<&ReferenceCounter<Node<V>>>, key: i64) -> Option<&V> {
        node.and_then(|node_ref| match key.cmp(&node_ref.key) {
            Ordering::Less => Self::get_from_node(node_ref.left.as_ref(), key),
            Ordering::Greater => Self::get_from_node(node_ref.right.as_ref(), key),
            Ordering::Equal => Some(&node_ref.value),
        })
    }

    /// Returns `true` if the tree has a node for `key`.
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: i64) -> bool {
        self.get(key).is_some()
    }

    /// Calls `visitor` on every node in *node, right subtree, left subtree*
    /// order.
    ///
    /// The order is not sorted and callers must not rely on it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weft::persistent::RBTree;
    ///
    /// let tree: RBTree<char> = RBTree::new().put(1, 'a').put(2, 'b').put(3, 'c');
    /// let mut keys = Vec::new();
    /// tree.visit_all(|key, _| keys.push(key));
    ///
    /// assert_eq!(keys, vec![2, 3, 1]);
    /// ```
    pub fn visit_all<F>(&self, mut visitor: F)
    where
        F: FnMut(i64, &V),
    {
        Self::visit_node(self.root.as_ref(), &mut visitor);
    }

    fn visit_node<F>(node: Option<&ReferenceCounter<Node<V>>>, visitor: &mut F)
    where
        F: FnMut(i64, &V),
    {
        if let Some(node_ref) = node {
            visitor(node_ref.key, &node_ref.value);
            Self::visit_node(node_ref.right.as_ref(), visitor);
            Self::visit_node(node_ref.left.as_ref(), visitor);
        }
    }

    /// Returns an iterator over `(key, payload)` pairs in the same order as
    /// [`visit_all`](Self::visit_all).
    #[must_use]
    pub fn iter(&self) -> RBTreeIterator<'_, V> {
        RBTreeIterator {
            stack: self.root.iter().collect(),
            remaining: self.length,
        }
    }

    /// Returns the black height of the tree if every red-black invariant and
    /// the key ordering hold, and `None` otherwise.
    ///
    /// An empty tree has black height 0.
    #[must_use]
    pub fn black_height(&self) -> Option<usize> {
        if is_red(self.root.as_ref()) {
            return None;
        }
        Self::check_node(self.root.as_ref(), None, None)
    }

    fn check_node(
        node: Option<&ReferenceCounter<Node<V>>>,
        lower: Option<i64>,
        upper: Option<i64>,
    ) -> Option<usize> {
        let Some(node_ref) = node else {
            return Some(0);
        };
        if lower.is_some_and(|bound| node_ref.key <= bound)
            || upper.is_some_and(|bound| node_ref.key >= bound)
        {
            return None;
        }
        if node_ref.is_red() && (is_red(node_ref.left.as_ref()) || is_red(node_ref.right.as_ref()))
        {
            return None;
        }
        let left_height = Self::check_node(node_ref.left.as_ref(), lower, Some(node_ref.key))?;
        let right_height = Self::check_node(node_ref.right.as_ref(), Some(node_ref.key), upper)?;
        if left_height != right_height {
            return None;
        }
        Some(left_height + usize::from(!node_ref.is_red()))
    }
}

impl<V: Clone, H: NodeHandler<V> + Clone> RBTree<V, H> {
    /// Inserts `value` under `key`, returning a new tree.
    ///
    /// If `key` is already present the handler's
    /// [`handle_same_key`](NodeHandler::handle_same_key) computes the stored
    /// payload. Only the path from the root to the target is copied.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn put(&self, key: i64, value: V) -> Self {
        let (new_root, added) =
            Self::insert_into_node(self.root.as_ref(), key, value, &self.handler);

        // Make root black
        let black_root = new_root.map(|node_ref| {
            if node_ref.is_red() {
                ReferenceCounter::new(node_ref.with_color(Color::Black))
            } else {
                node_ref
            }
        });

        Self {
            root: black_root,
            length: if added { self.length + 1 } else { self.length },
            handler: self.handler.clone(),
        }
    }

    /// Recursive helper for put.
    /// Returns (`new_node`, `was_added`).
    fn insert_into_node(
        node: Option<&ReferenceCounter<Node<V>>>,
        key: i64,
        value: V,
        handler: &H,
    ) -> (Link<V>, bool) {
        match node {
            None => (Some(ReferenceCounter::new(Node::new_red(key, value))), true),
            Some(node_ref) => match key.cmp(&node_ref.key) {
                Ordering::Less => {
                    let (new_left, added) =
                        Self::insert_into_node(node_ref.left.as_ref(), key, value, handler);
                    let new_node = node_ref.with_children(new_left, node_ref.right.clone());
                    (Some(ReferenceCounter::new(Self::balance(new_node))), added)
                }
                Ordering::Greater => {
                    let (new_right, added) =
                        Self::insert_into_node(node_ref.right.as_ref(), key, value, handler);
                    let new_node = node_ref.with_children(node_ref.left.clone(), new_right);
                    (Some(ReferenceCounter::new(Self::balance(new_node))), added)
                }
                Ordering::Equal => {
                    let merged = handler.handle_same_key(&node_ref.value, value);
                    (Some(ReferenceCounter::new(node_ref.with_value(merged))), false)
                }
            },
        }
    }

    /// Fixes a red-red violation directly below a freshly copied black node.
    fn balance(node: Node<V>) -> Node<V> {
        if node.is_red() {
            return node;
        }

        // Left-Left
        if is_red(node.left.as_ref())
            && let Some(left) = &node.left
            && is_red(left.left.as_ref())
        {
            return Self::rotate_right_and_recolor(node);
        }

        // Left-Right: rotate the left child first, then treat as Left-Left
        if is_red(node.left.as_ref())
            && let Some(left) = &node.left
            && is_red(left.right.as_ref())
        {
            let new_left = Self::rotate_left((**left).clone());
            let new_node =
                node.with_children(Some(ReferenceCounter::new(new_left)), node.right.clone());
            return Self::rotate_right_and_recolor(new_node);
        }

        // Right-Right
        if is_red(node.right.as_ref())
            && let Some(right) = &node.right
            && is_red(right.right.as_ref())
        {
            return Self::rotate_left_and_recolor(node);
        }

        // Right-Left: rotate the right child first, then treat as Right-Right
        if is_red(node.right.as_ref())
            && let Some(right) = &node.right
            && is_red(right.left.as_ref())
        {
            let new_right = Self::rotate_right((**right).clone());
            let new_node =
                node.with_children(node.left.clone(), Some(ReferenceCounter::new(new_right)));
            return Self::rotate_left_and_recolor(new_node);
        }

        node
    }

    fn rotate_right(node: Node<V>) -> Node<V> {
        match node.left {
            Some(left) => {
                let new_right = Node {
                    key: node.key,
                    value: node.value,
                    color: node.color,
                    left: left.right.clone(),
                    right: node.right,
                };
                Node {
                    key: left.key,
                    value: left.value.clone(),
                    color: left.color,
                    left: left.left.clone(),
                    right: Some(ReferenceCounter::new(new_right)),
                }
            }
            None => node,
        }
    }

    fn rotate_left(node: Node<V>) -> Node<V> {
        match node.right {
            Some(right) => {
                let new_left = Node {
                    key: node.key,
                    value: node.value,
                    color: node.color,
                    left: node.left,
                    right: right.left.clone(),
                };
                Node {
                    key: right.key,
                    value: right.value.clone(),
                    color: right.color,
                    left: Some(ReferenceCounter::new(new_left)),
                    right: right.right.clone(),
                }
            }
            None => node,
        }
    }

    /// Rotates right around a black node whose left child and left-left
    /// grandchild are red. The result is a red root with two black children.
    fn rotate_right_and_recolor(node: Node<V>) -> Node<V> {
        match node.left {
            Some(left) => {
                let new_right = Node {
                    key: node.key,
                    value: node.value,
                    color: Color::Black,
                    left: left.right.clone(),
                    right: node.right,
                };
                let new_left = left
                    .left
                    .as_ref()
                    .map(|left_left| ReferenceCounter::new(left_left.with_color(Color::Black)));
                Node {
                    key: left.key,
                    value: left.value.clone(),
                    color: Color::Red,
                    left: new_left,
                    right: Some(ReferenceCounter::new(new_right)),
                }
            }
            None => node,
        }
    }

    /// Mirror of [`rotate_right_and_recolor`](Self::rotate_right_and_recolor).
    fn rotate_left_and_recolor(node: Node<V>) -> Node<V> {
        match node.right {
            Some(right) => {
                let new_left = Node {
                    key: node.key,
                    value: node.value,
                    color: Color::Black,
                    left: node.left,
                    right: right.left.clone(),
                };
                let new_right = right
                    .right
                    .as_ref()
                    .map(|right_right| ReferenceCounter::new(right_right.with_color(Color::Black)));
                Node {
                    key: right.key,
                    value: right.value.clone(),
                    color: Color::Red,
                    left: Some(ReferenceCounter::new(new_left)),
                    right: new_right,
                }
            }
            None => node,
        }
    }

    /// Applies `edit` to the node stored under `key`.
    ///
    /// The handler's [`modify`](NodeHandler::modify) computes the new
    /// payload. Returns the new tree and `true` when the node exists and the
    /// handler accepted the edit; otherwise returns an unchanged copy of this
    /// tree and `false`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn modify(&self, key: i64, edit: H::Edit) -> (Self, bool) {
        Self::modify_node(self.root.as_ref(), key, edit, &self.handler).map_or_else(
            || (self.clone(), false),
            |new_root| {
                (
                    Self {
                        root: Some(new_root),
                        length: self.length,
                        handler: self.handler.clone(),
                    },
                    true,
                )
            },
        )
    }

    fn modify_node(
        node: Option<&ReferenceCounter<Node<V>>>,
        key: i64,
        edit: H::Edit,
        handler: &H,
    ) -> Link<V> {
        let node_ref = node?;
        match key.cmp(&node_ref.key) {
            Ordering::Less => Self::modify_node(node_ref.left.as_ref(), key, edit, handler).map(
                |new_left| {
                    ReferenceCounter::new(
                        node_ref.with_children(Some(new_left), node_ref.right.clone()),
                    )
                },
            ),
            Ordering::Greater => Self::modify_node(node_ref.right.as_ref(), key, edit, handler)
                .map(|new_right| {
                    ReferenceCounter::new(
                        node_ref.with_children(node_ref.left.clone(), Some(new_right)),
                    )
                }),
            Ordering::Equal => handler
                .modify(&node_ref.value, edit)
                .map(|value| ReferenceCounter::new(node_ref.with_value(value))),
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over `(key, payload)` pairs of an [`RBTree`], in
/// *node, right, left* order.
pub struct RBTreeIterator<'a, V> {
    stack: Vec<&'a ReferenceCounter<Node<V>>>,
    remaining: usize,
}

impl<'a, V> Iterator for RBTreeIterator<'a, V> {
    type Item = (i64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(left) = &node.left {
            self.stack.push(left);
        }
        if let Some(right) = &node.right {
            self.stack.push(right);
        }
        self.remaining = self.remaining.saturating_sub(1);
        Some((node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for RBTreeIterator<'_, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<V, H: Default> Default for RBTree<V, H> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone, H: NodeHandler<V> + Clone + Default> FromIterator<(i64, V)> for RBTree<V, H> {
    fn from_iter<I: IntoIterator<Item = (i64, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        for (key, value) in iter {
            tree = tree.put(key, value);
        }
        tree
    }
}

impl<'a, V, H> IntoIterator for &'a RBTree<V, H> {
    type Item = (i64, &'a V);
    type IntoIter = RBTreeIterator<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: fmt::Debug, H> fmt::Debug for RBTree<V, H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    fn node_addresses<V, H>(tree: &RBTree<V, H>) -> HashSet<*const Node<V>> {
        let mut addresses = HashSet::new();
        let mut stack: Vec<&ReferenceCounter<Node<V>>> = tree.root.iter().collect();
        while let Some(node) = stack.pop() {
            addresses.insert(ReferenceCounter::as_ptr(node));
            stack.extend(node.left.iter());
            stack.extend(node.right.iter());
        }
        addresses
    }

    /// Counts how many times `modify` and `handle_same_key` were asked to
    /// act, by summing into the payload.
    #[derive(Clone, Default)]
    struct SummingHandler;

    impl NodeHandler<i64> for SummingHandler {
        type Edit = i64;

        fn handle_same_key(&self, existing: &i64, incoming: i64) -> i64 {
            existing + incoming
        }

        fn modify(&self, existing: &i64, edit: i64) -> Option<i64> {
            (edit != 0).then_some(existing + edit)
        }
    }

    #[rstest]
    fn test_new_creates_empty() {
        let tree: RBTree<i32> = RBTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.black_height(), Some(0));
    }

    #[rstest]
    fn test_put_and_get() {
        let tree: RBTree<&str> = RBTree::new().put(5, "five").put(-3, "minus three");
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(5), Some(&"five"));
        assert_eq!(tree.get(-3), Some(&"minus three"));
        assert_eq!(tree.get(0), None);
    }

    #[rstest]
    fn test_put_same_key_uses_handler() {
        let tree: RBTree<i64, SummingHandler> = RBTree::new().put(1, 10).put(1, 5);
        assert_eq!(tree.get(1), Some(&15));
        assert_eq!(tree.len(), 1);
    }

    #[rstest]
    fn test_put_preserves_original() {
        let original: RBTree<i32> = RBTree::new().put(1, 1).put(2, 2);
        let updated = original.put(3, 3).put(1, 100);

        assert_eq!(original.get(3), None);
        assert_eq!(original.get(1), Some(&1));
        assert_eq!(updated.get(1), Some(&100));
        assert_eq!(original.len(), 2);
        assert_eq!(updated.len(), 3);
    }

    #[rstest]
    #[case::ascending((0..512).collect())]
    #[case::descending((0..512).rev().collect())]
    #[case::zigzag((0..256).flat_map(|index| [index, 1000 - index]).collect())]
    fn test_invariants_hold_after_inserts(#[case] keys: Vec<i64>) {
        let mut tree: RBTree<i64> = RBTree::new();
        for key in &keys {
            tree = tree.put(*key, *key);
            assert!(tree.black_height().is_some(), "invariants broken after {key}");
        }
        assert_eq!(tree.len(), keys.len());
        for key in keys {
            assert_eq!(tree.get(key), Some(&key));
        }
    }

    #[rstest]
    fn test_put_copies_only_a_path() {
        let tree: RBTree<i64> = (0..1024).map(|key| (key, key)).collect();
        let updated = tree.put(5000, 5000);

        let before = node_addresses(&tree);
        let after = node_addresses(&updated);
        let fresh = after.difference(&before).count();

        assert!(fresh < 100, "{fresh} nodes were copied");
        assert!(after.intersection(&before).count() > 900);
    }

    #[rstest]
    fn test_modify_copies_exactly_the_path() {
        let tree: RBTree<i64> = (0..1024).map(|key| (key, key)).collect();
        let (updated, found) = tree.modify(0, -1);

        assert!(found);
        let before = node_addresses(&tree);
        let after = node_addresses(&updated);
        let fresh = after.difference(&before).count();
        let height = 2 * (usize::BITS - 1024_usize.leading_zeros()) as usize;

        assert!(fresh <= height, "{fresh} nodes copied, height bound {height}");
        assert_eq!(tree.get(0), Some(&0));
        assert_eq!(updated.get(0), Some(&-1));
        assert_eq!(updated.black_height(), tree.black_height());
    }

    #[rstest]
    fn test_modify_missing_key_returns_unchanged() {
        let tree: RBTree<i64> = RBTree::new().put(1, 1);
        let (same, found) = tree.modify(2, 7);

        assert!(!found);
        assert!(ReferenceCounter::ptr_eq(
            same.root.as_ref().unwrap(),
            tree.root.as_ref().unwrap()
        ));
    }

    #[rstest]
    fn test_modify_rejected_by_handler() {
        let tree: RBTree<i64, SummingHandler> = RBTree::new().put(1, 1);
        let (same, found) = tree.modify(1, 0);

        assert!(!found);
        assert_eq!(same.get(1), Some(&1));
    }

    #[rstest]
    fn test_visit_all_is_node_right_left() {
        let tree: RBTree<()> = (1..=7).map(|key| (key, ())).collect();
        let mut visited = Vec::new();
        tree.visit_all(|key, ()| visited.push(key));

        let iterated: Vec<i64> = tree.iter().map(|(key, _)| key).collect();

        assert_eq!(visited.len(), 7);
        assert_eq!(visited, iterated);
        assert_eq!(visited[0], tree.root.as_ref().unwrap().key);
    }

    #[rstest]
    fn test_iter_len_matches_tree_len() {
        let tree: RBTree<i64> = (0..50).map(|key| (key * 3, key)).collect();
        let iterator = tree.iter();
        assert_eq!(iterator.len(), 50);
        assert_eq!(iterator.count(), 50);
    }

    #[rstest]
    fn test_debug_lists_entries() {
        let tree: RBTree<&str> = RBTree::new().put(1, "one");
        assert_eq!(format!("{tree:?}"), "{1: \"one\"}");
    }
}
