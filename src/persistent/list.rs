//! Persistent (immutable) list with amortized O(1) prepend and append.
//!
//! This module provides [`PList`], the list value type of the runtime.
//!
//! # Overview
//!
//! A `PList` is two singly-linked chains:
//!
//! - `head`: elements in logical order, grown by prepending ([`PList::add`])
//! - `tail`: elements in *reverse* logical order, grown by appending
//!   ([`PList::append`])
//!
//! The logical sequence is `head` followed by `reverse(tail)`. Prepending and
//! appending each allocate one node per element and share every existing
//! node. Reading in logical order past the first element needs the tail
//! chain reversed; that reversal happens at most once per list value and is
//! cached in a cell shared by all clones of the value. Nodes are never
//! mutated, so other lists sharing them are unaffected.
//!
//! - O(1) `add`, `append` (per element), `reverse`, `len`
//! - O(1) `head` when the head chain is non-empty, `last` when the tail
//!   chain is non-empty, and `rest` when the head chain is non-empty
//! - O(n) first ordered traversal of a list with a tail chain, O(1) to start
//!   each later traversal
//!
//! # Examples
//!
//! ```rust
//! use weft::persistent::PList;
//!
//! let list = PList::cons_from([1, 2, 3]);
//! let appended = list.append([4, 5]);
//! let prepended = list.add([0]);
//!
//! assert_eq!(appended.head(), Ok(&1));
//! assert_eq!(appended.last(), Ok(&5));
//! assert_eq!(list.last(), Ok(&3));
//! assert_eq!(prepended.rest()?, list);
//! # Ok::<(), weft::CoreError>(())
//! ```
//!
//! # Structural Sharing
//!
//! ```text
//! list                = [1 -> 2 -> 3] ++ reverse([])
//! list.append([4, 5]) = [1 -> 2 -> 3] ++ reverse([5 -> 4])   // shares [1, 2, 3]
//! list.add([0])       = [0 -> 1 -> 2 -> 3] ++ reverse([])    // shares [1, 2, 3]
//! ```

use std::fmt;
use std::iter::FromIterator;

use tracing::trace;

use super::oracle::DeepEqual;
use super::{OnceSlot, ReferenceCounter};
use crate::error::{CoreError, CoreResult};

/// Internal node structure for the persistent list.
struct Node<T> {
    element: T,
    next: Chain<T>,
}

type Chain<T> = Option<ReferenceCounter<Node<T>>>;

// Unlinks uniquely owned successors one at a time so long chains do not
// recurse on drop. Stops at the first node still shared by another chain.
impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(node) = next {
            match ReferenceCounter::try_unwrap(node) {
                Ok(mut node) => next = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

/// A persistent (immutable) list.
///
/// # Time Complexity
///
/// | Operation | Complexity            |
/// |-----------|-----------------------|
/// | `empty`   | O(1)                  |
/// | `add`     | O(k) for k elements   |
/// | `append`  | O(k) for k elements   |
/// | `head`    | O(1) amortized        |
/// | `last`    | O(1) with a tail chain, O(n) otherwise |
/// | `rest`    | O(1) amortized        |
/// | `reverse` | O(1)                  |
/// | `len`     | O(1)                  |
/// | `extend`  | O(n) in all but the last list |
///
/// # Examples
///
/// ```rust
/// use weft::persistent::PList;
///
/// let list = PList::empty().append([1, 2]).add([0]);
/// assert_eq!(list.to_vec(), vec![0, 1, 2]);
/// ```
pub struct PList<T> {
    /// Elements in logical order
    head: Chain<T>,
    head_length: usize,
    /// Elements in reverse logical order
    tail: Chain<T>,
    tail_length: usize,
    /// Logical-order chain, built on first need when `tail` is non-empty
    canonical: ReferenceCounter<OnceSlot<Chain<T>>>,
}

impl<T> PList<T> {
    fn from_chains(head: Chain<T>, head_length: usize, tail: Chain<T>, tail_length: usize) -> Self {
        Self {
            head,
            head_length,
            tail,
            tail_length,
            canonical: ReferenceCounter::new(OnceSlot::new()),
        }
    }

    /// Creates a new empty list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weft::persistent::PList;
    ///
    /// let list: PList<i32> = PList::empty();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::from_chains(None, 0, None, 0)
    }

    /// Builds a list holding `values` in the given order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weft::persistent::PList;
    ///
    /// let list = PList::cons_from(["a", "b"]);
    /// assert_eq!(list.head(), Ok(&"a"));
    /// assert_eq!(list.len(), 2);
    /// ```
    #[must_use]
    pub fn cons_from<I: IntoIterator<Item = T>>(values: I) -> Self {
        let mut elements: Vec<T> = values.into_iter().collect();
        let length = elements.len();

        // Build from end to start using Vec::pop()
        let mut head: Chain<T> = None;
        while let Some(element) = elements.pop() {
            head = Some(ReferenceCounter::new(Node {
                element,
                next: head,
            }));
        }

        Self::from_chains(head, length, None, 0)
    }

    /// Returns the number of elements in the list.
    ///
    /// This is the sum of the cached lengths of the two chains.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.head_length + self.tail_length
    }

    /// Returns `true` if the list contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head.is_none() && self.tail.is_none()
    }

    /// Returns a new list with `values` prepended.
    ///
    /// The values end up at the front in the order given, so
    /// `list.add([a, b])` starts with `a, b`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weft::persistent::PList;
    ///
    /// let list = PList::cons_from([3]).add([1, 2]);
    /// assert_eq!(list.to_vec(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn add<I: IntoIterator<Item = T>>(&self, values: I) -> Self {
        let mut elements: Vec<T> = values.into_iter().collect();
        let added = elements.len();

        let mut head = self.head.clone();
        while let Some(element) = elements.pop() {
            head = Some(ReferenceCounter::new(Node {
                element,
                next: head,
            }));
        }

        Self::from_chains(
            head,
            self.head_length + added,
            self.tail.clone(),
            self.tail_length,
        )
    }

    /// Returns a new list with `values` appended in the order given.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weft::persistent::PList;
    ///
    /// let list = PList::cons_from([1]).append([2, 3]);
    /// assert_eq!(list.to_vec(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn append<I: IntoIterator<Item = T>>(&self, values: I) -> Self {
        let mut tail = self.tail.clone();
        let mut appended = 0;
        for element in values {
            tail = Some(ReferenceCounter::new(Node {
                element,
                next: tail,
            }));
            appended += 1;
        }

        Self::from_chains(
            self.head.clone(),
            self.head_length,
            tail,
            self.tail_length + appended,
        )
    }

    /// Returns the list in reverse order.
    ///
    /// The two chains trade places, so no node is copied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weft::persistent::PList;
    ///
    /// let list = PList::cons_from([1, 2]).append([3]);
    /// assert_eq!(list.reverse().to_vec(), vec![3, 2, 1]);
    /// ```
    #[must_use]
    pub fn reverse(&self) -> Self {
        Self::from_chains(
            self.tail.clone(),
            self.tail_length,
            self.head.clone(),
            self.head_length,
        )
    }
}

impl<T: Clone> PList<T> {
    /// Returns the chain holding every element in logical order.
    fn chain(&self) -> &Chain<T> {
        if self.tail.is_none() {
            return &self.head;
        }
        self.canonical.get_or_init(|| {
            trace!(
                head_length = self.head_length,
                tail_length = self.tail_length,
                "canonicalizing list tail chain"
            );
            Self::splice(&self.head, self.head_length, &self.tail)
        })
    }

    /// Builds `head ++ reverse(tail)` out of fresh nodes.
    fn splice(head: &Chain<T>, head_length: usize, tail: &Chain<T>) -> Chain<T> {
        let mut result: Chain<T> = None;
        let mut current = tail.as_ref();
        while let Some(node) = current {
            result = Some(ReferenceCounter::new(Node {
                element: node.element.clone(),
                next: result,
            }));
            current = node.next.as_ref();
        }

        let mut elements: Vec<T> = Vec::with_capacity(head_length);
        let mut current = head.as_ref();
        while let Some(node) = current {
            elements.push(node.element.clone());
            current = node.next.as_ref();
        }
        while let Some(element) = elements.pop() {
            result = Some(ReferenceCounter::new(Node {
                element,
                next: result,
            }));
        }
        result
    }

    /// Returns the first element.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyCollection`] if the list is empty.
    pub fn head(&self) -> CoreResult<&T> {
        let chain = if self.head.is_some() {
            &self.head
        } else {
            self.chain()
        };
        chain
            .as_ref()
            .map(|node| &node.element)
            .ok_or(CoreError::EmptyCollection { operation: "head" })
    }

    /// Returns the last element.
    ///
    /// O(1) when the tail chain is non-empty; otherwise walks the head chain.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyCollection`] if the list is empty.
    pub fn last(&self) -> CoreResult<&T> {
        if let Some(node) = &self.tail {
            return Ok(&node.element);
        }
        let mut current = self.head.as_ref();
        let mut last = None;
        while let Some(node) = current {
            last = Some(&node.element);
            current = node.next.as_ref();
        }
        last.ok_or(CoreError::EmptyCollection { operation: "last" })
    }

    /// Returns the list without its first element.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyCollection`] if the list is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weft::persistent::PList;
    ///
    /// let list = PList::cons_from([1, 2, 3]);
    /// assert_eq!(list.rest()?.to_vec(), vec![2, 3]);
    /// # Ok::<(), weft::CoreError>(())
    /// ```
    pub fn rest(&self) -> CoreResult<Self> {
        if let Some(node) = &self.head {
            return Ok(Self::from_chains(
                node.next.clone(),
                self.head_length - 1,
                self.tail.clone(),
                self.tail_length,
            ));
        }
        self.chain().as_ref().map_or(
            Err(CoreError::EmptyCollection { operation: "rest" }),
            |node| Ok(Self::from_chains(node.next.clone(), self.len() - 1, None, 0)),
        )
    }

    /// Returns the element at `index`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.iterate().nth(index)
    }

    /// Returns an iterator over the elements in logical order.
    ///
    /// Every call starts from the first element; the list itself carries no
    /// iteration state.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weft::persistent::PList;
    ///
    /// let list = PList::cons_from([1, 2]).append([3]);
    /// let first: Vec<&i32> = list.iterate().collect();
    /// let second: Vec<&i32> = list.iterate().collect();
    /// assert_eq!(first, vec![&1, &2, &3]);
    /// assert_eq!(first, second);
    /// ```
    #[must_use]
    pub fn iterate(&self) -> PListIterator<'_, T> {
        PListIterator {
            current: self.chain().as_ref(),
            remaining: self.len(),
        }
    }

    /// Returns a new list holding this list followed by each of `lists`.
    ///
    /// The last non-empty list is shared; the elements of the others are
    /// copied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weft::persistent::PList;
    ///
    /// let first = PList::cons_from([1, 2]);
    /// let second = PList::empty().append([3]);
    /// let third = PList::cons_from([4]);
    ///
    /// let joined = first.extend([&second, &third]);
    /// assert_eq!(joined.to_vec(), vec![1, 2, 3, 4]);
    /// ```
    #[must_use]
    pub fn extend<'a, I>(&'a self, lists: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
        T: 'a,
    {
        let mut parts: Vec<&'a Self> = std::iter::once(self)
            .chain(lists)
            .filter(|list| !list.is_empty())
            .collect();
        let Some(last) = parts.pop() else {
            return Self::empty();
        };
        parts
            .into_iter()
            .rev()
            .fold(last.clone(), |result, list| result.add(list.iterate().cloned()))
    }

    /// Collects the elements into a `Vec`, in logical order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iterate().cloned().collect()
    }

    /// Compares two lists element by element using `oracle`.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the oracle.
    pub fn deep_equal<O>(&self, other: &Self, oracle: &O) -> CoreResult<bool>
    where
        O: DeepEqual<T> + ?Sized,
    {
        if self.len() != other.len() {
            return Ok(false);
        }
        for (left, right) in self.iterate().zip(other.iterate()) {
            if !oracle.deep_equal(left, right)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over references to elements of a [`PList`].
pub struct PListIterator<'a, T> {
    current: Option<&'a ReferenceCounter<Node<T>>>,
    remaining: usize,
}

impl<'a, T> Iterator for PListIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.current.map(|node| {
            self.current = node.next.as_ref();
            self.remaining = self.remaining.saturating_sub(1);
            &node.element
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for PListIterator<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

/// An owning iterator over elements of a [`PList`].
pub struct PListIntoIterator<T> {
    current: Chain<T>,
    remaining: usize,
}

impl<T: Clone> Iterator for PListIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current.take()?;
        self.current = node.next.clone();
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.element.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Clone> ExactSizeIterator for PListIntoIterator<T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for PList<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            head_length: self.head_length,
            tail: self.tail.clone(),
            tail_length: self.tail_length,
            canonical: self.canonical.clone(),
        }
    }
}

impl<T> Default for PList<T> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> FromIterator<T> for PList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::cons_from(iter)
    }
}

impl<T: Clone> IntoIterator for PList<T> {
    type Item = T;
    type IntoIter = PListIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        PListIntoIterator {
            current: self.chain().clone(),
            remaining: self.len(),
        }
    }
}

impl<'a, T: Clone> IntoIterator for &'a PList<T> {
    type Item = &'a T;
    type IntoIter = PListIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iterate()
    }
}

impl<T: Clone + PartialEq> PartialEq for PList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iterate().zip(other.iterate()).all(|(a, b)| a == b)
    }
}

impl<T: Clone + Eq> Eq for PList<T> {}

impl<T: Clone + fmt::Debug> fmt::Debug for PList<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iterate()).finish()
    }
}

impl<T: Clone + fmt::Display> fmt::Display for PList<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: Clone + serde::Serialize> serde::Serialize for PList<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct PListVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<T> PListVisitor<T> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for PListVisitor<T>
where
    T: serde::Deserialize<'de>,
{
    type Value = PList<T>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        const MAX_PREALLOCATE: usize = 4096;
        let capacity = seq.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
        let mut elements = Vec::with_capacity(capacity);
        while let Some(element) = seq.next_element()? {
            elements.push(element);
        }
        Ok(PList::cons_from(elements))
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for PList<T>
where
    T: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PListVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
