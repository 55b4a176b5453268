//! Equality and hashing capabilities consumed by [`HashedMap`](super::HashedMap).
//!
//! The map never reaches for a global hash function or equality routine.
//! Whoever builds a map hands it an *oracle*: a value implementing
//! [`KeyHasher`] for its keys and [`DeepEqual`] for its keys (and, for map
//! equality, its values). The runtime's own oracle lives in
//! [`crate::value::ValueOracle`]; [`StdOracle`] covers ordinary Rust types.
//!
//! Hashes are process-local: they are never persisted or compared across
//! runs. Hash equality is only a candidate filter; two keys are the same key
//! only when [`DeepEqual::deep_equal`] says so.

use std::hash::{Hash, Hasher};

use crate::error::CoreResult;

/// Deep (structural) equality over a value domain.
///
/// Implementations fail with
/// [`CoreError::IncomparableType`](crate::CoreError::IncomparableType) for
/// values that have no meaningful equality.
pub trait DeepEqual<T: ?Sized> {
    /// Returns whether `left` and `right` are equal.
    ///
    /// # Errors
    ///
    /// Returns an error when either operand cannot be compared.
    fn deep_equal(&self, left: &T, right: &T) -> CoreResult<bool>;
}

/// A stable, deterministic, process-local 64-bit hash over a key domain.
///
/// Equal keys (per the matching [`DeepEqual`]) must hash equal. Distinct
/// keys may collide.
pub trait KeyHasher<K: ?Sized> {
    /// Returns the hash of `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnhashableKeyType`](crate::CoreError::UnhashableKeyType)
    /// when the key's type cannot be used as a map key.
    fn hash_key(&self, key: &K) -> CoreResult<u64>;
}

// =============================================================================
// FNV-1a
// =============================================================================

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a hasher.
///
/// Order sensitive and deterministic across runs of the same build.
///
/// # Examples
///
/// ```rust
/// use std::hash::Hasher;
/// use weft::persistent::Fnv1aHasher;
///
/// let mut hasher = Fnv1aHasher::new();
/// hasher.write(b"a");
/// assert_eq!(hasher.finish(), 0xaf63_dc4c_8601_ec8c);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    /// Creates a hasher seeded with the FNV offset basis.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }
}

impl Default for Fnv1aHasher {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1aHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.state ^= u64::from(*byte);
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }
}

// =============================================================================
// StdOracle
// =============================================================================

/// Oracle for ordinary Rust types: [`PartialEq`] for equality and [`Hash`]
/// fed through [`Fnv1aHasher`].
///
/// # Examples
///
/// ```rust
/// use weft::persistent::{DeepEqual, KeyHasher, StdOracle};
///
/// assert_eq!(StdOracle.deep_equal("a", "a"), Ok(true));
/// assert_eq!(StdOracle.hash_key("a"), StdOracle.hash_key("a"));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StdOracle;

impl<T: PartialEq + ?Sized> DeepEqual<T> for StdOracle {
    #[inline]
    fn deep_equal(&self, left: &T, right: &T) -> CoreResult<bool> {
        Ok(left == right)
    }
}

impl<K: Hash + ?Sized> KeyHasher<K> for StdOracle {
    #[inline]
    fn hash_key(&self, key: &K) -> CoreResult<u64> {
        let mut hasher = Fnv1aHasher::new();
        key.hash(&mut hasher);
        Ok(hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn fnv(bytes: &[u8]) -> u64 {
        let mut hasher = Fnv1aHasher::new();
        hasher.write(bytes);
        hasher.finish()
    }

    #[rstest]
    #[case(b"", 0xcbf2_9ce4_8422_2325)]
    #[case(b"a", 0xaf63_dc4c_8601_ec8c)]
    #[case(b"foobar", 0x8594_4171_f739_67e8)]
    fn test_fnv1a_reference_vectors(#[case] input: &[u8], #[case] expected: u64) {
        assert_eq!(fnv(input), expected);
    }

    #[rstest]
    fn test_fnv1a_is_order_sensitive() {
        assert_ne!(fnv(b"ab"), fnv(b"ba"));
    }

    #[rstest]
    fn test_std_oracle_is_deterministic() {
        let first = StdOracle.hash_key(&vec![1, 2, 3]);
        let second = StdOracle.hash_key(&vec![1, 2, 3]);
        assert_eq!(first, second);
        assert_ne!(first, StdOracle.hash_key(&vec![3, 2, 1]));
    }

    #[rstest]
    fn test_std_oracle_equality() {
        assert_eq!(StdOracle.deep_equal(&1, &1), Ok(true));
        assert_eq!(StdOracle.deep_equal(&1, &2), Ok(false));
    }
}
