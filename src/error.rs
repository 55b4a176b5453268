//! Error types for the value-storage core.
//!
//! Every fallible operation in this crate returns [`CoreResult`]. Errors are
//! raised synchronously to the immediate caller; the core never retries or
//! recovers from them. Whether an error becomes a language-level value or
//! terminates the current fiber is decided by the evaluator.

use thiserror::Error;

/// Errors raised by lists, maps and the value oracle.
///
/// # Examples
///
/// ```rust
/// use weft::CoreError;
///
/// let error = CoreError::EmptyCollection { operation: "head" };
/// assert_eq!(format!("{error}"), "head: collection is empty");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// `put` was called with a key equal to one already present.
    #[error("duplicate key: an equal key is already present in the map")]
    DuplicateKey,

    /// `get` or `del` was called without a default on an absent key.
    #[error("key not found")]
    KeyNotFound,

    /// `head`, `last` or `rest` was called on an empty list.
    #[error("{operation}: collection is empty")]
    EmptyCollection {
        /// The list operation that failed.
        operation: &'static str,
    },

    /// The key's type cannot be hashed into the map's key space.
    #[error("unhashable key type: {type_name}")]
    UnhashableKeyType {
        /// The type name of the offending key.
        type_name: &'static str,
    },

    /// Equality was requested on values that cannot be compared.
    #[error("cannot compare {left} with {right}")]
    IncomparableType {
        /// Type name of the left operand.
        left: &'static str,
        /// Type name of the right operand.
        right: &'static str,
    },
}

/// Result alias used throughout the crate.
pub type CoreResult<T> = Result<T, CoreError>;
