//! # weft
//!
//! Persistent value storage for a language runtime: the immutable list and
//! map values an evaluator passes between lightweight threads.
//!
//! ## Overview
//!
//! Every value is immutable. Deriving a new version copies only the nodes on
//! the touched path and shares the rest, so many versions of a list or map
//! coexist cheaply and can be read without coordination.
//!
//! - **Persistent Data Structures**: [`persistent::RBTree`],
//!   [`persistent::HashedMap`] and [`persistent::PList`]
//! - **Runtime Values**: [`value::Value`] with its equality and hashing
//!   oracle [`value::ValueOracle`]
//! - **Errors**: [`CoreError`], returned synchronously from every fallible
//!   operation
//!
//! ## Feature Flags
//!
//! - `arc`: Use `Arc` instead of `Rc` so values are `Send + Sync`
//! - `serde`: `Serialize` for lists, maps and values; `Deserialize` for lists
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use weft::prelude::*;
//!
//! let empty: HashedMap<i64, &str> = HashedMap::new();
//! let first = empty.put(1, "a")?;
//! let second = first.put(2, "b")?;
//!
//! assert_eq!(second.get(&1), Ok(&"a"));
//! assert_eq!(first.get(&2), Err(CoreError::KeyNotFound));
//! # Ok::<(), CoreError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use weft::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::persistent::*;
    pub use crate::value::{Handle, Value, ValueMap, ValueOracle};
}

pub mod error;
pub mod persistent;
pub mod value;

pub use error::{CoreError, CoreResult};
