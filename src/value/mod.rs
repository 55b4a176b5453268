//! Runtime values stored in persistent lists and maps.
//!
//! [`Value`] is the closed set of kinds the evaluator hands to the storage
//! core. Lists and maps are the persistent structures from
//! [`crate::persistent`], so cloning a value only clones reference-counted
//! handles.
//!
//! Equality and hashing live in [`ValueOracle`], which every [`ValueMap`]
//! carries:
//!
//! - integers, floats, strings, booleans and lists are hashable map keys
//! - maps compare by content but cannot be keys
//! - functions and channels have no equality and cannot be keys
//!
//! # Examples
//!
//! ```rust
//! use weft::persistent::PList;
//! use weft::value::{Value, ValueMap};
//!
//! let key = Value::from(PList::cons_from([Value::from(1), Value::from("a")]));
//! let empty = ValueMap::new();
//! let map = empty.put(key.clone(), Value::from(true))?;
//!
//! assert_eq!(map.get(&key)?, &Value::Boolean(true));
//! # Ok::<(), weft::CoreError>(())
//! ```

mod oracle;

pub use oracle::ValueOracle;

use std::fmt;

use crate::persistent::{DeepEqual, HashedMap, PList, ReferenceCounter};

/// Map whose keys and values are runtime values.
pub type ValueMap = HashedMap<Value, Value, ValueOracle>;

/// Reference to a host object the storage core cannot look inside.
///
/// Functions, channels and other host objects are carried as handles. A
/// handle compares by identity only when it was created with
/// [`Handle::with_identity_equality`]; otherwise any equality request
/// involving it fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    type_name: &'static str,
    identity: u64,
    comparable: bool,
}

impl Handle {
    /// Creates a handle without equality.
    #[inline]
    #[must_use]
    pub const fn new(type_name: &'static str, identity: u64) -> Self {
        Self {
            type_name,
            identity,
            comparable: false,
        }
    }

    /// Returns this handle with identity equality enabled.
    #[inline]
    #[must_use]
    pub const fn with_identity_equality(self) -> Self {
        Self {
            comparable: true,
            ..self
        }
    }

    /// Name of the host type behind the handle.
    #[inline]
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Host-assigned identity.
    #[inline]
    #[must_use]
    pub const fn identity(&self) -> u64 {
        self.identity
    }

    /// Whether two handles can be compared by identity.
    #[inline]
    #[must_use]
    pub const fn is_comparable(&self) -> bool {
        self.comparable
    }
}

/// A runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Float(f64),
    /// Immutable shared string.
    String(ReferenceCounter<str>),
    /// Boolean.
    Boolean(bool),
    /// Persistent list of values.
    List(PList<Value>),
    /// Persistent map from values to values.
    Map(ValueMap),
    /// Host function.
    Function(Handle),
    /// Host channel.
    Channel(Handle),
    /// Any other host object.
    Opaque(Handle),
}

impl Value {
    /// Name of this value's kind, as used in error messages.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weft::value::Value;
    ///
    /// assert_eq!(Value::from(1.5).type_name(), "float");
    /// ```
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Function(_) => "function",
            Self::Channel(_) => "channel",
            Self::Opaque(handle) => handle.type_name,
        }
    }

    /// Whether this value supports equality at all.
    #[must_use]
    pub const fn is_comparable(&self) -> bool {
        match self {
            Self::Function(_) | Self::Channel(_) => false,
            Self::Opaque(handle) => handle.comparable,
            _ => true,
        }
    }

    /// Whether this value can be used as a map key.
    #[must_use]
    pub const fn is_hashable(&self) -> bool {
        matches!(
            self,
            Self::Integer(_) | Self::Float(_) | Self::String(_) | Self::Boolean(_) | Self::List(_)
        )
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(ReferenceCounter::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(ReferenceCounter::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<PList<Self>> for Value {
    fn from(value: PList<Self>) -> Self {
        Self::List(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Self::Map(value)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

/// Deep equality through [`ValueOracle`]; incomparable operands are unequal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        ValueOracle.deep_equal(self, other).unwrap_or(false)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value:?}"),
            Self::String(value) => write!(formatter, "{:?}", &**value),
            Self::Boolean(value) => write!(formatter, "{value}"),
            Self::List(list) => write!(formatter, "{list}"),
            Self::Map(map) => write!(formatter, "{map}"),
            Self::Function(handle) | Self::Channel(handle) | Self::Opaque(handle) => {
                write!(formatter, "<{} #{}>", self.type_name(), handle.identity)
            }
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::String(value) => serializer.serialize_str(value),
            Self::Boolean(value) => serializer.serialize_bool(*value),
            Self::List(list) => serde::Serialize::serialize(list, serializer),
            Self::Map(map) => serde::Serialize::serialize(map, serializer),
            Self::Function(_) | Self::Channel(_) | Self::Opaque(_) => Err(
                serde::ser::Error::custom(format!("cannot serialize {} value", self.type_name())),
            ),
        }
    }
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(Value: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::from(1), "integer")]
    #[case(Value::from(1.0), "float")]
    #[case(Value::from("s"), "string")]
    #[case(Value::from(false), "boolean")]
    #[case(Value::from(PList::empty()), "list")]
    #[case(Value::from(ValueMap::new()), "map")]
    #[case(Value::Function(Handle::new("function", 1)), "function")]
    #[case(Value::Channel(Handle::new("channel", 2)), "channel")]
    #[case(Value::Opaque(Handle::new("socket", 3)), "socket")]
    fn test_type_name(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value.type_name(), expected);
    }

    #[rstest]
    fn test_handle_identity_equality_flag() {
        let handle = Handle::new("socket", 7);
        assert!(!handle.is_comparable());
        assert!(handle.with_identity_equality().is_comparable());
        assert_eq!(handle.with_identity_equality().identity(), 7);
    }

    #[rstest]
    fn test_incomparable_values_are_not_partial_eq() {
        let function = Value::Function(Handle::new("function", 1));
        assert_ne!(function, function.clone());
    }

    #[rstest]
    fn test_hashable_kinds() {
        assert!(Value::from(1).is_hashable());
        assert!(Value::from(PList::empty()).is_hashable());
        assert!(!Value::from(ValueMap::new()).is_hashable());
        assert!(!Value::Channel(Handle::new("channel", 1)).is_hashable());
    }

    #[rstest]
    fn test_display() {
        let list = PList::cons_from([Value::from(1), Value::from(2.0), Value::from("x")]);
        assert_eq!(format!("{}", Value::from(list)), "[1, 2.0, \"x\"]");
        assert_eq!(
            format!("{}", Value::Function(Handle::new("function", 9))),
            "<function #9>"
        );
    }
}
