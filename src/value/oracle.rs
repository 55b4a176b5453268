//! Equality and hashing over [`Value`].

use std::hash::Hasher;

use super::Value;
use crate::error::{CoreError, CoreResult};
use crate::persistent::{DeepEqual, Fnv1aHasher, KeyHasher};

const INTEGER_TAG: u8 = 0;
const FLOAT_TAG: u8 = 1;
const STRING_TAG: u8 = 2;
const BOOLEAN_TAG: u8 = 3;
const LIST_TAG: u8 = 4;

/// Oracle for runtime values.
///
/// Equality is structural for integers, floats, strings, booleans, lists
/// and maps. Values of different comparable kinds are unequal, so
/// `Integer(1)` and `Float(1.0)` are different keys. Functions, channels
/// and handles without identity equality are incomparable.
///
/// Hashing is FNV-1a over a kind tag followed by a little-endian encoding of
/// the payload. Lists hash their length and then each element's hash in
/// order.
///
/// # Examples
///
/// ```rust
/// use weft::persistent::{DeepEqual, KeyHasher};
/// use weft::value::{Value, ValueOracle};
///
/// let oracle = ValueOracle;
/// assert_eq!(oracle.deep_equal(&Value::from(1), &Value::from(1.0)), Ok(false));
/// assert_eq!(
///     oracle.hash_key(&Value::from(0.0)),
///     oracle.hash_key(&Value::from(-0.0)),
/// );
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValueOracle;

impl ValueOracle {
    fn write_hash(self, value: &Value, hasher: &mut Fnv1aHasher) -> CoreResult<()> {
        match value {
            Value::Integer(integer) => {
                hasher.write_u8(INTEGER_TAG);
                hasher.write(&integer.to_le_bytes());
            }
            Value::Float(float) => {
                // -0.0 == 0.0, so both must hash alike
                let normalized = if *float == 0.0 { 0.0_f64 } else { *float };
                hasher.write_u8(FLOAT_TAG);
                hasher.write(&normalized.to_bits().to_le_bytes());
            }
            Value::String(string) => {
                hasher.write_u8(STRING_TAG);
                hasher.write(&(string.len() as u64).to_le_bytes());
                hasher.write(string.as_bytes());
            }
            Value::Boolean(boolean) => {
                hasher.write_u8(BOOLEAN_TAG);
                hasher.write_u8(u8::from(*boolean));
            }
            Value::List(list) => {
                hasher.write_u8(LIST_TAG);
                hasher.write(&(list.len() as u64).to_le_bytes());
                for element in list {
                    let element_hash = self.hash_key(element)?;
                    hasher.write(&element_hash.to_le_bytes());
                }
            }
            Value::Map(_) | Value::Function(_) | Value::Channel(_) | Value::Opaque(_) => {
                return Err(CoreError::UnhashableKeyType {
                    type_name: value.type_name(),
                });
            }
        }
        Ok(())
    }
}

impl DeepEqual<Value> for ValueOracle {
    fn deep_equal(&self, left: &Value, right: &Value) -> CoreResult<bool> {
        match (left, right) {
            (Value::Integer(left), Value::Integer(right)) => Ok(left == right),
            (Value::Float(left), Value::Float(right)) => Ok(left == right),
            (Value::String(left), Value::String(right)) => Ok(left == right),
            (Value::Boolean(left), Value::Boolean(right)) => Ok(left == right),
            (Value::List(left), Value::List(right)) => left.deep_equal(right, self),
            (Value::Map(left), Value::Map(right)) => left.equals(right),
            (Value::Opaque(left), Value::Opaque(right))
                if left.is_comparable() && right.is_comparable() =>
            {
                Ok(left.type_name() == right.type_name() && left.identity() == right.identity())
            }
            _ if left.is_comparable() && right.is_comparable() => Ok(false),
            _ => Err(CoreError::IncomparableType {
                left: left.type_name(),
                right: right.type_name(),
            }),
        }
    }
}

impl KeyHasher<Value> for ValueOracle {
    fn hash_key(&self, key: &Value) -> CoreResult<u64> {
        let mut hasher = Fnv1aHasher::new();
        self.write_hash(key, &mut hasher)?;
        Ok(hasher.finish())
    }
}
