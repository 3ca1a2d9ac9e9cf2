use std::fmt;

use alloy::primitives::{Address, I256, U256};
use mimir_common::utils::strings::encode_hex_prefixed;

use super::{ScalarValue, ValueKind};
use crate::error::Error;

/// A native, owned projection of an [`AbiObject`](super::AbiObject) tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    /// `bool`
    Bool(bool),
    /// `intN`
    Int(I256),
    /// `uintN`
    Uint(U256),
    /// `address`
    Address(Address),
    /// `bytesN`
    FixedBytes(Vec<u8>),
    /// `bytes`
    Bytes(Vec<u8>),
    /// `string`
    String(String),
    /// `T[n]` or `T[]`
    Array(Vec<AbiValue>),
    /// `(T1,T2,...)`
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    /// A short description of the value's shape, used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            AbiValue::Bool(_) => "bool",
            AbiValue::Int(_) => "signed integer",
            AbiValue::Uint(_) => "unsigned integer",
            AbiValue::Address(_) => "address",
            AbiValue::FixedBytes(_) => "fixed bytes",
            AbiValue::Bytes(_) => "bytes",
            AbiValue::String(_) => "string",
            AbiValue::Array(_) => "array",
            AbiValue::Tuple(_) => "tuple",
        }
    }

    /// Converts a leaf value into the payload of a node of the given kind. Signed and
    /// unsigned integers are interchangeable as long as the value is representable; fixed
    /// and dynamic byte strings are interchangeable.
    pub(crate) fn to_scalar(&self, kind: ValueKind) -> Result<ScalarValue, Error> {
        let mismatch = || Error::type_mismatch(kind.type_string(), self.describe());

        match (kind, self) {
            (ValueKind::Bool, AbiValue::Bool(value)) => Ok(ScalarValue::Bool(*value)),
            (ValueKind::Int(_), AbiValue::Int(value)) => Ok(ScalarValue::Int(*value)),
            (ValueKind::Int(_), AbiValue::Uint(value)) => {
                if value.bit_len() >= 256 {
                    return Err(Error::ValueOutOfRange(format!(
                        "{value} does not fit in {}",
                        kind.type_string()
                    )));
                }
                Ok(ScalarValue::Int(I256::from_raw(*value)))
            }
            (ValueKind::Uint(_), AbiValue::Uint(value)) => Ok(ScalarValue::Uint(*value)),
            (ValueKind::Uint(_), AbiValue::Int(value)) => {
                if value.is_negative() {
                    return Err(Error::ValueOutOfRange(format!(
                        "{value} is negative, but {} is unsigned",
                        kind.type_string()
                    )));
                }
                Ok(ScalarValue::Uint(value.into_raw()))
            }
            (ValueKind::Address, AbiValue::Address(value)) => Ok(ScalarValue::Address(*value)),
            (
                ValueKind::FixedBytes(_) | ValueKind::DynamicBytes,
                AbiValue::FixedBytes(bytes) | AbiValue::Bytes(bytes),
            ) => Ok(ScalarValue::Bytes(bytes.clone())),
            (ValueKind::String, AbiValue::String(value)) => Ok(ScalarValue::String(value.clone())),
            _ => Err(mismatch()),
        }
    }

    pub(crate) fn from_scalar(kind: ValueKind, value: &ScalarValue) -> Self {
        match value {
            ScalarValue::Bool(value) => AbiValue::Bool(*value),
            ScalarValue::Int(value) => AbiValue::Int(*value),
            ScalarValue::Uint(value) => AbiValue::Uint(*value),
            ScalarValue::Address(value) => AbiValue::Address(*value),
            ScalarValue::Bytes(bytes) if matches!(kind, ValueKind::FixedBytes(_)) => {
                AbiValue::FixedBytes(bytes.clone())
            }
            ScalarValue::Bytes(bytes) => AbiValue::Bytes(bytes.clone()),
            ScalarValue::String(value) => AbiValue::String(value.clone()),
        }
    }
}

impl fmt::Display for AbiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiValue::Bool(value) => write!(f, "{value}"),
            AbiValue::Int(value) => write!(f, "{value}"),
            AbiValue::Uint(value) => write!(f, "{value}"),
            AbiValue::Address(value) => f.write_str(&value.to_checksum(None)),
            AbiValue::FixedBytes(bytes) | AbiValue::Bytes(bytes) => {
                f.write_str(&encode_hex_prefixed(bytes))
            }
            AbiValue::String(value) => write!(f, "{value:?}"),
            AbiValue::Array(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            AbiValue::Tuple(values) => {
                f.write_str("(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<bool> for AbiValue {
    fn from(value: bool) -> Self {
        AbiValue::Bool(value)
    }
}

impl From<u64> for AbiValue {
    fn from(value: u64) -> Self {
        AbiValue::Uint(U256::from(value))
    }
}

impl From<i64> for AbiValue {
    fn from(value: i64) -> Self {
        let magnitude = I256::from_raw(U256::from(value.unsigned_abs()));
        AbiValue::Int(if value < 0 { -magnitude } else { magnitude })
    }
}

impl From<U256> for AbiValue {
    fn from(value: U256) -> Self {
        AbiValue::Uint(value)
    }
}

impl From<I256> for AbiValue {
    fn from(value: I256) -> Self {
        AbiValue::Int(value)
    }
}

impl From<Address> for AbiValue {
    fn from(value: Address) -> Self {
        AbiValue::Address(value)
    }
}

impl From<&str> for AbiValue {
    fn from(value: &str) -> Self {
        AbiValue::String(value.to_string())
    }
}

impl From<String> for AbiValue {
    fn from(value: String) -> Self {
        AbiValue::String(value)
    }
}

impl From<Vec<u8>> for AbiValue {
    fn from(value: Vec<u8>) -> Self {
        AbiValue::Bytes(value)
    }
}
