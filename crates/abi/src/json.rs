//! The human-readable bridge between value trees and JSON.
//!
//! Integers render as decimal strings, addresses as EIP-55 checksummed strings, and byte
//! payloads carry an explicit `hex://` or `base64://` prefix so they can't be confused with
//! text. Structs render as objects keyed by field name, with `component{i}` standing in
//! for unnamed fields.

use std::{fmt, str::FromStr};

use alloy::primitives::{Address, I256, U256};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use mimir_common::utils::strings::{decode_hex, encode_hex_prefixed};
use serde_json::{Map, Value};

use crate::{
    error::Error,
    object::{AbiObject, ScalarValue, ValueKind},
};

/// The prefix of a hex-encoded byte payload.
pub const HEX_PREFIX: &str = "hex://";

/// The prefix of a base64-encoded byte payload.
pub const BASE64_PREFIX: &str = "base64://";

/// How byte payloads are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BytesEncoding {
    /// `hex://0x…`
    #[default]
    Hex,
    /// `base64://…`
    Base64,
}

impl BytesEncoding {
    /// Renders a byte payload with its prefix.
    pub fn render(&self, bytes: &[u8]) -> String {
        match self {
            BytesEncoding::Hex => format!("{HEX_PREFIX}{}", encode_hex_prefixed(bytes)),
            BytesEncoding::Base64 => format!("{BASE64_PREFIX}{}", STANDARD.encode(bytes)),
        }
    }
}

impl FromStr for BytesEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hex" => Ok(BytesEncoding::Hex),
            "base64" => Ok(BytesEncoding::Base64),
            other => Err(format!("unknown bytes encoding '{other}', expected 'hex' or 'base64'")),
        }
    }
}

impl fmt::Display for BytesEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BytesEncoding::Hex => "hex",
            BytesEncoding::Base64 => "base64",
        })
    }
}

/// The JSON key of the `index`th struct field.
pub fn field_key(name: &str, index: usize) -> String {
    if name.is_empty() {
        format!("component{index}")
    } else {
        name.to_string()
    }
}

/// Parses a byte payload written as `hex://…`, `base64://…` or `0x…`. Any other string is
/// taken as plain UTF-8 text.
///
/// ```
/// use mimir_abi::json::parse_bytes;
///
/// assert_eq!(parse_bytes("hex://0xdead").expect("valid hex"), vec![0xde, 0xad]);
/// assert_eq!(parse_bytes("base64://3q0=").expect("valid base64"), vec![0xde, 0xad]);
/// assert_eq!(parse_bytes("dave").expect("plain text"), b"dave".to_vec());
/// ```
pub fn parse_bytes(text: &str) -> Result<Vec<u8>, Error> {
    if let Some(hex) = text.strip_prefix(HEX_PREFIX) {
        return decode_hex(hex).map_err(|e| Error::type_mismatch("hex bytes", e));
    }
    if let Some(encoded) = text.strip_prefix(BASE64_PREFIX) {
        return STANDARD
            .decode(encoded)
            .map_err(|e| Error::type_mismatch("base64 bytes", e));
    }
    if text.starts_with("0x") || text.starts_with("0X") {
        return decode_hex(text).map_err(|e| Error::type_mismatch("hex bytes", e));
    }

    Ok(text.as_bytes().to_vec())
}

impl AbiObject {
    /// Renders this node as JSON.
    pub fn to_json(&self, encoding: BytesEncoding) -> Value {
        match self {
            AbiObject::Scalar(node) => match node.value() {
                ScalarValue::Bool(value) => Value::Bool(*value),
                ScalarValue::Int(value) => Value::String(value.to_string()),
                ScalarValue::Uint(value) => Value::String(value.to_string()),
                ScalarValue::Address(address) => Value::String(address.to_checksum(None)),
                ScalarValue::Bytes(bytes) => Value::String(encoding.render(bytes)),
                ScalarValue::String(value) => Value::String(value.clone()),
            },
            AbiObject::List(node) => {
                Value::Array(node.elements().iter().map(|e| e.to_json(encoding)).collect())
            }
            AbiObject::Struct(node) => Value::Object(
                node.names()
                    .iter()
                    .zip(node.fields())
                    .enumerate()
                    .map(|(index, (name, field))| (field_key(name, index), field.to_json(encoding)))
                    .collect::<Map<_, _>>(),
            ),
        }
    }

    /// Fills this node from JSON. Integers are accepted as JSON numbers, decimal strings or
    /// `0x` strings; byte payloads as prefixed strings (see [`parse_bytes`]) or arrays of
    /// byte values; structs as objects keyed like [`AbiObject::to_json`] renders them, or as
    /// positional arrays.
    pub fn fill_from_json(&mut self, value: &Value) -> Result<(), Error> {
        match self {
            AbiObject::Scalar(node) => {
                let scalar = scalar_from_json(node.kind(), value)?;
                self.set_value(scalar)
            }
            AbiObject::List(node) => {
                let Value::Array(values) = value else {
                    return Err(Error::type_mismatch(self.type_string(), describe(value)));
                };
                let elements = values
                    .iter()
                    .map(|value| {
                        let mut element = node.element_template().instantiate();
                        element.fill_from_json(value)?;
                        Ok(element)
                    })
                    .collect::<Result<Vec<_>, Error>>()?;
                self.set_elements(elements)
            }
            AbiObject::Struct(node) => {
                let values = match value {
                    Value::Array(values) => values.iter().collect::<Vec<_>>(),
                    Value::Object(map) => node
                        .names()
                        .iter()
                        .enumerate()
                        .map(|(index, name)| {
                            let key = field_key(name, index);
                            map.get(&key).ok_or_else(|| {
                                let expected = format!("object with field '{key}'");
                                Error::type_mismatch(expected, "missing field")
                            })
                        })
                        .collect::<Result<Vec<_>, Error>>()?,
                    other => return Err(Error::type_mismatch(self.type_string(), describe(other))),
                };

                if values.len() != node.fields().len() {
                    return Err(Error::ArityMismatch {
                        expected: node.fields().len(),
                        actual: values.len(),
                    });
                }
                for (index, value) in values.into_iter().enumerate() {
                    self.field_mut(index)?.fill_from_json(value)?;
                }
                Ok(())
            }
        }
    }
}

fn scalar_from_json(kind: ValueKind, value: &Value) -> Result<ScalarValue, Error> {
    let mismatch = || Error::type_mismatch(kind.type_string(), describe(value));

    match kind {
        ValueKind::Bool => value.as_bool().map(ScalarValue::Bool).ok_or_else(mismatch),
        ValueKind::Int(_) => {
            let text = integer_text(value).ok_or_else(mismatch)?;
            I256::from_str(&text)
                .map(ScalarValue::Int)
                .map_err(|e| Error::type_mismatch(kind.type_string(), format!("'{text}' ({e})")))
        }
        ValueKind::Uint(_) => {
            let text = integer_text(value).ok_or_else(mismatch)?;
            U256::from_str(&text)
                .map(ScalarValue::Uint)
                .map_err(|e| Error::type_mismatch(kind.type_string(), format!("'{text}' ({e})")))
        }
        ValueKind::Address => {
            let text = value.as_str().ok_or_else(mismatch)?;
            Address::from_str(text)
                .map(ScalarValue::Address)
                .map_err(|e| Error::type_mismatch("address", format!("'{text}' ({e})")))
        }
        ValueKind::FixedBytes(_) | ValueKind::DynamicBytes => match value {
            Value::String(text) => parse_bytes(text).map(ScalarValue::Bytes),
            Value::Array(values) => values
                .iter()
                .map(|v| v.as_u64().and_then(|b| u8::try_from(b).ok()).ok_or_else(mismatch))
                .collect::<Result<Vec<_>, Error>>()
                .map(ScalarValue::Bytes),
            _ => Err(mismatch()),
        },
        ValueKind::String => {
            value.as_str().map(|s| ScalarValue::String(s.to_string())).ok_or_else(mismatch)
        }
    }
}

fn integer_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(number) if number.is_i64() || number.is_u64() => Some(number.to_string()),
        Value::String(text) => Some(text.trim().to_string()),
        _ => None,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "json bool".to_string(),
        Value::Number(number) => format!("json number {number}"),
        Value::String(text) => format!("json string '{text}'"),
        Value::Array(values) => format!("json array of {} items", values.len()),
        Value::Object(_) => "json object".to_string(),
    }
}
