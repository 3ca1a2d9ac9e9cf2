//! Single-word values: integers, booleans, addresses and `bytesN`.

use alloy::primitives::{Address, I256, U256};

use super::WORD_SIZE;
use crate::{
    error::Error,
    object::{ScalarValue, ValueKind},
};

/// Checks that `value` is a legal payload for a leaf of the given kind: the right shape,
/// integers within their declared width, and `bytesN` of exactly `N` bytes.
pub fn validate(kind: ValueKind, value: &ScalarValue) -> Result<(), Error> {
    match (kind, value) {
        (ValueKind::Bool, ScalarValue::Bool(_)) |
        (ValueKind::Address, ScalarValue::Address(_)) |
        (ValueKind::DynamicBytes, ScalarValue::Bytes(_)) |
        (ValueKind::String, ScalarValue::String(_)) => Ok(()),
        (ValueKind::Uint(bits), ScalarValue::Uint(value)) => {
            if value.bit_len() > bits {
                return Err(Error::ValueOutOfRange(format!("{value} does not fit in uint{bits}")));
            }
            Ok(())
        }
        (ValueKind::Int(bits), ScalarValue::Int(value)) => {
            if !fits_signed(value, bits) {
                return Err(Error::ValueOutOfRange(format!("{value} does not fit in int{bits}")));
            }
            Ok(())
        }
        (ValueKind::FixedBytes(size), ScalarValue::Bytes(bytes)) => {
            if bytes.len() != size {
                return Err(Error::ValueOutOfRange(format!(
                    "bytes{size} requires exactly {size} bytes, got {}",
                    bytes.len()
                )));
            }
            Ok(())
        }
        (kind, value) => Err(Error::type_mismatch(kind.type_string(), value.describe())),
    }
}

/// Encodes a validated single-word value.
///
/// ```
/// use alloy::primitives::I256;
/// use mimir_abi::{codec::scalar::encode_word, object::{ScalarValue, ValueKind}};
///
/// let word = encode_word(ValueKind::Int(8), &ScalarValue::Int(I256::MINUS_ONE))
///     .expect("failed to encode");
/// assert_eq!(word, [0xff; 32]);
/// ```
pub fn encode_word(kind: ValueKind, value: &ScalarValue) -> Result<[u8; WORD_SIZE], Error> {
    validate(kind, value)?;

    let mut word = [0u8; WORD_SIZE];
    match value {
        ScalarValue::Bool(value) => word[WORD_SIZE - 1] = u8::from(*value),
        ScalarValue::Uint(value) => word = value.to_be_bytes::<WORD_SIZE>(),
        // two's complement over the full word already carries the sign filler
        ScalarValue::Int(value) => word = value.into_raw().to_be_bytes::<WORD_SIZE>(),
        ScalarValue::Address(address) => word[12..].copy_from_slice(address.as_slice()),
        ScalarValue::Bytes(bytes) if !kind.is_dynamic() => {
            word[..bytes.len()].copy_from_slice(bytes)
        }
        _ => return Err(Error::type_mismatch("single-word value", kind.type_string())),
    }

    Ok(word)
}

/// Decodes a single-word value. Integers are read from the low `bits / 8` bytes only, with
/// sign extension for `intN`. Any word other than the canonical `true` word decodes to
/// `false`.
pub fn decode_word(kind: ValueKind, word: &[u8; WORD_SIZE]) -> Result<ScalarValue, Error> {
    match kind {
        ValueKind::Bool => {
            let canonical_true =
                word[..WORD_SIZE - 1].iter().all(|b| *b == 0) && word[WORD_SIZE - 1] == 1;
            Ok(ScalarValue::Bool(canonical_true))
        }
        ValueKind::Uint(bits) => {
            let width = bits / 8;
            Ok(ScalarValue::Uint(U256::from_be_slice(&word[WORD_SIZE - width..])))
        }
        ValueKind::Int(bits) => {
            let width = bits / 8;
            let filler = if word[WORD_SIZE - width] & 0x80 != 0 { 0xff } else { 0x00 };
            let mut extended = [filler; WORD_SIZE];
            extended[WORD_SIZE - width..].copy_from_slice(&word[WORD_SIZE - width..]);
            Ok(ScalarValue::Int(I256::from_raw(U256::from_be_bytes(extended))))
        }
        ValueKind::Address => Ok(ScalarValue::Address(Address::from_slice(&word[12..]))),
        ValueKind::FixedBytes(size) => Ok(ScalarValue::Bytes(word[..size].to_vec())),
        ValueKind::DynamicBytes | ValueKind::String => {
            Err(Error::type_mismatch("single-word value", kind.type_string()))
        }
    }
}

fn fits_signed(value: &I256, bits: usize) -> bool {
    if bits >= 256 {
        return true;
    }

    let width = bits / 8;
    let bytes = value.into_raw().to_be_bytes::<WORD_SIZE>();
    let negative = value.is_negative();
    let filler = if negative { 0xff } else { 0x00 };

    bytes[..WORD_SIZE - width].iter().all(|b| *b == filler) &&
        (bytes[WORD_SIZE - width] & 0x80 != 0) == negative
}
