//! Length-prefixed values: `bytes` and `string`.

use super::{padded_len, read_usize, usize_word, WORD_SIZE};
use crate::error::Error;

/// Encodes a byte string as a length word, the raw bytes, and zero padding up to the next
/// word boundary.
///
/// ```
/// use mimir_abi::codec::dynamic::encode_bytes;
///
/// let encoded = encode_bytes(b"dave");
/// assert_eq!(encoded.len(), 64);
/// assert_eq!(encoded[31], 4);
/// assert_eq!(&encoded[32..36], b"dave");
/// ```
pub fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(WORD_SIZE + padded_len(bytes.len()));
    encoded.extend_from_slice(&usize_word(bytes.len()));
    encoded.extend_from_slice(bytes);
    encoded.resize(WORD_SIZE + padded_len(bytes.len()), 0);
    encoded
}

/// Encodes a string as its UTF-8 bytes, with the same layout as [`encode_bytes`].
pub fn encode_string(value: &str) -> Vec<u8> {
    encode_bytes(value.as_bytes())
}

/// Decodes the byte string whose length word starts at `offset`. Exactly `length` bytes are
/// read; trailing padding is not inspected.
pub fn decode_bytes(data: &[u8], offset: usize) -> Result<Vec<u8>, Error> {
    let len = read_usize(data, offset)?;
    let start = offset + WORD_SIZE;

    start
        .checked_add(len)
        .and_then(|end| data.get(start..end))
        .map(<[u8]>::to_vec)
        .ok_or_else(|| Error::truncated(start, len, data.len()))
}

/// Decodes the string whose length word starts at `offset`.
pub fn decode_string(data: &[u8], offset: usize) -> Result<String, Error> {
    String::from_utf8(decode_bytes(data, offset)?)
        .map_err(|e| Error::type_mismatch("string", format!("invalid utf-8 ({e})")))
}
