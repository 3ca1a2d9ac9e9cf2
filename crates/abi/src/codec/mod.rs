//! The word-level codecs.
//!
//! Everything here is a pure function of its inputs: no logging, no shared state.

pub mod composite;
pub mod dynamic;
pub mod scalar;

use alloy::primitives::U256;

pub use composite::{decode_params, encode_params};

use crate::error::Error;

/// The size, in bytes, of one ABI word.
pub const WORD_SIZE: usize = 32;

/// Reads the 32-byte word starting at `offset`.
pub(crate) fn read_word(data: &[u8], offset: usize) -> Result<&[u8; WORD_SIZE], Error> {
    offset
        .checked_add(WORD_SIZE)
        .and_then(|end| data.get(offset..end))
        .and_then(|word| word.try_into().ok())
        .ok_or_else(|| Error::truncated(offset, WORD_SIZE, data.len()))
}

/// Reads the word at `offset` as a length or pointer. Values that cannot address a byte of
/// any in-memory buffer are reported as truncation.
pub(crate) fn read_usize(data: &[u8], offset: usize) -> Result<usize, Error> {
    let word = read_word(data, offset)?;
    let too_large = || Error::truncated(offset, usize::MAX, data.len());

    if word[..24].iter().any(|b| *b != 0) {
        return Err(too_large());
    }

    let mut low = [0u8; 8];
    low.copy_from_slice(&word[24..]);
    usize::try_from(u64::from_be_bytes(low)).map_err(|_| too_large())
}

/// Encodes a length or pointer as a word.
pub(crate) fn usize_word(value: usize) -> [u8; WORD_SIZE] {
    U256::from(value).to_be_bytes::<WORD_SIZE>()
}

/// Rounds `len` up to the next multiple of [`WORD_SIZE`].
pub(crate) fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD_SIZE) * WORD_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_word_truncated() {
        let data = [0u8; 40];
        assert!(read_word(&data, 8).is_ok());
        assert!(matches!(
            read_word(&data, 9),
            Err(Error::TruncatedInput { offset: 9, needed: 32, available: 40 })
        ));
        assert!(read_word(&data, usize::MAX).is_err());
    }

    #[test]
    fn test_read_usize_rejects_huge_values() {
        let mut data = [0u8; 32];
        data[0] = 1;
        assert!(matches!(read_usize(&data, 0), Err(Error::TruncatedInput { .. })));

        let mut data = [0u8; 32];
        data[31] = 0x40;
        assert_eq!(read_usize(&data, 0).expect("should read"), 0x40);
    }

    #[test]
    fn test_padded_len() {
        assert_eq!(padded_len(0), 0);
        assert_eq!(padded_len(1), 32);
        assert_eq!(padded_len(32), 32);
        assert_eq!(padded_len(33), 64);
    }

    #[test]
    fn test_usize_word() {
        let word = usize_word(0xc0);
        assert_eq!(word[31], 0xc0);
        assert!(word[..31].iter().all(|b| *b == 0));
    }
}
