//! Error types for the ABI codec

use alloy::primitives::{Selector, B256};

/// Errors that can occur while parsing ABI definitions or encoding / decoding values
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The ABI definition violates the schema: an unparsable type string, a tuple without
    /// components, or an otherwise inconsistent declaration
    #[error("malformed abi definition: {0}")]
    MalformedAbiDefinition(String),

    /// The type is syntactically recognized but no codec rule exists for it
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// The number of supplied values differs from the number of declared parameters
    #[error("arity mismatch: expected {expected} values, got {actual}")]
    ArityMismatch {
        /// The declared number of values
        expected: usize,
        /// The supplied number of values
        actual: usize,
    },

    /// The supplied value (or JSON node) doesn't match the declared type
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The declared type
        expected: String,
        /// A description of what was supplied
        actual: String,
    },

    /// An integer exceeds its declared bit width, or a fixed-size byte string has the
    /// wrong length
    #[error("value out of range: {0}")]
    ValueOutOfRange(String),

    /// The input buffer is shorter than the type requires
    #[error(
        "truncated input: needed {needed} bytes at offset {offset}, \
         but the input is {available} bytes long"
    )]
    TruncatedInput {
        /// The byte offset the read started at
        offset: usize,
        /// The number of bytes the read required
        needed: usize,
        /// The total length of the input buffer
        available: usize,
    },

    /// No function matches the 4-byte selector
    #[error("unknown selector: {0}")]
    UnknownSelector(Selector),

    /// No event matches the 32-byte topic
    #[error("unknown event topic: {0}")]
    UnknownEventTopic(B256),

    /// A fixed-length array was declared (or observed) with a length of zero
    #[error("invalid fixed array length: {0}")]
    InvalidFixedArrayLength(String),

    /// Decoding produced more output than the input size allows, i.e. offsets alias one another
    #[error("decoded output exceeds {limit} units for a {input_len} byte input")]
    DecodeLimitExceeded {
        /// The output units allowed for this input
        limit: usize,
        /// The length of the encoded input
        input_len: usize,
    },

    /// No function with the given name exists in the ABI
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// No event with the given name exists in the ABI
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// Every same-named, same-arity overload rejected the supplied values
    #[error(
        "no overload of `{name}` accepts the supplied values \
         ({tried} candidates tried, last error: {last})"
    )]
    NoMatchingOverload {
        /// The function or event name
        name: String,
        /// The number of candidates attempted
        tried: usize,
        /// The error reported by the last candidate
        last: String,
    },

    /// The ABI JSON document could not be deserialized
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn type_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        Error::TypeMismatch { expected: expected.to_string(), actual: actual.to_string() }
    }

    pub(crate) fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        Error::TruncatedInput { offset, needed, available }
    }
}
