//! Signature text, 4-byte method IDs and 32-byte event topics.

use std::fmt::Debug;

use alloy::primitives::{keccak256, Selector, B256};

use crate::types::NamedType;

/// The hash function signatures are digested with.
pub trait SignatureHasher: Send + Sync + Debug {
    /// Hashes `input` into a 32-byte digest.
    fn hash(&self, input: &[u8]) -> B256;
}

/// Keccak-256, the hash Ethereum uses for selectors and topics.
#[derive(Debug, Clone, Copy, Default)]
pub struct Keccak256;

impl SignatureHasher for Keccak256 {
    fn hash(&self, input: &[u8]) -> B256 {
        keccak256(input)
    }
}

/// Builds the canonical signature `name(t1,t2,...)`, expanding tuples recursively.
///
/// ```
/// use mimir_abi::{selector::signature, types::parse_signature};
///
/// let (name, params) =
///     parse_signature("submit((address,uint256)[], bytes)").expect("failed to parse signature");
/// assert_eq!(signature(&name, &params), "submit((address,uint256)[],bytes)");
/// ```
pub fn signature(name: &str, params: &[NamedType]) -> String {
    format!(
        "{name}({})",
        params.iter().map(|param| param.ty.canonical()).collect::<Vec<_>>().join(",")
    )
}

/// The 4-byte method ID of a signature, using [`Keccak256`].
///
/// ```
/// use mimir_abi::selector::method_id;
///
/// assert_eq!(method_id("transfer(address,uint256)").to_string(), "0xa9059cbb");
/// ```
pub fn method_id(signature: &str) -> Selector {
    method_id_with(&Keccak256, signature)
}

/// The 4-byte method ID of a signature, using the given hasher.
pub fn method_id_with(hasher: &dyn SignatureHasher, signature: &str) -> Selector {
    Selector::from_slice(&hasher.hash(signature.as_bytes())[..4])
}

/// The 32-byte event topic of a signature, using [`Keccak256`].
pub fn event_topic(signature: &str) -> B256 {
    event_topic_with(&Keccak256, signature)
}

/// The 32-byte event topic of a signature, using the given hasher.
pub fn event_topic_with(hasher: &dyn SignatureHasher, signature: &str) -> B256 {
    hasher.hash(signature.as_bytes())
}
