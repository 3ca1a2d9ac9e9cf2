//! The Ethereum contract ABI type system and codec engine.
//!
//! Type strings are parsed once into [`types::CanonicalType`]s, from which zero-valued
//! [`AbiObject`] templates are built. Every encode or decode call instantiates a fresh tree
//! from a template, fills or reads it, and runs it through the head/tail codec in [`codec`].
//! [`ContractAbi`] indexes a contract's functions and events by name, selector and topic.

pub mod codec;
pub mod error;
pub mod json;
pub mod object;
pub mod registry;
pub mod selector;
pub mod types;

// re-export the public interface
pub use error::Error;
pub use json::BytesEncoding;
pub use object::{AbiObject, AbiValue};
pub use registry::ContractAbi;
