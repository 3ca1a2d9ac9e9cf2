//! The `decode` operation: turns call data, return data, constructor arguments, event logs
//! and revert payloads back into readable, typed values.

pub mod error;

mod core;
mod interfaces;
mod utils;

// re-export the public interface
pub use core::decode;
pub use interfaces::{
    DecodeArgs, DecodeArgsBuilder, DecodeKind, DecodeResult, DecodedParam, ParamValue,
};
