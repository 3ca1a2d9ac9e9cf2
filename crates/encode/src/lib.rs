//! The `encode` operation: turns a function name or signature plus human-readable arguments
//! into contract call data or constructor arguments.

pub mod error;

mod core;
mod interfaces;
mod utils;

// re-export the public interface
pub use core::{encode, EncodeResult};
pub use interfaces::{EncodeArgs, EncodeArgsBuilder};
