mod args;
mod result;

// re-export the public interface
pub use args::{DecodeArgs, DecodeArgsBuilder};
pub use result::{DecodeKind, DecodeResult, DecodedParam, ParamValue};
