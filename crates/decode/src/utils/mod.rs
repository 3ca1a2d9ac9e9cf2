mod constructor;
mod revert;

// re-export
pub(crate) use constructor::{constructor_arguments, parse_deployment_bytecode};
pub(crate) use revert::{decode_revert, Revert};
