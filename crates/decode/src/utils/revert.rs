use alloy::primitives::{Selector, U256};
use mimir_abi::{object::ScalarValue, registry::FunctionDescriptor, AbiObject};

use crate::error::Error;

/// The signature of Solidity's `require` / `revert` reason payload.
pub(crate) const ERROR_SIGNATURE: &str = "Error(string)";

/// The signature of Solidity's panic payload.
pub(crate) const PANIC_SIGNATURE: &str = "Panic(uint256)";

/// A decoded revert payload.
#[derive(Debug, Clone)]
pub(crate) struct Revert {
    pub(crate) signature: String,
    pub(crate) name: String,
    pub(crate) params: Vec<(String, AbiObject)>,
    pub(crate) note: Option<String>,
}

/// Decodes the data returned by a reverted call. An empty payload is a revert without a
/// reason.
pub(crate) fn decode_revert(data: &[u8]) -> Result<Revert, Error> {
    if data.is_empty() {
        return Ok(Revert {
            signature: String::new(),
            name: String::new(),
            params: Vec::new(),
            note: Some("reverted without a reason".to_string()),
        });
    }

    let error = FunctionDescriptor::from_signature(ERROR_SIGNATURE)?;
    let panic = FunctionDescriptor::from_signature(PANIC_SIGNATURE)?;
    let prefix = data.get(..4).map(Selector::from_slice);

    let (descriptor, param_name) = match prefix {
        Some(selector) if selector == error.selector() => (error, "message"),
        Some(selector) if selector == panic.selector() => (panic, "code"),
        _ => {
            return Err(Error::UnknownRevert(format!(
                "selector {} matches neither {ERROR_SIGNATURE} nor {PANIC_SIGNATURE}",
                prefix.map(|s| s.to_string()).unwrap_or_else(|| "<truncated>".to_string())
            )))
        }
    };

    let decoded = descriptor.decode_input(data)?.into_children();
    let note = match decoded.first().and_then(AbiObject::value) {
        Some(ScalarValue::Uint(code)) => Some(panic_description(*code)),
        _ => None,
    };

    Ok(Revert {
        signature: descriptor.signature().to_string(),
        name: descriptor.name().to_string(),
        params: decoded.into_iter().map(|object| (param_name.to_string(), object)).collect(),
        note,
    })
}

/// Describes a Solidity panic code.
pub(crate) fn panic_description(code: U256) -> String {
    let Ok(code) = u64::try_from(code) else {
        return format!("panic {code:#x}: unknown panic code");
    };

    let description = match code {
        0x00 => "generic compiler inserted panic",
        0x01 => "assertion failed",
        0x11 => "arithmetic overflow or underflow",
        0x12 => "division or modulo by zero",
        0x21 => "conversion into an invalid enum value",
        0x22 => "access to an incorrectly encoded storage byte array",
        0x31 => "pop on an empty array",
        0x32 => "array index out of bounds",
        0x41 => "too much memory allocated",
        0x51 => "call to a zero-initialized internal function",
        _ => "unknown panic code",
    };

    format!("panic 0x{code:02x}: {description}")
}
