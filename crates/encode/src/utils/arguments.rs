use serde_json::Value;

use crate::error::Error;

/// Reads one command line argument into the JSON shape the ABI bridge accepts. Arrays,
/// objects and booleans are parsed as JSON; anything else stays a string, which the bridge
/// interprets per parameter type (decimal or `0x` integers, addresses, `hex://` bytes, text).
pub(crate) fn parse_argument(arg: &str) -> Result<Value, Error> {
    let trimmed = arg.trim();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return serde_json::from_str(trimmed).map_err(|e| {
            Error::InvalidArguments(format!("argument '{arg}' is not valid JSON: {e}"))
        });
    }

    Ok(match trimmed {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(arg.to_string()),
    })
}
