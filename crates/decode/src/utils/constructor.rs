use mimir_common::{constants::CONSTRUCTOR_REGEX, utils::strings::encode_hex};
use tracing::{debug, warn};

use crate::error::Error;

/// How many trailing bytes of the supplied bytecode are searched for when the deployment
/// input doesn't start with it verbatim.
pub(crate) const CONSTRUCTOR_SUFFIX_LENGTH: usize = 32;

#[derive(Debug, Clone)]
pub(crate) struct Constructor<'a> {
    pub(crate) constructor: &'a [u8],
    pub(crate) contract: &'a [u8],
    pub(crate) metadata: &'a [u8],
    pub(crate) arguments: &'a [u8],
}

/// Splits standard solc creation code into its constructor, runtime code, metadata and the
/// appended constructor arguments, reading the runtime length and offset from the
/// `CODECOPY` / `RETURN` preamble.
pub(crate) fn parse_deployment_bytecode(input: &[u8]) -> Result<Constructor<'_>, Error> {
    let hex = encode_hex(input);

    let captures = CONSTRUCTOR_REGEX
        .captures(&hex)
        .map_err(|e| Error::Constructor(format!("failed to run constructor regex: {e}")))?
        .ok_or_else(|| {
            Error::Constructor(
                "nonstandard constructor bytecode, or no constructor arguments exist".to_string(),
            )
        })?;

    // the regex runs over hex text, so a match always starts on an even character
    let preamble_start = captures.get(0).map(|m| m.start() / 2).unwrap_or_default();
    let group = |indices: [usize; 3], what: &str| -> Result<usize, Error> {
        let text = indices
            .iter()
            .find_map(|&i| captures.get(i))
            .ok_or_else(|| Error::Constructor(format!("{what} not found")))?
            .as_str();
        usize::from_str_radix(text, 16)
            .map_err(|e| Error::Constructor(format!("invalid {what} '{text}': {e}")))
    };
    let contract_length = group([1, 2, 3], "contract length")?;
    let contract_offset = group([4, 5, 6], "contract offset")?;

    let contract_end = contract_offset
        .checked_add(contract_length)
        .filter(|end| *end <= input.len() && contract_offset >= preamble_start)
        .ok_or_else(|| {
            Error::Constructor(format!(
                "runtime code at {contract_offset}..+{contract_length} exceeds the {} byte input",
                input.len()
            ))
        })?;
    let contract = &input[contract_offset..contract_end];

    // solc appends the CBOR metadata length as the final two bytes of the runtime code
    let metadata_length = match contract {
        [.., high, low] => usize::from(u16::from_be_bytes([*high, *low])) + 2,
        _ => 0,
    };
    let metadata = contract
        .len()
        .checked_sub(metadata_length)
        .map(|start| &contract[start..])
        .ok_or_else(|| Error::Constructor("metadata is longer than the runtime code".to_string()))?;

    let parsed = Constructor {
        constructor: &input[..contract_offset],
        contract,
        metadata,
        arguments: &input[contract_end..],
    };
    debug!(
        "split deployment bytecode: {} byte constructor, {} byte runtime \
         ({} byte metadata), {} byte arguments",
        parsed.constructor.len(),
        parsed.contract.len(),
        parsed.metadata.len(),
        parsed.arguments.len()
    );

    Ok(parsed)
}

/// Locates the constructor arguments in a deployment input, given the bytecode they were
/// appended to.
///
/// If the input doesn't start with `bytecode` verbatim (i.e. immutables were patched in), the
/// last [`CONSTRUCTOR_SUFFIX_LENGTH`] bytes of the bytecode are searched for instead and the
/// arguments are taken to start right after their first occurrence. That search misfires if
/// the suffix also occurs earlier in the input.
pub(crate) fn constructor_arguments<'a>(
    input: &'a [u8],
    bytecode: &[u8],
) -> Result<&'a [u8], Error> {
    if bytecode.is_empty() {
        return Err(Error::Constructor("no bytecode to search for".to_string()));
    }
    if let Some(arguments) = input.strip_prefix(bytecode) {
        return Ok(arguments);
    }

    let suffix_length = bytecode.len().min(CONSTRUCTOR_SUFFIX_LENGTH);

    let suffix = &bytecode[bytecode.len() - suffix_length..];
    let position = input
        .windows(suffix_length)
        .position(|window| window == suffix)
        .ok_or_else(|| {
            Error::Constructor("the input contains neither the bytecode nor its suffix".to_string())
        })?;
    warn!(
        "input does not start with the supplied bytecode; \
         located arguments by a {} byte suffix match at offset {}",
        suffix_length, position
    );

    Ok(&input[position + suffix_length..])
}

#[cfg(test)]
mod tests {
    use mimir_common::utils::strings::decode_hex;

    use super::*;

    // PUSH1 0x0a DUP1 PUSH1 0x0c PUSH1 0 CODECOPY PUSH1 0 RETURN INVALID, then ten bytes of
    // runtime code ending in a 4 byte metadata length
    const CREATION_CODE: &str = "600a80600c6000396000f3fe6080604052a261620004";

    #[test]
    fn test_parse_deployment_bytecode() {
        let input = decode_hex(&format!(
            "{CREATION_CODE}{}",
            "000000000000000000000000000000000000000000000000000000000000002a"
        ))
        .expect("valid hex");

        let parsed = parse_deployment_bytecode(&input).expect("failed to parse bytecode");
        assert_eq!(parsed.constructor.len(), 12);
        assert_eq!(parsed.contract.len(), 10);
        assert_eq!(parsed.metadata.len(), 6);
        assert_eq!(parsed.arguments.len(), 32);
        assert_eq!(parsed.arguments[31], 0x2a);
    }

    #[test]
    fn test_parse_nonstandard_bytecode() {
        let input = decode_hex("0x6080604052").expect("valid hex");
        assert!(matches!(parse_deployment_bytecode(&input), Err(Error::Constructor(_))));
    }

    #[test]
    fn test_parse_truncated_runtime() {
        // the preamble claims 0xff bytes of runtime code
        let input = decode_hex("60ff80600c6000396000f3fe6080").expect("valid hex");
        assert!(matches!(parse_deployment_bytecode(&input), Err(Error::Constructor(_))));
    }

    #[test]
    fn test_constructor_arguments_prefix() {
        let bytecode = vec![0x60, 0x80, 0x60, 0x40];
        let input = [bytecode.clone(), vec![0xaa; 32]].concat();
        assert_eq!(constructor_arguments(&input, &bytecode).expect("found"), &[0xaa; 32]);
    }

    #[test]
    fn test_constructor_arguments_suffix() {
        let bytecode = (0u8..64).collect::<Vec<_>>();
        let mut patched = bytecode.clone();
        patched[0] = 0xff;
        let input = [patched, vec![0xbb; 32]].concat();

        assert_eq!(constructor_arguments(&input, &bytecode).expect("found"), &[0xbb; 32]);
    }

    #[test]
    fn test_constructor_arguments_missing() {
        assert!(matches!(
            constructor_arguments(&[0x01, 0x02], &[0x03]),
            Err(Error::Constructor(_))
        ));
        assert!(matches!(constructor_arguments(&[0x01], &[]), Err(Error::Constructor(_))));
    }
}
