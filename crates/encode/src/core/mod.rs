use alloy::primitives::Selector;
use mimir_abi::{registry::FunctionDescriptor, ContractAbi};
use mimir_common::utils::{
    io::file::read_file,
    strings::{decode_hex, encode_hex_prefixed},
};
use serde_json::Value;
use tracing::{debug, info};

use crate::{error::Error, interfaces::EncodeArgs, utils::parse_argument};

/// Result of a successful encode operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeResult {
    /// The canonical signature of the encoded function or constructor
    pub signature: String,
    /// The encoded bytes: selector and arguments for calls, bytecode and arguments for
    /// constructors
    pub encoded: Vec<u8>,
}

impl EncodeResult {
    /// The encoded bytes as a `0x` prefixed hex string
    pub fn to_hex(&self) -> String {
        encode_hex_prefixed(&self.encoded)
    }

    /// Prints the encoded bytes to stdout
    pub fn display(&self) {
        println!("{}", self.to_hex());
    }
}

/// Encodes call data or constructor arguments as described by `args`.
pub fn encode(args: EncodeArgs) -> Result<EncodeResult, Error> {
    let values = args.args.iter().map(|arg| parse_argument(arg)).collect::<Result<Vec<_>, _>>()?;
    debug!("parsed {} arguments for '{}'", values.len(), args.function);

    let abi = match &args.abi {
        Some(path) => {
            let contents = read_file(path)?;
            Some(ContractAbi::from_json_str(&contents)?)
        }
        None => None,
    };

    if args.constructor {
        return encode_constructor(&args, abi.as_ref(), &values);
    }
    if !args.bytecode.is_empty() {
        return Err(Error::InvalidArguments("--bytecode requires --constructor".to_string()));
    }

    let is_signature = args.function.contains('(');
    let result = match &abi {
        // a bare name resolves overloads by trying each candidate
        Some(abi) if !is_signature => {
            let encoded = abi.encode_call_json(&args.function, &values)?;
            let signature = abi
                .function_by_selector(&Selector::from_slice(&encoded[..4]))
                .map(|f| f.signature().to_string())
                .unwrap_or_else(|| args.function.clone());
            EncodeResult { signature, encoded }
        }
        Some(abi) => encode_with(abi.function_by_signature(&args.function)?, &values)?,
        None if is_signature => {
            encode_with(&FunctionDescriptor::from_signature(&args.function)?, &values)?
        }
        None => {
            return Err(Error::InvalidArguments(format!(
                "'{}' is not a signature; \
                 pass --abi or a full signature such as 'transfer(address,uint256)'",
                args.function
            )))
        }
    };

    info!("encoded call to '{}' ({} bytes)", result.signature, result.encoded.len());
    Ok(result)
}

fn encode_with(descriptor: &FunctionDescriptor, values: &[Value]) -> Result<EncodeResult, Error> {
    Ok(EncodeResult {
        signature: descriptor.signature().to_string(),
        encoded: descriptor.encode_input_json(values)?,
    })
}

fn encode_constructor(
    args: &EncodeArgs,
    abi: Option<&ContractAbi>,
    values: &[Value],
) -> Result<EncodeResult, Error> {
    let signature_only;
    let descriptor = match abi {
        Some(abi) => abi.constructor(),
        None => {
            // the name of an inline constructor signature is ignored
            signature_only = FunctionDescriptor::from_signature(&args.function)?;
            &signature_only
        }
    };

    let bytecode = if args.bytecode.is_empty() { Vec::new() } else { decode_hex(&args.bytecode)? };
    let encoded = [bytecode, descriptor.encode_params_json(values)?].concat();
    info!("encoded constructor '{}' ({} bytes)", descriptor.signature(), encoded.len());

    Ok(EncodeResult { signature: descriptor.signature().to_string(), encoded })
}
