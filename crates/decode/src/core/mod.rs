use alloy::primitives::B256;
use mimir_abi::{
    registry::{DecodedEvent, EventDescriptor, FunctionDescriptor},
    selector::Keccak256,
    types::NamedType,
    AbiObject, ContractAbi,
};
use mimir_common::utils::{io::file::read_file, strings::decode_hex};
use tracing::{debug, info, trace};

use crate::{
    error::Error,
    interfaces::{DecodeArgs, DecodeKind, DecodeResult, DecodedParam, ParamValue},
    utils::{constructor_arguments, decode_revert, parse_deployment_bytecode},
};

/// Where parameter types come from.
enum Schema {
    Abi(ContractAbi),
    Signature(String),
}

/// Decodes the target payload as described by `args`.
pub fn decode(args: DecodeArgs) -> Result<DecodeResult, Error> {
    let data = args.get_target()?;
    let encoding = args.bytes_encoding.unwrap_or_default();
    debug!("decoding {} bytes", data.len());

    let is_event = !args.topics.is_empty() || args.event.is_some();
    let modes = [args.revert, is_event, args.constructor, args.output_of.is_some(), args.raw];
    if modes.iter().filter(|mode| **mode).count() > 1 {
        return Err(Error::InvalidArguments(
            "--revert, --topics/--event, --constructor, --output-of and --raw \
             are mutually exclusive"
                .to_string(),
        ));
    }

    let mut result = if args.revert {
        let revert = decode_revert(&data)?;
        DecodeResult {
            kind: DecodeKind::Revert,
            name: revert.name,
            signature: revert.signature,
            params: revert
                .params
                .into_iter()
                .map(|(name, object)| DecodedParam {
                    ty: object.type_string(),
                    name,
                    indexed: false,
                    value: ParamValue::Decoded(object),
                })
                .collect(),
            note: revert.note,
            encoding,
        }
    } else {
        let schema = load_schema(&args)?;
        if is_event {
            decode_event(&args, &schema, &data)?
        } else if args.constructor {
            decode_constructor(&args, &schema, &data)?
        } else if let Some(function) = &args.output_of {
            decode_output(function, &schema, &data)?
        } else if args.raw {
            decode_raw(&schema, &data)?
        } else {
            decode_call(&schema, &data)?
        }
    };

    result.encoding = encoding;
    info!("decoded {} as {}", result.kind, result.signature);
    Ok(result)
}

fn load_schema(args: &DecodeArgs) -> Result<Schema, Error> {
    match (&args.abi, &args.signature) {
        (Some(path), None) => {
            let contents = read_file(path)?;
            Ok(Schema::Abi(ContractAbi::from_json_str(&contents)?))
        }
        (None, Some(signature)) => Ok(Schema::Signature(signature.clone())),
        (Some(_), Some(_)) => {
            Err(Error::InvalidArguments("--abi and --signature are mutually exclusive".to_string()))
        }
        (None, None) => Err(Error::InvalidArguments(
            "pass --abi <PATH> or --signature <SIG> to describe the payload".to_string(),
        )),
    }
}

fn decode_call(schema: &Schema, data: &[u8]) -> Result<DecodeResult, Error> {
    match schema {
        Schema::Abi(abi) => {
            let (descriptor, decoded) = abi.decode_call(data)?;
            Ok(function_result(DecodeKind::Call, descriptor, descriptor.inputs(), decoded))
        }
        Schema::Signature(signature) => {
            let descriptor = FunctionDescriptor::from_signature(signature)?;
            let decoded = descriptor.decode_input(data)?;
            Ok(function_result(DecodeKind::Call, &descriptor, descriptor.inputs(), decoded))
        }
    }
}

fn decode_output(function: &str, schema: &Schema, data: &[u8]) -> Result<DecodeResult, Error> {
    let Schema::Abi(abi) = schema else {
        return Err(Error::InvalidArguments(
            "--output-of needs --abi; with --signature, use --raw and list the return types"
                .to_string(),
        ));
    };

    let descriptor = if function.contains('(') {
        abi.function_by_signature(function)?
    } else {
        abi.function(function)
            .and_then(<[_]>::first)
            .map(|descriptor| &**descriptor)
            .ok_or_else(|| mimir_abi::Error::UnknownFunction(function.to_string()))?
    };
    let decoded = descriptor.decode_output(data)?;

    Ok(function_result(DecodeKind::Output, descriptor, descriptor.outputs(), decoded))
}

fn decode_raw(schema: &Schema, data: &[u8]) -> Result<DecodeResult, Error> {
    let Schema::Signature(signature) = schema else {
        return Err(Error::InvalidArguments(
            "--raw needs --signature; with --abi, use --output-of".to_string(),
        ));
    };

    let descriptor = FunctionDescriptor::from_signature(signature)?;
    let decoded = descriptor.decode_params(data)?;
    Ok(function_result(DecodeKind::Output, &descriptor, descriptor.inputs(), decoded))
}

fn decode_constructor(
    args: &DecodeArgs,
    schema: &Schema,
    data: &[u8],
) -> Result<DecodeResult, Error> {
    let arguments = if args.bytecode.is_empty() {
        parse_deployment_bytecode(data)?.arguments
    } else {
        let bytecode = decode_hex(&args.bytecode)?;
        constructor_arguments(data, &bytecode)?
    };
    trace!("constructor arguments are {} bytes", arguments.len());

    let signature_only;
    let descriptor = match schema {
        Schema::Abi(abi) => abi.constructor(),
        Schema::Signature(signature) => {
            signature_only = FunctionDescriptor::from_signature(signature)?;
            &signature_only
        }
    };
    let decoded = descriptor.decode_params(arguments)?;

    Ok(function_result(DecodeKind::Constructor, descriptor, descriptor.inputs(), decoded))
}

fn decode_event(args: &DecodeArgs, schema: &Schema, data: &[u8]) -> Result<DecodeResult, Error> {
    let topics = args
        .topics
        .iter()
        .map(|topic| {
            let bytes = decode_hex(topic)?;
            if bytes.len() != 32 {
                return Err(Error::InvalidArguments(format!(
                    "topic '{topic}' is {} bytes, expected 32",
                    bytes.len()
                )));
            }
            Ok(B256::from_slice(&bytes))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let decoded = match schema {
        Schema::Abi(abi) => match &args.event {
            Some(name) => abi.decode_log_as(name, &topics, data)?,
            None => abi.decode_log(&topics, data)?,
        },
        Schema::Signature(signature) => {
            let mut descriptor = EventDescriptor::from_signature(signature)?;

            // one topic per indexed parameter and nothing else means the event is anonymous
            let indexed = descriptor.inputs().iter().filter(|input| input.indexed).count();
            if topics.len() == indexed && topics.first() != Some(&descriptor.topic()) {
                debug!("treating '{}' as anonymous", descriptor.signature());
                descriptor = EventDescriptor::new(
                    descriptor.name(),
                    descriptor.inputs().to_vec(),
                    true,
                    &Keccak256,
                );
            }
            descriptor.decode_log(&topics, data)?
        }
    };

    Ok(event_result(decoded))
}

fn function_result(
    kind: DecodeKind,
    descriptor: &FunctionDescriptor,
    declared: &[NamedType],
    decoded: AbiObject,
) -> DecodeResult {
    let params = declared
        .iter()
        .zip(decoded.into_children())
        .map(|(param, object)| DecodedParam {
            name: param.name.clone(),
            ty: param.ty.canonical(),
            indexed: false,
            value: ParamValue::Decoded(object),
        })
        .collect();

    DecodeResult {
        kind,
        name: descriptor.name().to_string(),
        signature: descriptor.signature().to_string(),
        params,
        note: None,
        encoding: Default::default(),
    }
}

fn event_result(event: DecodedEvent) -> DecodeResult {
    DecodeResult {
        kind: DecodeKind::Event,
        name: event.name,
        signature: event.signature,
        params: event
            .params
            .into_iter()
            .map(|param| DecodedParam {
                name: param.name,
                ty: param.ty,
                indexed: param.indexed,
                value: param.value.into(),
            })
            .collect(),
        note: None,
        encoding: Default::default(),
    }
}
