//! Differential checks against the alloy ABI implementation.

use alloy::primitives::{Address, B256, I256, U256};
use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_json_abi::{Function, JsonAbi};
use mimir_abi::{
    codec::{decode_params, encode_params},
    object::template_for_params,
    selector::{method_id, signature},
    types::parse_signature,
    AbiValue, ContractAbi,
};

fn to_alloy(ty: &DynSolType, value: &AbiValue) -> DynSolValue {
    match (ty, value) {
        (DynSolType::Bool, AbiValue::Bool(value)) => DynSolValue::Bool(*value),
        (DynSolType::Int(bits), AbiValue::Int(value)) => DynSolValue::Int(*value, *bits),
        (DynSolType::Uint(bits), AbiValue::Uint(value)) => DynSolValue::Uint(*value, *bits),
        (DynSolType::Address, AbiValue::Address(value)) => DynSolValue::Address(*value),
        (DynSolType::FixedBytes(size), AbiValue::FixedBytes(bytes)) => {
            let mut word = B256::ZERO;
            word[..bytes.len()].copy_from_slice(bytes);
            DynSolValue::FixedBytes(word, *size)
        }
        (DynSolType::Bytes, AbiValue::Bytes(bytes)) => DynSolValue::Bytes(bytes.clone()),
        (DynSolType::String, AbiValue::String(value)) => DynSolValue::String(value.clone()),
        (DynSolType::Array(inner), AbiValue::Array(values)) => {
            DynSolValue::Array(values.iter().map(|v| to_alloy(inner, v)).collect())
        }
        (DynSolType::FixedArray(inner, _), AbiValue::Array(values)) => {
            DynSolValue::FixedArray(values.iter().map(|v| to_alloy(inner, v)).collect())
        }
        (DynSolType::Tuple(types), AbiValue::Tuple(values)) => DynSolValue::Tuple(
            types.iter().zip(values).map(|(ty, value)| to_alloy(ty, value)).collect(),
        ),
        (ty, value) => panic!("no alloy mapping for {value:?} as {ty:?}"),
    }
}

fn assert_matches_alloy(sig: &str, values: Vec<AbiValue>) {
    let (_, params) = parse_signature(sig).expect("failed to parse signature");
    let tuple_type = format!(
        "({})",
        params.iter().map(|p| p.ty.canonical()).collect::<Vec<_>>().join(",")
    );
    let alloy_type = DynSolType::parse(&tuple_type).expect("alloy failed to parse type");
    let value = AbiValue::Tuple(values);

    let mut instance = template_for_params(&params).instantiate();
    instance.fill(&value).expect("failed to fill");
    let ours = encode_params(&instance).expect("failed to encode");
    let theirs = to_alloy(&alloy_type, &value).abi_encode_params();
    assert_eq!(ours, theirs, "encoding of {sig} differs");

    let decoded = decode_params(&template_for_params(&params), &theirs).expect("failed to decode");
    assert_eq!(decoded.to_value(), value, "decoding of {sig} differs");

    let reference = alloy_type.abi_decode_params(&ours).expect("alloy failed to decode");
    assert_eq!(reference, to_alloy(&alloy_type, &value));
}

#[test]
fn test_scalars_match_alloy() {
    assert_matches_alloy(
        "f(uint8,int16,uint256,int256,bool,address,bytes1,bytes32)",
        vec![
            AbiValue::from(255u64),
            AbiValue::Int(-I256::from_raw(U256::from(32768))),
            AbiValue::Uint(U256::MAX),
            AbiValue::Int(I256::MIN),
            AbiValue::from(true),
            AbiValue::Address(Address::repeat_byte(0xfe)),
            AbiValue::FixedBytes(vec![0x7f]),
            AbiValue::FixedBytes(vec![0x11; 32]),
        ],
    );
}

#[test]
fn test_dynamic_values_match_alloy() {
    assert_matches_alloy(
        "f(string,bytes,string)",
        vec![
            AbiValue::from(""),
            AbiValue::Bytes(vec![0xaa; 65]),
            AbiValue::from("ünïcödé"),
        ],
    );
}

#[test]
fn test_nested_arrays_match_alloy() {
    assert_matches_alloy(
        "f(uint256[][2],string[][],bool[3][])",
        vec![
            AbiValue::Array(vec![
                AbiValue::Array(vec![AbiValue::from(1u64)]),
                AbiValue::Array(vec![AbiValue::from(2u64), AbiValue::from(3u64)]),
            ]),
            AbiValue::Array(vec![
                AbiValue::Array(vec![]),
                AbiValue::Array(vec![AbiValue::from("x"), AbiValue::from("yz")]),
            ]),
            AbiValue::Array(vec![AbiValue::Array(vec![
                AbiValue::from(true),
                AbiValue::from(false),
                AbiValue::from(true),
            ])]),
        ],
    );
}

#[test]
fn test_structs_match_alloy() {
    assert_matches_alloy(
        "f((uint256,(address,bytes)[],string),(bool,uint8)[2],uint64)",
        vec![
            AbiValue::Tuple(vec![
                AbiValue::from(42u64),
                AbiValue::Array(vec![
                    AbiValue::Tuple(vec![
                        AbiValue::Address(Address::repeat_byte(1)),
                        AbiValue::Bytes(vec![1, 2]),
                    ]),
                    AbiValue::Tuple(vec![
                        AbiValue::Address(Address::ZERO),
                        AbiValue::Bytes(vec![]),
                    ]),
                ]),
                AbiValue::from("nested"),
            ]),
            AbiValue::Array(vec![
                AbiValue::Tuple(vec![AbiValue::from(true), AbiValue::from(1u64)]),
                AbiValue::Tuple(vec![AbiValue::from(false), AbiValue::from(2u64)]),
            ]),
            AbiValue::from(u64::MAX),
        ],
    );
}

#[test]
fn test_selectors_match_alloy() {
    for sig in [
        "transfer(address,uint256)",
        "exactInputSingle((address,address,uint24,address,uint256,uint256,uint256,uint160))",
        "multicall(bytes[])",
        "setFixedValue(uint256[3],bool[3],address[3],bytes32[3],string[3],bytes[3])",
    ] {
        let (name, params) = parse_signature(sig).expect("failed to parse signature");
        let reference = Function::parse(sig).expect("alloy failed to parse signature");
        assert_eq!(signature(&name, &params), reference.signature());
        assert_eq!(method_id(sig), reference.selector());
    }
}

#[test]
fn test_registry_matches_json_abi() {
    let json = r#"[
        {
            "type":"function",
            "name":"approve",
            "inputs":[{"name":"spender","type":"address"},{"name":"amount","type":"uint256"}],
            "outputs":[{"name":"","type":"bool"}],
            "stateMutability":"nonpayable"
        },
        {
            "type":"function",
            "name":"swap",
            "inputs":[
                {
                    "name":"route",
                    "type":"tuple[]",
                    "components":[{"name":"pool","type":"address"},{"name":"fee","type":"uint24"}]
                },
                {"name":"data","type":"bytes"}
            ],
            "outputs":[],
            "stateMutability":"payable"
        },
        {
            "type":"event",
            "name":"Approval",
            "inputs":[
                {"name":"owner","type":"address","indexed":true},
                {"name":"spender","type":"address","indexed":true},
                {"name":"value","type":"uint256","indexed":false}
            ],
            "anonymous":false
        }
    ]"#;

    let ours = ContractAbi::from_json_str(json).expect("failed to parse abi");
    let theirs: JsonAbi = serde_json::from_str(json).expect("alloy failed to parse abi");

    for function in theirs.functions() {
        let descriptor = ours
            .function_by_selector(&function.selector())
            .expect("selector should be indexed");
        assert_eq!(descriptor.signature(), function.signature());
    }
    for event in theirs.events() {
        let descriptor = ours.event_by_topic(&event.selector()).expect("topic should be indexed");
        assert_eq!(descriptor.signature(), event.signature());
    }
}
