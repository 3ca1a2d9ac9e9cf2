use alloy::primitives::{Address, U256};
use mimir_abi::{object::ScalarValue, AbiValue, BytesEncoding, ContractAbi, Error};
use mimir_common::utils::strings::{decode_hex, encode_hex};

const FIXTURE_ABI: &str = r#"[
    {
        "type": "function",
        "name": "getValue",
        "inputs": [],
        "outputs": [
            { "name": "", "type": "uint256" },
            { "name": "", "type": "bool" },
            { "name": "", "type": "address" },
            { "name": "", "type": "bytes32" },
            { "name": "", "type": "string" },
            { "name": "", "type": "bytes" }
        ],
        "stateMutability": "view"
    },
    {
        "type": "function",
        "name": "getDynamicValue",
        "inputs": [],
        "outputs": [
            { "name": "", "type": "uint256[]" },
            { "name": "", "type": "bool[]" },
            { "name": "", "type": "address[]" },
            { "name": "", "type": "bytes32[]" },
            { "name": "", "type": "string[]" },
            { "name": "", "type": "bytes[]" }
        ],
        "stateMutability": "view"
    },
    {
        "type": "function",
        "name": "getFixedValue",
        "inputs": [],
        "outputs": [
            { "name": "", "type": "uint256[3]" },
            { "name": "", "type": "bool[3]" },
            { "name": "", "type": "address[3]" },
            { "name": "", "type": "bytes32[3]" },
            { "name": "", "type": "string[3]" },
            { "name": "", "type": "bytes[3]" }
        ],
        "constant": true
    },
    {
        "type": "function",
        "name": "setDynamicValue",
        "inputs": [
            { "name": "_uintArr", "type": "uint256[]" },
            { "name": "_boolArr", "type": "bool[]" },
            { "name": "_addressArr", "type": "address[]" },
            { "name": "_bytes32Arr", "type": "bytes32[]" },
            { "name": "_stringArr", "type": "string[]" },
            { "name": "_bytesArr", "type": "bytes[]" }
        ],
        "outputs": [],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "setFixedValue",
        "inputs": [
            { "name": "_uintArr", "type": "uint256[3]" },
            { "name": "_boolArr", "type": "bool[3]" },
            { "name": "_addressArr", "type": "address[3]" },
            { "name": "_bytes32Arr", "type": "bytes32[3]" },
            { "name": "_stringArr", "type": "string[3]" },
            { "name": "_bytesArr", "type": "bytes[3]" }
        ],
        "outputs": [],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "setValue",
        "inputs": [
            { "name": "_uint", "type": "uint256" },
            { "name": "_bool", "type": "bool" },
            { "name": "_address", "type": "address" },
            { "name": "_bytes32", "type": "bytes32" },
            { "name": "_string", "type": "string" },
            { "name": "_bytes", "type": "bytes" }
        ],
        "outputs": [],
        "payable": false
    },
    {
        "type": "event",
        "name": "ValueChanged",
        "inputs": [
            { "name": "setter", "type": "address", "indexed": true },
            { "name": "value", "type": "uint256", "indexed": false }
        ],
        "anonymous": false
    }
]"#;

fn fixture() -> ContractAbi {
    ContractAbi::from_json_str(FIXTURE_ABI).expect("failed to parse fixture abi")
}

fn empty_array() -> AbiValue {
    AbiValue::Array(Vec::new())
}

#[test]
fn test_fixture_selectors() {
    let abi = fixture();
    let selectors = abi
        .functions()
        .map(|f| (f.name().to_string(), f.selector().to_string()))
        .collect::<Vec<_>>();

    assert_eq!(
        selectors,
        vec![
            ("getValue".to_string(), "0x20965255".to_string()),
            ("getDynamicValue".to_string(), "0xed4d0e39".to_string()),
            ("getFixedValue".to_string(), "0xc1cee39a".to_string()),
            ("setDynamicValue".to_string(), "0xdfed87e3".to_string()),
            ("setFixedValue".to_string(), "0x63e5584b".to_string()),
            ("setValue".to_string(), "0x11cfbe17".to_string()),
        ]
    );
}

#[test]
fn test_empty_dynamic_fixture() {
    let abi = fixture();
    let calldata = abi
        .encode_call("setDynamicValue", &vec![empty_array(); 6])
        .expect("failed to encode setDynamicValue");

    assert_eq!(
        encode_hex(&calldata),
        [
            "dfed87e3",
            "00000000000000000000000000000000000000000000000000000000000000c0",
            "00000000000000000000000000000000000000000000000000000000000000e0",
            "0000000000000000000000000000000000000000000000000000000000000100",
            "0000000000000000000000000000000000000000000000000000000000000120",
            "0000000000000000000000000000000000000000000000000000000000000140",
            "0000000000000000000000000000000000000000000000000000000000000160",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000000",
        ]
        .concat()
    );

    // the argument tuple of setDynamicValue has the same shape as getDynamicValue's outputs
    let outputs = abi
        .decode_output("getDynamicValue", &calldata[4..])
        .expect("failed to decode getDynamicValue output");
    assert_eq!(outputs.len(), 6);
    assert!(outputs.children().iter().all(|output| output.is_empty()));
}

#[test]
fn test_set_value_roundtrip() {
    let abi = fixture();
    let owner: Address =
        "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().expect("valid address");
    let args = vec![
        AbiValue::Uint(U256::MAX),
        AbiValue::from(true),
        AbiValue::from(owner),
        AbiValue::FixedBytes(vec![0xab; 32]),
        AbiValue::from("Lorem ipsum dolor sit amet, consectetur adipiscing elit"),
        AbiValue::Bytes(vec![]),
    ];

    let calldata = abi.encode_call("setValue", &args).expect("failed to encode setValue");
    let (descriptor, decoded) = abi.decode_call(&calldata).expect("failed to decode setValue");

    assert_eq!(descriptor.name(), "setValue");
    assert_eq!(decoded.to_value(), AbiValue::Tuple(args));
    assert_eq!(
        decoded.field("_address").and_then(|field| field.value()),
        Some(&ScalarValue::Address(owner))
    );
}

#[test]
fn test_set_fixed_value_roundtrip() {
    let abi = fixture();
    let args = vec![
        AbiValue::Array(vec![AbiValue::from(1u64), AbiValue::from(2u64), AbiValue::from(3u64)]),
        AbiValue::Array(vec![AbiValue::from(true), AbiValue::from(false), AbiValue::from(true)]),
        AbiValue::Array(vec![
            AbiValue::from(Address::repeat_byte(1)),
            AbiValue::from(Address::repeat_byte(2)),
            AbiValue::from(Address::repeat_byte(3)),
        ]),
        AbiValue::Array(vec![
            AbiValue::FixedBytes(vec![1; 32]),
            AbiValue::FixedBytes(vec![2; 32]),
            AbiValue::FixedBytes(vec![3; 32]),
        ]),
        AbiValue::Array(vec![AbiValue::from("a"), AbiValue::from(""), AbiValue::from("ccc")]),
        AbiValue::Array(vec![
            AbiValue::Bytes(vec![1]),
            AbiValue::Bytes(vec![]),
            AbiValue::Bytes(vec![3; 40]),
        ]),
    ];

    let calldata = abi.encode_call("setFixedValue", &args).expect("failed to encode setFixedValue");
    assert_eq!(&calldata[..4], &[0x63, 0xe5, 0x58, 0x4b]);

    let outputs = abi.decode_output("getFixedValue", &calldata[4..]).expect("failed to decode");
    assert_eq!(outputs.to_value(), AbiValue::Tuple(args));
}

#[test]
fn test_set_fixed_value_wrong_length() {
    let abi = fixture();
    let mut args = vec![empty_array(); 6];
    args[0] = AbiValue::Array(vec![AbiValue::from(1u64)]);

    assert!(matches!(
        abi.encode_call("setFixedValue", &args),
        Err(Error::ArityMismatch { expected: 3, actual: 1 })
    ));
}

#[test]
fn test_encode_call_json() {
    let abi = fixture();
    let calldata = abi
        .encode_call_json(
            "setDynamicValue",
            &[
                serde_json::json!([10, "9223372036854775807"]),
                serde_json::json!([]),
                serde_json::json!([]),
                serde_json::json!([]),
                serde_json::json!(["dave"]),
                serde_json::json!(["hex://0x01"]),
            ],
        )
        .expect("failed to encode setDynamicValue");

    let outputs = abi.decode_output("getDynamicValue", &calldata[4..]).expect("failed to decode");
    assert_eq!(
        outputs.to_json(BytesEncoding::Hex),
        serde_json::json!({
            "component0": ["10", "9223372036854775807"],
            "component1": [],
            "component2": [],
            "component3": [],
            "component4": ["dave"],
            "component5": ["hex://0x01"],
        })
    );
}

#[test]
fn test_decode_value_changed_log() {
    let abi = fixture();
    let event = abi.event("ValueChanged").expect("event exists")[0].clone();
    let setter = Address::repeat_byte(0x42);
    let data = decode_hex("0x000000000000000000000000000000000000000000000000000000000000002a")
        .expect("valid hex");

    let decoded = abi
        .decode_log(&[event.topic(), setter.into_word()], &data)
        .expect("failed to decode log");
    assert_eq!(decoded.signature, "ValueChanged(address,uint256)");
    assert_eq!(decoded.params.len(), 2);
    assert!(decoded.params[0].indexed);
    assert!(!decoded.params[1].indexed);
}

#[test]
fn test_truncated_calldata() {
    let abi = fixture();
    let calldata = abi
        .encode_call(
            "setValue",
            &[
                AbiValue::from(1u64),
                AbiValue::from(false),
                AbiValue::from(Address::ZERO),
                AbiValue::FixedBytes(vec![0; 32]),
                AbiValue::from("truncate me"),
                AbiValue::Bytes(vec![1, 2, 3]),
            ],
        )
        .expect("failed to encode setValue");

    for cut in [4, 36, 100, calldata.len() - 33] {
        assert!(
            matches!(abi.decode_call(&calldata[..cut]), Err(Error::TruncatedInput { .. })),
            "cut at {cut} should be truncated"
        );
    }

    // the last byte is padding; only the payload itself is required
    assert!(abi.decode_call(&calldata[..calldata.len() - 1]).is_ok());
}
