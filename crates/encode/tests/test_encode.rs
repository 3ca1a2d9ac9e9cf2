use mimir_common::utils::io::file::write_file;
use mimir_encoder::{encode, error::Error, EncodeArgsBuilder};

const TOKEN_ABI: &str = r#"[
    {
        "type":"constructor",
        "inputs":[{"name":"supply","type":"uint256"}],
        "stateMutability":"nonpayable"
    },
    {
        "type":"function",
        "name":"transfer",
        "inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],
        "outputs":[{"name":"","type":"bool"}],
        "stateMutability":"nonpayable"
    },
    {
        "type":"function",
        "name":"set",
        "inputs":[{"name":"value","type":"uint256"}],
        "outputs":[],
        "stateMutability":"nonpayable"
    },
    {
        "type":"function",
        "name":"set",
        "inputs":[{"name":"value","type":"string"}],
        "outputs":[],
        "stateMutability":"nonpayable"
    }
]"#;

fn abi_file(name: &str) -> String {
    let path = std::env::temp_dir().join(name).to_string_lossy().to_string();
    write_file(&path, TOKEN_ABI).expect("failed to write abi file");
    path
}

#[test]
fn test_encode_with_abi_file() {
    let args = EncodeArgsBuilder::new()
        .function("transfer".to_string())
        .args(vec!["0x6666666b0B46056247E7D6cbdb78287F4D12574d".to_string(), "0".to_string()])
        .abi(Some(abi_file("mimir_encode_transfer.json")))
        .build()
        .expect("failed to build args");

    let result = encode(args).expect("failed to encode");
    assert_eq!(result.signature, "transfer(address,uint256)");
    assert_eq!(
        result.to_hex(),
        concat!(
            "0xa9059cbb",
            "0000000000000000000000006666666b0b46056247e7d6cbdb78287f4d12574d",
            "0000000000000000000000000000000000000000000000000000000000000000",
        )
    );
}

#[test]
fn test_encode_overloads() {
    let path = abi_file("mimir_encode_overloads.json");

    // by name, the first overload that accepts the argument wins
    let args = EncodeArgsBuilder::new()
        .function("set".to_string())
        .args(vec!["not a number".to_string()])
        .abi(Some(path.clone()))
        .build()
        .expect("failed to build args");
    assert_eq!(encode(args).expect("failed to encode").signature, "set(string)");

    // by signature, the overload is picked exactly
    let args = EncodeArgsBuilder::new()
        .function("set(string)".to_string())
        .args(vec!["42".to_string()])
        .abi(Some(path))
        .build()
        .expect("failed to build args");
    let result = encode(args).expect("failed to encode");
    assert_eq!(result.signature, "set(string)");
    assert_eq!(result.encoded.len(), 4 + 32 * 3);
}

#[test]
fn test_encode_constructor_with_abi_file() {
    let args = EncodeArgsBuilder::new()
        .function("constructor".to_string())
        .args(vec!["1000".to_string()])
        .abi(Some(abi_file("mimir_encode_constructor.json")))
        .constructor(true)
        .build()
        .expect("failed to build args");

    let result = encode(args).expect("failed to encode");
    assert_eq!(result.signature, "constructor(uint256)");
    assert_eq!(
        result.to_hex(),
        "0x00000000000000000000000000000000000000000000000000000000000003e8"
    );
}

#[test]
fn test_encode_unknown_function() {
    let args = EncodeArgsBuilder::new()
        .function("mint".to_string())
        .abi(Some(abi_file("mimir_encode_unknown.json")))
        .build()
        .expect("failed to build args");

    assert!(matches!(
        encode(args),
        Err(Error::Abi(mimir_abi::Error::UnknownFunction(name))) if name == "mint"
    ));
}

#[test]
fn test_encode_missing_abi_file() {
    let args = EncodeArgsBuilder::new()
        .function("transfer".to_string())
        .abi(Some("/nonexistent/mimir/abi.json".to_string()))
        .build()
        .expect("failed to build args");

    assert!(matches!(encode(args), Err(Error::Eyre(_))));
}
