/// Errors that can occur while decoding
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The ABI codec rejected the input
    #[error("ABI error: {0}")]
    Abi(#[from] mimir_abi::Error),
    /// The command line arguments are inconsistent
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    /// The deployment bytecode could not be split from its constructor arguments
    #[error("Constructor error: {0}")]
    Constructor(String),
    /// The payload is neither `Error(string)` nor `Panic(uint256)`
    #[error("Unrecognized revert payload: {0}")]
    UnknownRevert(String),
    /// A boundary failure, such as an unreadable file or malformed hex
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
    /// JSON serialization failed
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
