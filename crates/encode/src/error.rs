/// Errors that can occur while encoding call data
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The ABI codec rejected the input
    #[error("ABI error: {0}")]
    Abi(#[from] mimir_abi::Error),
    /// The command line arguments are inconsistent
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    /// A boundary failure, such as an unreadable file or malformed hex
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
