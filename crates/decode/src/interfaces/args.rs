use clap::Parser;
use derive_builder::Builder;
use eyre::Result;
use mimir_abi::BytesEncoding;
use mimir_common::utils::strings::decode_hex;

#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Decodes call data, return data, event logs and revert payloads into readable types",
    override_usage = "mimir decode <TARGET> [OPTIONS]"
)]
/// Arguments for the decode operation
///
/// This struct contains all the configuration parameters needed to decode a hex payload
/// against an ABI file or an inline signature.
pub struct DecodeArgs {
    /// The hex payload to decode: call data, return data, deployment bytecode, a log's data
    /// field or a revert payload.
    #[clap(required = true)]
    pub target: String,

    /// Path to the ABI file describing the payload.
    #[clap(long, short, default_value = None, hide_default_value = true)]
    pub abi: Option<String>,

    /// An inline function or event signature to decode with instead of an ABI file. Event
    /// parameters may be marked `indexed`.
    #[clap(long, short, default_value = None, hide_default_value = true, conflicts_with = "abi")]
    pub signature: Option<String>,

    /// Decode the target as the return data of this function.
    #[clap(long = "output-of", default_value = None, hide_default_value = true)]
    pub output_of: Option<String>,

    /// Decode the target as a bare parameter tuple, without a selector. With `--signature`,
    /// this decodes return data against the signature's parameter list.
    #[clap(long)]
    pub raw: bool,

    /// Decode the target as deployment bytecode followed by constructor arguments.
    #[clap(long, short)]
    pub constructor: bool,

    /// The deployment bytecode the constructor arguments were appended to. When omitted, the
    /// boundary is detected from the standard creation code layout.
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub bytecode: String,

    /// Decode the target as the data field of an event log with these topics.
    #[clap(long, short, num_args = 1.., value_delimiter = ',')]
    pub topics: Vec<String>,

    /// Decode the log as this event, the only way to decode anonymous events.
    #[clap(long, short, default_value = None, hide_default_value = true)]
    pub event: Option<String>,

    /// Decode the target as a revert payload, `Error(string)` or `Panic(uint256)`.
    #[clap(long, short)]
    pub revert: bool,

    /// How byte payloads are rendered, `hex` or `base64`.
    #[clap(long = "bytes-encoding", default_value = None, hide_default_value = true)]
    pub bytes_encoding: Option<BytesEncoding>,

    /// Print the result as JSON.
    #[clap(long, short)]
    pub json: bool,
}

impl DecodeArgs {
    /// Retrieves the payload bytes from the hex target.
    pub fn get_target(&self) -> Result<Vec<u8>> {
        decode_hex(self.target.trim())
    }
}

impl DecodeArgsBuilder {
    /// Creates a new DecodeArgsBuilder with default values
    pub fn new() -> Self {
        Self {
            target: Some(String::new()),
            abi: Some(None),
            signature: Some(None),
            output_of: Some(None),
            raw: Some(false),
            constructor: Some(false),
            bytecode: Some(String::new()),
            topics: Some(Vec::new()),
            event: Some(None),
            revert: Some(false),
            bytes_encoding: Some(None),
            json: Some(false),
        }
    }
}
