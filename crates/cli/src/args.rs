use clap::{Args, Parser, Subcommand};

use mimir_config::ConfigArgs;
use mimir_decoder::DecodeArgs;
use mimir_encoder::EncodeArgs;

use crate::log_args::LogArgs;

#[derive(Debug, Parser)]
#[clap(name = "mimir", version)]
pub(crate) struct Arguments {
    #[clap(subcommand)]
    pub(crate) sub: Subcommands,

    #[clap(flatten)]
    pub(crate) logs: LogArgs,
}

#[derive(Debug, Subcommand)]
#[clap(
    about = "Mimir encodes and decodes Ethereum contract ABI payloads: call data, return data, \
             constructor arguments, event logs and reverts."
)]
#[allow(clippy::large_enum_variant)]
pub(crate) enum Subcommands {
    #[clap(name = "encode", about = "Encode arguments into call data or constructor arguments")]
    Encode(EncodeArgs),

    #[clap(name = "decode", about = "Decode call data, return data, event logs and reverts")]
    Decode(DecodeArgs),

    #[clap(name = "selectors", about = "List the function selectors and event topics of an ABI")]
    Selectors(SelectorsArgs),

    #[clap(name = "signature", about = "Compute the method ID and event topic of a signature")]
    Signature(SignatureArgs),

    #[clap(name = "config", about = "Display and edit the current configuration")]
    Config(ConfigArgs),
}

/// Arguments for the `selectors` command.
#[derive(Debug, Clone, Args)]
pub(crate) struct SelectorsArgs {
    /// Path to the ABI file. Falls back to the configured `default_abi`.
    #[clap(required = false, default_value = "", hide_default_value = true)]
    pub(crate) abi: String,

    /// Print the listing as JSON.
    #[clap(long, short)]
    pub(crate) json: bool,
}

/// Arguments for the `signature` command.
#[derive(Debug, Clone, Args)]
pub(crate) struct SignatureArgs {
    /// The signature text, i.e. `transfer(address,uint256)` or
    /// `Transfer(address indexed,address indexed,uint256)`.
    #[clap(required = true)]
    pub(crate) signature: String,

    /// Print the result as JSON.
    #[clap(long, short)]
    pub(crate) json: bool,
}
