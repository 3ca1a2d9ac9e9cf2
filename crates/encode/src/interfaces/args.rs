use clap::Parser;
use derive_builder::Builder;

#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Encodes human-readable arguments into contract call data",
    override_usage = "mimir encode <FUNCTION> [ARGS]... [OPTIONS]"
)]
/// Arguments for the encode operation
///
/// `function` is either a function name declared in the ABI file, or a full signature such as
/// `transfer(address,uint256)` when no ABI file is given.
pub struct EncodeArgs {
    /// The function to encode, either a name declared in `--abi` or a full signature.
    #[clap(required = true)]
    pub function: String,

    /// The arguments, in declaration order. Values starting with `[` or `{`, and `true` /
    /// `false`, are read as JSON. Everything else is passed through as text.
    #[clap(required = false, num_args = 0.., allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Path to the ABI file declaring the function.
    #[clap(long, short, default_value = None, hide_default_value = true)]
    pub abi: Option<String>,

    /// Encode constructor arguments instead of call data.
    #[clap(long, short)]
    pub constructor: bool,

    /// Deployment bytecode to prepend to encoded constructor arguments.
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub bytecode: String,
}

impl EncodeArgsBuilder {
    /// Creates a new EncodeArgsBuilder with default values
    pub fn new() -> Self {
        Self {
            function: Some(String::new()),
            args: Some(Vec::new()),
            abi: Some(None),
            constructor: Some(false),
            bytecode: Some(String::new()),
        }
    }
}
