//! The `mimir` command line interface.

pub(crate) mod args;
pub(crate) mod error;
pub(crate) mod log_args;
pub(crate) mod output;

use args::{Arguments, Subcommands};
use clap::Parser;
use error::Error;
use output::{render_selectors, selectors_json, signature_json, to_json_string};
use tracing::debug;

use mimir_abi::ContractAbi;
use mimir_common::utils::io::file::read_file;
use mimir_config::{config, Configuration};
use mimir_decoder::decode;
use mimir_encoder::encode;

fn main() -> Result<(), Error> {
    let args = Arguments::parse();

    // setup logging
    let _ = args.logs.init_tracing();

    let configuration = Configuration::load()
        .map_err(|e| Error::Generic(format!("failed to load configuration: {}", e)))?;
    match args.sub {
        Subcommands::Encode(mut cmd) => {
            // a bare function name needs an ABI, so fall back to the configured one
            if cmd.abi.is_none() && !cmd.function.contains('(') {
                cmd.abi = configuration.default_abi().map(str::to_string);
                debug!("using default abi {:?}", cmd.abi);
            }

            let result =
                encode(cmd).map_err(|e| Error::Generic(format!("failed to encode: {}", e)))?;
            result.display();
        }

        Subcommands::Decode(mut cmd) => {
            // if the user has not described the payload, use the default abi
            if cmd.abi.is_none() && cmd.signature.is_none() && !cmd.revert {
                cmd.abi = configuration.default_abi().map(str::to_string);
                debug!("using default abi {:?}", cmd.abi);
            }

            // if the user has not specified a bytes encoding, use the default
            if cmd.bytes_encoding.is_none() {
                cmd.bytes_encoding = Some(configuration.bytes_encoding());
            }

            let json = cmd.json;
            let result =
                decode(cmd).map_err(|e| Error::Generic(format!("failed to decode: {}", e)))?;

            if json {
                println!("{}", to_json_string(&result.to_json_value(), configuration.pretty_json)?);
            } else {
                result.display();
            }
        }

        Subcommands::Selectors(cmd) => {
            let path = match (cmd.abi.as_str(), configuration.default_abi()) {
                ("", Some(default)) => default.to_string(),
                ("", None) => {
                    return Err(Error::Generic(
                        "no abi given and no `default_abi` configured".to_string(),
                    ))
                }
                (path, _) => path.to_string(),
            };

            let contents = read_file(&path)
                .map_err(|e| Error::Generic(format!("failed to read abi: {}", e)))?;
            let abi = ContractAbi::from_json_str(&contents)
                .map_err(|e| Error::Generic(format!("failed to parse abi: {}", e)))?;

            if cmd.json {
                println!("{}", to_json_string(&selectors_json(&abi), configuration.pretty_json)?);
            } else {
                println!("{}", render_selectors(&abi));
            }
        }

        Subcommands::Signature(cmd) => {
            let value = signature_json(&cmd.signature)?;

            if cmd.json {
                println!("{}", to_json_string(&value, configuration.pretty_json)?);
            } else {
                for key in ["signature", "selector", "topic"] {
                    println!("{key:<10} {}", value[key].as_str().unwrap_or_default());
                }
            }
        }

        Subcommands::Config(cmd) => {
            config(cmd).map_err(|e| Error::Generic(format!("failed to configure: {}", e)))?;
        }
    }

    Ok(())
}
