//! Configuration management for mimir
//!
//! This crate provides functionality for managing the mimir configuration,
//! including loading, saving, updating, and deleting configuration settings.

/// Error types for the configuration module
pub mod error;

use std::{path::PathBuf, str::FromStr};

use crate::error::Error;
use clap::Parser;
use mimir_abi::BytesEncoding;
use mimir_common::utils::{
    env::get_env,
    io::file::{delete_path, read_file, write_file},
};
use serde::{Deserialize, Serialize};
#[allow(deprecated)]
use std::env::home_dir;
use tracing::{debug, error, info};

/// Command line arguments for the configuration command
#[derive(Debug, Clone, Parser)]
#[clap(
    about = "Display and edit the current configuration",
    override_usage = "mimir config [OPTIONS]"
)]
pub struct ConfigArgs {
    /// The target key to update.
    #[clap(required = false, default_value = "")]
    key: String,

    /// The value to set the key to.
    #[clap(required = false, default_value = "")]
    value: String,
}

/// The [`Configuration`] struct represents the configuration of the CLI. The encode and decode
/// operations fall back to these values when the matching flag is omitted.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// How byte payloads are rendered in JSON output, either `hex` or `base64`
    pub bytes_encoding: String,

    /// The ABI file used when `--abi` and `--signature` are both omitted
    pub default_abi: String,

    /// Whether JSON output is pretty-printed
    pub pretty_json: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            bytes_encoding: BytesEncoding::Hex.to_string(),
            default_abi: "".to_string(),
            pretty_json: true,
        }
    }
}

/// Resolves `$HOME/.mimir/config.toml`. `MIMIR_HOME` replaces `$HOME/.mimir` when set.
#[allow(deprecated)]
fn config_path() -> Result<String, Error> {
    let mut path = match get_env("MIMIR_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let mut home = home_dir().ok_or_else(|| {
                Error::Generic(
                    "failed to get home directory. does your os support `std::env::home_dir()`?"
                        .to_string(),
                )
            })?;
            home.push(".mimir");
            home
        }
    };
    path.push("config.toml");

    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| Error::Generic("failed to convert path to string".to_string()))
}

impl Configuration {
    /// Returns the current configuration, writing the defaults to disk first if no
    /// configuration file exists.
    pub fn load() -> Result<Self, Error> {
        let path = config_path()?;

        // if the config file doesn't exist, create it
        if !std::path::Path::new(&path).exists() {
            debug!("no configuration found at '{}', writing defaults", path);
            Configuration::default().save()?;
        }

        let contents = read_file(&path)
            .map_err(|e| Error::Generic(format!("failed to read config file: {e}")))?;

        let config: Configuration = toml::from_str(&contents)
            .map_err(|e| Error::ParseError(format!("failed to parse config file: {e}")))?;
        config.validate()?;

        Ok(config)
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> Result<(), Error> {
        write_file(
            &config_path()?,
            &toml::to_string(&self)
                .map_err(|e| Error::ParseError(format!("failed to serialize config: {e}")))?,
        )
        .map_err(|e| Error::Generic(format!("failed to write config file: {e}")))?;

        Ok(())
    }

    /// Deletes the configuration file at `$HOME/.mimir/config.toml`.
    pub fn delete() -> Result<(), Error> {
        delete_path(&config_path()?);
        Ok(())
    }

    /// Update a single key/value pair in the configuration.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), Error> {
        // update the key in the struct and ensure it's the correct type
        match key {
            "bytes_encoding" => {
                let encoding = BytesEncoding::from_str(value).map_err(Error::Generic)?;
                self.bytes_encoding = encoding.to_string();
            }
            "default_abi" => {
                self.default_abi = value.to_string();
            }
            "pretty_json" => {
                self.pretty_json = value.parse::<bool>().map_err(|_| {
                    Error::Generic(format!(
                        "invalid value: 'pretty_json' must be 'true' or 'false', got '{value}'."
                    ))
                })?;
            }
            _ => {
                return Err(Error::Generic(format!(
                    "invalid key: \'{key}\' is not a valid configuration key."
                )))
            }
        }

        // write the updated config to disk
        self.save()?;

        Ok(())
    }

    /// The configured [`BytesEncoding`].
    pub fn bytes_encoding(&self) -> BytesEncoding {
        // validated on load and update
        BytesEncoding::from_str(&self.bytes_encoding).unwrap_or_default()
    }

    /// The configured default ABI path, if any.
    pub fn default_abi(&self) -> Option<&str> {
        Some(self.default_abi.as_str()).filter(|path| !path.is_empty())
    }

    fn validate(&self) -> Result<(), Error> {
        BytesEncoding::from_str(&self.bytes_encoding)
            .map(|_| ())
            .map_err(|e| Error::ParseError(format!("invalid bytes_encoding: {e}")))
    }
}

/// The `config` command is used to display and edit the current configuration.
pub fn config(args: ConfigArgs) -> Result<(), Error> {
    if !args.key.is_empty() {
        if !args.value.is_empty() {
            // read the config file and update the key/value pair
            let mut config = Configuration::load()?;
            config.update(&args.key, &args.value)?;
            info!("updated configuration! Set \'{}\' = \'{}\' .", &args.key, &args.value);
        } else {
            // key is set, but no value is set
            error!(
                "found key but no value to set. Please specify a value to set, \
                 use `mimir config --help` for more information."
            );
        }
    } else {
        // no key is set, print the config file
        println!("{:#?}", Configuration::load()?);
        info!("use `mimir config <KEY> <VALUE>` to set a key/value pair.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn use_temp_home() {
        std::env::set_var("MIMIR_HOME", std::env::temp_dir().join("mimir_config_test"));
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let config = Configuration::default();
        assert_eq!(config.bytes_encoding, "hex");
        assert_eq!(config.default_abi, "");
        assert!(config.pretty_json);
        assert_eq!(config.bytes_encoding(), BytesEncoding::Hex);
        assert_eq!(config.default_abi(), None);
    }

    #[test]
    #[serial]
    fn test_load_configuration() {
        use_temp_home();
        Configuration::delete().expect("failed to delete config file");
        let config = Configuration::load().expect("failed to load config file");

        assert_eq!(config, Configuration::default());
    }

    #[test]
    #[serial]
    fn test_save_configuration() {
        use_temp_home();
        Configuration::delete().expect("failed to delete config file");
        let mut config = Configuration::default();

        config.update("bytes_encoding", "BASE64").expect("failed to update bytes_encoding");
        config.update("default_abi", "./erc20.json").expect("failed to update default_abi");
        config.update("pretty_json", "false").expect("failed to update pretty_json");

        let loaded_config = Configuration::load().expect("failed to load config file");
        assert_eq!(loaded_config.bytes_encoding, "base64");
        assert_eq!(loaded_config.bytes_encoding(), BytesEncoding::Base64);
        assert_eq!(loaded_config.default_abi(), Some("./erc20.json"));
        assert!(!loaded_config.pretty_json);
    }

    #[test]
    #[serial]
    fn test_delete_configuration() {
        use_temp_home();
        Configuration::delete().expect("failed to delete config file");
        let mut config = Configuration::load().expect("failed to load config file");
        config.update("default_abi", "./abi.json").expect("failed to update default_abi");

        Configuration::delete().expect("failed to delete config file");
        let config = Configuration::load().expect("failed to load config file");

        assert_eq!(config, Configuration::default());
    }

    #[test]
    #[serial]
    fn test_update_rejects_invalid_input() {
        use_temp_home();
        let mut config = Configuration::default();

        assert!(matches!(config.update("rpc_url", "http://localhost"), Err(Error::Generic(_))));
        assert!(matches!(config.update("bytes_encoding", "utf8"), Err(Error::Generic(_))));
        assert!(matches!(config.update("pretty_json", "yes"), Err(Error::Generic(_))));
        assert_eq!(config, Configuration::default());
    }

    #[test]
    #[serial]
    fn test_load_rejects_invalid_file() {
        use_temp_home();
        let path = config_path().expect("failed to resolve config path");
        write_file(&path, "bytes_encoding = \"rot13\"\ndefault_abi = \"\"\npretty_json = true\n")
            .expect("failed to write config file");

        assert!(matches!(Configuration::load(), Err(Error::ParseError(_))));
        Configuration::delete().expect("failed to delete config file");
    }
}
