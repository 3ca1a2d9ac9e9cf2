//! clap [Args](clap::Args) for logging configuration.
// Mostly taken from [reth](https://github.com/paradigmxyz/reth)

use clap::{ArgAction, Args, ValueEnum};
use eyre::eyre;
use std::{
    fmt::{self, Display},
    io::IsTerminal,
    str::FromStr,
};
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{filter::Directive, EnvFilter};

/// The log configuration.
#[derive(Debug, Args)]
#[clap(next_help_heading = "LOGGING")]
pub(crate) struct LogArgs {
    /// The format of log lines written to stderr.
    #[clap(
        long = "log.format",
        value_name = "FORMAT",
        global = true,
        default_value_t = LogFormat::Terminal
    )]
    pub(crate) log_format: LogFormat,

    /// Extra filter directives for log lines, i.e. `mimir_abi=trace`.
    #[clap(long = "log.filter", value_name = "FILTER", global = true, default_value = "")]
    pub(crate) log_filter: String,

    /// Sets whether or not the formatter emits ANSI terminal escape codes for colors and other
    /// text formatting.
    #[clap(
        long,
        value_name = "COLOR",
        global = true,
        default_value_t = ColorMode::Auto
    )]
    pub(crate) color: ColorMode,

    /// The verbosity settings for the tracer.
    #[clap(flatten)]
    pub(crate) verbosity: Verbosity,
}

impl LogArgs {
    /// Builds the [EnvFilter] from the verbosity level and any extra directives.
    pub(crate) fn filter(&self) -> eyre::Result<EnvFilter> {
        EnvFilter::builder()
            .with_default_directive(self.verbosity.directive())
            .parse(&self.log_filter)
            .map_err(|e| eyre!("invalid log filter '{}': {}", self.log_filter, e))
    }

    /// Initializes tracing with the configured options from cli args.
    pub(crate) fn init_tracing(&self) -> eyre::Result<()> {
        let use_color = match self.color {
            ColorMode::Always => true,
            ColorMode::Auto => std::io::stderr().is_terminal(),
            ColorMode::Never => false,
        };
        colored::control::set_override(use_color);

        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.filter()?)
            .with_writer(std::io::stderr)
            .with_ansi(use_color)
            .with_target(false);

        match self.log_format {
            LogFormat::Terminal => builder.try_init(),
            LogFormat::Json => builder.json().try_init(),
        }
        .map_err(|e| eyre!("failed to initialize tracing: {}", e))
    }
}

/// The format of emitted log lines.
#[derive(Debug, Copy, Clone, ValueEnum, Eq, PartialEq)]
pub(crate) enum LogFormat {
    /// Human readable lines
    Terminal,
    /// One JSON object per line
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Terminal => write!(f, "terminal"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// The color mode for the cli.
#[derive(Debug, Copy, Clone, ValueEnum, Eq, PartialEq)]
pub(crate) enum ColorMode {
    /// Colors on
    Always,
    /// Colors on when stderr is a terminal
    Auto,
    /// Colors off
    Never,
}

impl Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Always => write!(f, "always"),
            ColorMode::Auto => write!(f, "auto"),
            ColorMode::Never => write!(f, "never"),
        }
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(ColorMode::Always),
            "auto" => Ok(ColorMode::Auto),
            "never" => Ok(ColorMode::Never),
            _ => Err(format!("Invalid color mode: {}", s)),
        }
    }
}

/// The verbosity settings for the cli.
#[derive(Debug, Copy, Clone, Args)]
#[clap(next_help_heading = "DISPLAY")]
pub(crate) struct Verbosity {
    /// Set the minimum log level.
    ///
    /// -v     Warnings & Errors
    /// -vv    Info
    /// -vvv   Debug
    /// -vvvv  Traces (warning: very verbose!)
    #[clap(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        default_value_t = 1,
        verbatim_doc_comment,
        help_heading = "DISPLAY"
    )]
    verbosity: u8,

    /// Silence all log output.
    #[clap(long, alias = "silent", short = 'q', global = true, help_heading = "DISPLAY")]
    quiet: bool,
}

impl Verbosity {
    /// Get the corresponding [Directive] for the given verbosity, or none if the verbosity
    /// corresponds to silent.
    pub(crate) fn directive(&self) -> Directive {
        if self.quiet {
            LevelFilter::OFF.into()
        } else {
            let level = match self.verbosity.saturating_sub(1) {
                0 => Level::WARN,
                1 => Level::INFO,
                2 => Level::DEBUG,
                _ => Level::TRACE,
            };

            level.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_directive() {
        let quiet = Verbosity { verbosity: 4, quiet: true };
        assert!(quiet.directive().to_string().eq_ignore_ascii_case("off"));

        let info = Verbosity { verbosity: 2, quiet: false };
        assert!(info.directive().to_string().eq_ignore_ascii_case("info"));

        let trace = Verbosity { verbosity: 9, quiet: false };
        assert!(trace.directive().to_string().eq_ignore_ascii_case("trace"));
    }

    #[test]
    fn test_color_mode_from_str() {
        assert_eq!("never".parse::<ColorMode>(), Ok(ColorMode::Never));
        assert!("sometimes".parse::<ColorMode>().is_err());
    }

    #[test]
    fn test_log_filter() {
        let args = LogArgs {
            log_format: LogFormat::Terminal,
            log_filter: "mimir_abi=trace".to_string(),
            color: ColorMode::Never,
            verbosity: Verbosity { verbosity: 1, quiet: false },
        };
        assert!(args.filter().is_ok());

        let args = LogArgs { log_filter: "mimir_abi=loud".to_string(), ..args };
        assert!(args.filter().is_err());
    }
}
