//! CLI argument definitions for the `xcallback` tool.

use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

/// Command-line interface for sending and answering x-callback-url requests.
///
/// Configuration flags are handled by the configuration loader and never
/// reach this parser; they must precede the subcommand.
#[derive(Parser, Debug)]
#[command(
    name = "xcallback",
    version,
    about,
    disable_help_subcommand = true,
    after_help = CONFIG_HELP
)]
pub(crate) struct Cli {
    /// The operation to perform.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

const CONFIG_HELP: &str = "\
Configuration (before the subcommand, or as XCALLBACK_* environment variables):
  --config-path <FILE>           TOML configuration file
  --source-app <NAME>            Identity written into x-source
  --scheme-query <POLICY>        enabled | disabled
  --return-launch <POLICY>       fire_and_forget | query_scheme
  --expected-scheme <SCHEME>     Scheme inbound requests must target
  --source-app-policy <POLICY>   optional | required
  --log-filter <FILTER>          Tracing filter expression
  --log-format <FORMAT>          json | compact";

/// Subcommands of the `xcallback` tool.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Prints the URL encoding a request.
    Encode(RequestArgs),
    /// Prints a URL's request as JSON.
    Decode {
        /// The x-callback-url to decode.
        url: String,
    },
    /// Opens the URL encoding a request.
    Send(RequestArgs),
    /// Answers an inbound request by launching its return URL.
    Respond(RespondArgs),
}

/// Flags describing an outbound request.
#[derive(Args, Debug, Clone)]
pub(crate) struct RequestArgs {
    /// Scheme of the target application.
    #[arg(long)]
    pub(crate) scheme: String,
    /// Action the target application should perform.
    #[arg(long)]
    pub(crate) action: String,
    /// Action parameter; may be repeated.
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub(crate) parameters: Vec<Parameter>,
    /// Return URL to open on success.
    #[arg(long, value_name = "SCHEME:ACTION")]
    pub(crate) x_success: Option<ReturnTarget>,
    /// Return URL to open on failure.
    #[arg(long, value_name = "SCHEME:ACTION")]
    pub(crate) x_error: Option<ReturnTarget>,
    /// Return URL to open on cancellation.
    #[arg(long, value_name = "SCHEME:ACTION")]
    pub(crate) x_cancel: Option<ReturnTarget>,
}

/// Flags for answering an inbound request.
#[derive(Args, Debug, Clone)]
pub(crate) struct RespondArgs {
    /// The inbound x-callback-url.
    pub(crate) url: String,
    /// The outcome reported to the caller.
    #[command(flatten)]
    pub(crate) outcome: OutcomeArgs,
    /// Prints the return URL instead of launching it.
    #[arg(long)]
    pub(crate) dry_run: bool,
}

/// Exactly one outcome for `respond`.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub(crate) struct OutcomeArgs {
    /// Reports success, optionally with result parameters.
    #[arg(long, value_name = "KEY=VALUE", num_args = 0..)]
    pub(crate) success: Option<Vec<Parameter>>,
    /// Reports failure with a numeric code and a message.
    #[arg(long, num_args = 2, value_names = ["CODE", "MESSAGE"])]
    pub(crate) error: Option<Vec<String>>,
    /// Reports cancellation.
    #[arg(long)]
    pub(crate) cancel: bool,
}

/// A `KEY=VALUE` pair given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Parameter {
    pub(crate) key: String,
    pub(crate) value: String,
}

/// A `SCHEME:ACTION` return target given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReturnTarget {
    pub(crate) scheme: String,
    pub(crate) action: String,
}

/// Errors raised while parsing structured flag values.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ArgumentError {
    #[error("expected KEY=VALUE, got '{0}'")]
    Parameter(String),
    #[error("expected SCHEME:ACTION, got '{0}'")]
    ReturnTarget(String),
}

impl FromStr for Parameter {
    type Err = ArgumentError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok(Self {
                key: key.to_owned(),
                value: value.to_owned(),
            }),
            _ => Err(ArgumentError::Parameter(input.to_owned())),
        }
    }
}

impl FromStr for ReturnTarget {
    type Err = ArgumentError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.split_once(':') {
            Some((scheme, action)) if !scheme.is_empty() && !action.is_empty() => Ok(Self {
                scheme: scheme.to_owned(),
                action: action.to_owned(),
            }),
            _ => Err(ArgumentError::ReturnTarget(input.to_owned())),
        }
    }
}
