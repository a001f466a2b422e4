//! Configuration loading helpers for the `xcallback` CLI.
//!
//! Configuration flags lead the command line. They are split off here and
//! handed to the `ortho_config` loader, which layers them over the
//! environment and the optional TOML file. The remaining tokens are parsed as
//! the subcommand.

use std::ffi::{OsStr, OsString};

use ortho_config::OrthoConfig;
use xcallback_config::Config;

use crate::errors::AppError;

/// Flags recognised by the configuration loader.
///
/// Keep in sync with the fields of [`Config`].
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--source-app",
    "--scheme-query",
    "--return-launch",
    "--expected-scheme",
    "--source-app-policy",
    "--log-filter",
    "--log-format",
];

pub(crate) trait ConfigLoader {
    /// Loads configuration from the leading configuration arguments.
    ///
    /// `args` starts with the program name.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

/// Loader backed by the `ortho_config` derive on [`Config`].
pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        let config =
            Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Stop,
}

fn process_config_flag(argument: &OsStr) -> FlagAction {
    let argument_text = argument.to_string_lossy();
    let Some(flag_text) = argument_text.strip_prefix("--") else {
        return FlagAction::Stop;
    };
    let (flag, has_inline_value) = match flag_text.split_once('=') {
        Some((name, _)) => (name, true),
        None => (flag_text, false),
    };
    if CONFIG_CLI_FLAGS
        .iter()
        .any(|known| known.strip_prefix("--") == Some(flag))
    {
        FlagAction::Include {
            needs_value: !has_inline_value,
        }
    } else {
        FlagAction::Stop
    }
}

/// Command line split into the configuration prefix and the subcommand.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ConfigArgumentSplit {
    /// Program name followed by the configuration flags and their values.
    pub(crate) config_arguments: Vec<OsString>,
    /// Program name followed by the subcommand tokens.
    pub(crate) command_arguments: Vec<OsString>,
}

/// Splits the leading configuration flags from the rest of the command line.
///
/// Scanning stops at the first token that is not a configuration flag, so a
/// configuration flag placed after the subcommand is parsed by the
/// subcommand and rejected there.
pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let mut tokens = args.iter();
    let Some(program) = tokens.next() else {
        return ConfigArgumentSplit::default();
    };

    let mut config_arguments = vec![program.clone()];
    let mut remaining = tokens.as_slice();
    while let Some((argument, rest)) = remaining.split_first() {
        match process_config_flag(argument) {
            FlagAction::Include { needs_value } => {
                config_arguments.push(argument.clone());
                remaining = rest;
                if needs_value && let Some((value, after_value)) = rest.split_first() {
                    config_arguments.push(value.clone());
                    remaining = after_value;
                }
            }
            FlagAction::Stop => break,
        }
    }

    let mut command_arguments = vec![program.clone()];
    command_arguments.extend(remaining.iter().cloned());
    ConfigArgumentSplit {
        config_arguments,
        command_arguments,
    }
}
