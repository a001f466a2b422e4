//! Command-line runtime for the `xcallback` tool.
//!
//! The runtime splits the leading configuration flags from the subcommand,
//! loads configuration from the TOML file, `XCALLBACK_*` environment
//! variables and those flags, installs telemetry and then runs one
//! subcommand:
//!
//! - `encode` prints the URL for a request built from flags.
//! - `decode` prints a URL's request as JSON.
//! - `send` opens the URL through the platform launcher.
//! - `respond` answers an inbound request by launching its return URL.
//!
//! IO streams are injected so the runtime can be driven from tests.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;
use std::sync::{Arc, Mutex, PoisonError};

use clap::Parser;
use clap::error::ErrorKind;
use xcallback_config::Config;
use xcallback_core::{
    Completion, Launcher, ReturnOutcome, XCallbackEngine, XCallbackRequest, XCallbackResponse,
    codec,
};

mod cli;
mod config;
mod errors;
mod launcher;
mod telemetry;

use cli::{Cli, CliCommand, OutcomeArgs, Parameter, RequestArgs, RespondArgs};
use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
use errors::AppError;
use launcher::{DryRunLauncher, SystemLauncher};

/// Runs the CLI using the provided arguments and IO handles.
///
/// Errors are written to `stderr` and reported through the exit code.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdout, stderr, &OrthoConfigLoader)
}

fn run_with_loader<I, W, E, L>(args: I, stdout: &mut W, stderr: &mut E, loader: &L) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let arguments: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&arguments);

    let cli = match Cli::try_parse_from(split.command_arguments) {
        Ok(cli) => cli,
        Err(error)
            if matches!(
                error.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            return match write!(stdout, "{}", error.render()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            };
        }
        Err(error) => return report(stderr, &AppError::CliUsage(error)),
    };

    let outcome = loader
        .load(&split.config_arguments)
        .and_then(|config| execute(config, cli, stdout));
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report(stderr, &error),
    }
}

fn report<E: Write>(stderr: &mut E, error: &AppError) -> ExitCode {
    writeln!(stderr, "xcallback: {error}").ok();
    ExitCode::FAILURE
}

fn execute<W: Write>(config: Config, cli: Cli, stdout: &mut W) -> Result<(), AppError> {
    telemetry::initialise(&config)?;

    match cli.command {
        CliCommand::Encode(args) => {
            let engine = XCallbackEngine::new(config, DryRunLauncher);
            let url = codec::encode(&build_request(&engine, &args))?;
            writeln!(stdout, "{url}")?;
        }
        CliCommand::Decode { url } => {
            let request = codec::decode_str(&url)?;
            serde_json::to_writer_pretty(&mut *stdout, &request)
                .map_err(AppError::SerialiseRequest)?;
            writeln!(stdout)?;
        }
        CliCommand::Send(args) => {
            let engine = XCallbackEngine::new(config, SystemLauncher::detect());
            let url = engine.send(&build_request(&engine, &args))?;
            writeln!(stdout, "{url}")?;
        }
        CliCommand::Respond(args) => respond(config, &args, stdout)?,
    }
    Ok(())
}

fn build_request(engine: &XCallbackEngine, args: &RequestArgs) -> XCallbackRequest {
    let mut request = engine.request(&args.scheme, &args.action);
    request.extend_parameters(
        args.parameters
            .iter()
            .map(|Parameter { key, value }| (key.clone(), value.clone())),
    );
    if let Some(target) = &args.x_success {
        request.add_x_success_action(&target.scheme, &target.action);
    }
    if let Some(target) = &args.x_error {
        request.add_x_error_action(&target.scheme, &target.action);
    }
    if let Some(target) = &args.x_cancel {
        request.add_x_cancel_action(&target.scheme, &target.action);
    }
    request
}

/// Dispatches the inbound request to a handler that reports the requested
/// outcome, then surfaces what happened to the return launch.
fn respond<W: Write>(config: Config, args: &RespondArgs, stdout: &mut W) -> Result<(), AppError> {
    let response = response_from(&args.outcome)?;
    let kind = response.kind();
    let inbound = codec::decode_str(&args.url)?;

    let launcher: Arc<dyn Launcher> = if args.dry_run {
        Arc::new(DryRunLauncher)
    } else {
        Arc::new(SystemLauncher::detect())
    };
    let mut engine = XCallbackEngine::with_shared_launcher(config, launcher);

    let slot: Arc<Mutex<Option<ReturnOutcome>>> = Arc::new(Mutex::new(None));
    let handler_slot = Arc::clone(&slot);
    engine.register_action_handler(
        inbound.action(),
        move |_: XCallbackRequest, completion: Completion| {
            let outcome = completion.complete(response.clone());
            *handler_slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(outcome);
        },
    );
    engine.handle(&inbound)?;

    let recorded = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
    match recorded {
        Some(ReturnOutcome::Launched(url)) => {
            writeln!(stdout, "{url}")?;
            Ok(())
        }
        Some(ReturnOutcome::NoReturnRequested) | None => Err(AppError::NoReturnRequested(kind)),
        Some(ReturnOutcome::Unreachable(url)) => Err(AppError::ReturnUnreachable(url)),
        Some(ReturnOutcome::LaunchFailed { error, .. }) => Err(AppError::ReturnLaunch(error)),
    }
}

fn response_from(outcome: &OutcomeArgs) -> Result<XCallbackResponse, AppError> {
    if let Some(parameters) = &outcome.success {
        return Ok(XCallbackResponse::success(
            parameters
                .iter()
                .map(|Parameter { key, value }| (key.clone(), value.clone())),
        ));
    }
    if let Some(values) = &outcome.error {
        let [code_text, message] = values.as_slice() else {
            return Err(AppError::InvalidErrorCode(values.join(" ")));
        };
        let code = code_text
            .parse::<i32>()
            .map_err(|_| AppError::InvalidErrorCode(code_text.clone()))?;
        return Ok(XCallbackResponse::error(code, message.clone()));
    }
    Ok(XCallbackResponse::cancel())
}
