//! CLI entrypoint for the x-callback-url tool.
//!
//! The binary delegates to [`xcallback_cli::run`], which parses arguments,
//! loads configuration, installs telemetry and executes the subcommand.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    xcallback_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
