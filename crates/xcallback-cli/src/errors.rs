//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use thiserror::Error;
use xcallback_config::ConfigError;
use xcallback_core::{FailureReason, LaunchError, ReturnKind, XCallbackError, XCallbackUrl};

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("{0} (code {code})", code = FailureReason::code(.0))]
    Protocol(#[from] XCallbackError),
    #[error("invalid error code '{0}': expected an integer")]
    InvalidErrorCode(String),
    #[error("the request carries no {} return url", .0.key())]
    NoReturnRequested(ReturnKind),
    #[error("no installed application handles the return url {0}")]
    ReturnUnreachable(XCallbackUrl),
    #[error("failed to launch the return url: {0}")]
    ReturnLaunch(LaunchError),
    #[error("failed to serialise request: {0}")]
    SerialiseRequest(serde_json::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}
