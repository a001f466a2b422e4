//! Launchers backed by the operating system's URL opener.
//!
//! URLs are opened with `open` on macOS and `xdg-open` elsewhere; the
//! `XCALLBACK_OPENER` environment variable overrides the program. Scheme
//! reachability is answered by `xdg-mime` on Linux and assumed everywhere
//! else.

use std::env;
use std::ffi::OsString;
use std::process::{Command, Stdio};
use std::sync::Arc;

use tracing::debug;
use xcallback_core::{LaunchError, Launcher, XCallbackUrl};

const LAUNCHER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::launcher");

#[cfg(target_os = "macos")]
const DEFAULT_OPENER: &str = "open";
#[cfg(not(target_os = "macos"))]
const DEFAULT_OPENER: &str = "xdg-open";

/// How a [`SystemLauncher`] decides whether a scheme has a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SchemeProbe {
    /// Every scheme is reported reachable.
    AssumeReachable,
    /// Asks `program query default x-scheme-handler/<scheme>`; a non-empty
    /// answer means some application handles the scheme.
    XdgMime(OsString),
}

/// Opens URLs by running the platform opener.
#[derive(Debug, Clone)]
pub(crate) struct SystemLauncher {
    opener: OsString,
    probe: SchemeProbe,
}

impl SystemLauncher {
    /// The launcher for the current platform.
    pub(crate) fn detect() -> Self {
        let opener =
            env::var_os("XCALLBACK_OPENER").unwrap_or_else(|| OsString::from(DEFAULT_OPENER));
        let probe = if cfg!(target_os = "linux") {
            SchemeProbe::XdgMime(OsString::from("xdg-mime"))
        } else {
            SchemeProbe::AssumeReachable
        };
        Self::new(opener, probe)
    }

    pub(crate) fn new(opener: impl Into<OsString>, probe: SchemeProbe) -> Self {
        Self {
            opener: opener.into(),
            probe,
        }
    }

    fn opener_name(&self) -> String {
        self.opener.to_string_lossy().into_owned()
    }
}

impl Launcher for SystemLauncher {
    fn can_open(&self, url: &XCallbackUrl) -> bool {
        let SchemeProbe::XdgMime(program) = &self.probe else {
            return true;
        };
        let mime_type = format!("x-scheme-handler/{}", url.scheme().to_ascii_lowercase());
        match Command::new(program)
            .args(["query", "default", mime_type.as_str()])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
        {
            Ok(output) => {
                let reachable = output.status.success()
                    && !String::from_utf8_lossy(&output.stdout).trim().is_empty();
                debug!(
                    target: LAUNCHER_TARGET,
                    mime_type = mime_type.as_str(),
                    reachable,
                    "queried scheme handler"
                );
                reachable
            }
            Err(error) => {
                debug!(
                    target: LAUNCHER_TARGET,
                    mime_type = mime_type.as_str(),
                    %error,
                    "scheme handler query failed"
                );
                false
            }
        }
    }

    fn open(&self, url: &XCallbackUrl) -> Result<(), LaunchError> {
        debug!(
            target: LAUNCHER_TARGET,
            opener = %self.opener_name(),
            url = url.as_str(),
            "opening url"
        );
        let status = Command::new(&self.opener)
            .arg(url.as_str())
            .stdin(Stdio::null())
            .status()
            .map_err(|source| LaunchError::Spawn {
                program: self.opener_name(),
                url: url.to_string(),
                source: Arc::new(source),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(LaunchError::NonZeroExit {
                program: self.opener_name(),
                url: url.to_string(),
                status: status.code().unwrap_or(-1),
            })
        }
    }
}

/// Reports every scheme reachable and opens nothing, for `--dry-run`.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DryRunLauncher;

impl Launcher for DryRunLauncher {
    fn can_open(&self, _url: &XCallbackUrl) -> bool {
        true
    }

    fn open(&self, url: &XCallbackUrl) -> Result<(), LaunchError> {
        debug!(target: LAUNCHER_TARGET, url = url.as_str(), "dry run; not opening url");
        Ok(())
    }
}
