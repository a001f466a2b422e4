//! The capability that actually opens URLs.
//!
//! Opening a URL and asking whether any installed application handles a
//! scheme are platform concerns. The engine only depends on the
//! [`Launcher`] trait; binaries supply an implementation backed by the
//! operating system and tests supply doubles.

use std::io;
use std::sync::Arc;

use thiserror::Error;

use crate::codec::XCallbackUrl;
use crate::error::FailureReason;

#[cfg(any(test, feature = "test-support"))]
mod recording;

#[cfg(any(test, feature = "test-support"))]
pub use self::recording::RecordingLauncher;

/// Opens URLs on behalf of the engine.
///
/// Implementations must be shareable across threads: action handlers may
/// complete from any thread, and the composed return URL is launched from
/// there.
pub trait Launcher: Send + Sync {
    /// Reports whether some installed application can open `url`.
    fn can_open(&self, url: &XCallbackUrl) -> bool;

    /// Opens `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`LaunchError`] when the platform refuses or fails to open
    /// the URL.
    fn open(&self, url: &XCallbackUrl) -> Result<(), LaunchError>;
}

impl<L: Launcher + ?Sized> Launcher for Arc<L> {
    fn can_open(&self, url: &XCallbackUrl) -> bool {
        (**self).can_open(url)
    }

    fn open(&self, url: &XCallbackUrl) -> Result<(), LaunchError> {
        (**self).open(url)
    }
}

/// Errors raised while opening a URL.
#[derive(Debug, Clone, Error)]
pub enum LaunchError {
    /// The platform declined to open the URL.
    #[error("launcher refused to open '{url}': {message}")]
    Rejected {
        /// URL that was refused.
        url: String,
        /// Platform explanation.
        message: String,
    },
    /// The helper program could not be started.
    #[error("failed to start '{program}' to open '{url}': {source}")]
    Spawn {
        /// Helper program name.
        program: String,
        /// URL being opened.
        url: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
    /// The helper program reported failure.
    #[error("'{program}' exited with status {status} while opening '{url}'")]
    NonZeroExit {
        /// Helper program name.
        program: String,
        /// URL being opened.
        url: String,
        /// Process exit status.
        status: i32,
    },
}

impl FailureReason for LaunchError {
    /// The helper's exit status when there is one, otherwise `-1`.
    fn code(&self) -> i32 {
        match self {
            Self::NonZeroExit { status, .. } => *status,
            Self::Rejected { .. } | Self::Spawn { .. } => -1,
        }
    }

    fn description(&self) -> String {
        self.to_string()
    }
}
