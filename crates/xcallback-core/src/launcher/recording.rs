//! In-memory launcher double that records every URL it opens.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use super::{LaunchError, Launcher};
use crate::codec::XCallbackUrl;

/// A [`Launcher`] that records opened URLs instead of launching them.
#[derive(Debug)]
pub struct RecordingLauncher {
    reachable: AtomicBool,
    fail_opens: AtomicBool,
    opened: Mutex<Vec<XCallbackUrl>>,
}

impl Default for RecordingLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingLauncher {
    /// A launcher that reports every scheme reachable.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reachable: AtomicBool::new(true),
            fail_opens: AtomicBool::new(false),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Sets the answer given by [`Launcher::can_open`].
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Makes subsequent opens fail after recording the URL.
    pub fn set_failing(&self, failing: bool) {
        self.fail_opens.store(failing, Ordering::SeqCst);
    }

    /// URLs opened so far, oldest first.
    #[must_use]
    pub fn opened(&self) -> Vec<XCallbackUrl> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of URLs opened so far.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Launcher for RecordingLauncher {
    fn can_open(&self, _url: &XCallbackUrl) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    fn open(&self, url: &XCallbackUrl) -> Result<(), LaunchError> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.clone());
        if self.fail_opens.load(Ordering::SeqCst) {
            return Err(LaunchError::Rejected {
                url: url.to_string(),
                message: "recording launcher configured to fail".to_owned(),
            });
        }
        Ok(())
    }
}
