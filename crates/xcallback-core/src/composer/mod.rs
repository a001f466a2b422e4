//! Correlation of handler responses with the caller's return URLs.
//!
//! The request being handled carries the caller's return URLs under
//! `x-success`, `x-error` and `x-cancel`. Once the handler reports an
//! [`XCallbackResponse`], [`compose_return`] picks the matching return URL
//! and decorates it with the outcome. When the caller embedded no return URL
//! for that outcome, nothing is composed and nothing is launched.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};
use xcallback_config::ReturnLaunchPolicy;

use crate::codec::{self, XCallbackUrl};
use crate::launcher::{LaunchError, Launcher};
use crate::params::{ERROR_CODE_KEY, ERROR_MESSAGE_KEY};
use crate::request::XCallbackRequest;
use crate::response::XCallbackResponse;

/// Tracing target for return launches.
pub(crate) const COMPOSER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::composer");

/// Builds the return request for `response`, if `request` embedded one.
///
/// - Success merges the response parameters into the `x-success` request,
///   overwriting same-named keys.
/// - Error adds `errorCode` and `errorMessage` to the `x-error` request.
/// - Cancel returns the `x-cancel` request unchanged.
#[must_use]
pub fn compose_return(
    request: &XCallbackRequest,
    response: XCallbackResponse,
) -> Option<XCallbackRequest> {
    match response {
        XCallbackResponse::Success(parameters) => {
            let mut success = request.x_success()?;
            success.extend_parameters(parameters);
            Some(success)
        }
        XCallbackResponse::Error { code, message } => {
            let mut error = request.x_error()?;
            error.add_parameter(ERROR_CODE_KEY, code.to_string());
            error.add_parameter(ERROR_MESSAGE_KEY, message);
            Some(error)
        }
        XCallbackResponse::Cancel => request.x_cancel(),
    }
}

/// Builds and encodes the return URL for `response`.
///
/// A return request that fails to encode is treated like a missing one.
#[must_use]
pub fn compose_return_url(
    request: &XCallbackRequest,
    response: XCallbackResponse,
) -> Option<XCallbackUrl> {
    let kind = response.kind();
    let Some(composed) = compose_return(request, response) else {
        debug!(
            target: COMPOSER_TARGET,
            action = request.action(),
            ?kind,
            "no return url embedded for response"
        );
        return None;
    };
    match codec::encode(&composed) {
        Ok(url) => Some(url),
        Err(error) => {
            debug!(
                target: COMPOSER_TARGET,
                action = request.action(),
                ?kind,
                %error,
                "embedded return url could not be rebuilt"
            );
            None
        }
    }
}

/// What happened when a handler completed.
#[derive(Debug, Clone)]
pub enum ReturnOutcome {
    /// The return URL was handed to the launcher.
    Launched(XCallbackUrl),
    /// The caller embedded no usable return URL for this outcome.
    NoReturnRequested,
    /// The launcher reported the return scheme unreachable, so nothing was
    /// opened.
    Unreachable(XCallbackUrl),
    /// The launcher failed to open the return URL.
    LaunchFailed {
        /// URL that failed to open.
        url: XCallbackUrl,
        /// Launcher failure.
        error: LaunchError,
    },
}

impl ReturnOutcome {
    /// Returns the URL that was opened, if any.
    #[must_use]
    pub const fn launched_url(&self) -> Option<&XCallbackUrl> {
        match self {
            Self::Launched(url) => Some(url),
            Self::NoReturnRequested | Self::Unreachable(_) | Self::LaunchFailed { .. } => None,
        }
    }
}

/// Single-use channel through which a handler reports its response.
///
/// Completing consumes the value, so a response is reported at most once.
/// The completion is `Send` and may be moved to, and completed on, any
/// thread. Dropping it without completing leaves the exchange open and
/// launches nothing.
pub struct Completion {
    request: XCallbackRequest,
    launcher: Arc<dyn Launcher>,
    policy: ReturnLaunchPolicy,
}

impl Completion {
    pub(crate) fn new(
        request: XCallbackRequest,
        launcher: Arc<dyn Launcher>,
        policy: ReturnLaunchPolicy,
    ) -> Self {
        Self {
            request,
            launcher,
            policy,
        }
    }

    /// The request being completed.
    #[must_use]
    pub const fn request(&self) -> &XCallbackRequest {
        &self.request
    }

    /// Reports `response` and launches the correlated return URL.
    ///
    /// Launch problems are logged and reported in the outcome; they are never
    /// raised, since the caller being answered is another application.
    pub fn complete(self, response: XCallbackResponse) -> ReturnOutcome {
        let Some(url) = compose_return_url(&self.request, response) else {
            return ReturnOutcome::NoReturnRequested;
        };

        if matches!(self.policy, ReturnLaunchPolicy::QueryScheme) && !self.launcher.can_open(&url)
        {
            warn!(
                target: COMPOSER_TARGET,
                url = url.as_str(),
                "return scheme is unreachable; skipping return launch"
            );
            return ReturnOutcome::Unreachable(url);
        }

        match self.launcher.open(&url) {
            Ok(()) => {
                debug!(target: COMPOSER_TARGET, url = url.as_str(), "launched return url");
                ReturnOutcome::Launched(url)
            }
            Err(error) => {
                warn!(
                    target: COMPOSER_TARGET,
                    url = url.as_str(),
                    %error,
                    "failed to launch return url"
                );
                ReturnOutcome::LaunchFailed { url, error }
            }
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Completion")
            .field("request", &self.request)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
