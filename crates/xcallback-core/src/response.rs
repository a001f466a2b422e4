//! Outcome reported by an action handler.

use std::collections::BTreeMap;

use crate::error::FailureReason;
use crate::params::ReturnKind;

/// The result of handling one request.
///
/// Exactly one of the three shapes is ever present, so a response cannot
/// carry both success parameters and an error code.
///
/// # Example
///
/// ```
/// use xcallback_core::XCallbackResponse;
///
/// let response = XCallbackResponse::success([("id", "42")]);
/// assert!(response.is_success());
///
/// let response = XCallbackResponse::error(404, "note not found");
/// assert_eq!(response.error_code(), Some(404));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XCallbackResponse {
    /// The action completed; the parameters are merged into the success return.
    Success(BTreeMap<String, String>),
    /// The action failed with a code and message.
    Error {
        /// Numeric failure code.
        code: i32,
        /// Human-readable failure message.
        message: String,
    },
    /// The action was cancelled.
    Cancel,
}

impl XCallbackResponse {
    /// A successful outcome carrying `parameters`.
    pub fn success<I, K, V>(parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Success(
            parameters
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// A failed outcome.
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
        }
    }

    /// A cancelled outcome.
    #[must_use]
    pub const fn cancel() -> Self {
        Self::Cancel
    }

    /// A failed outcome carrying the code and description of `reason`.
    #[must_use]
    pub fn from_failure(reason: &dyn FailureReason) -> Self {
        Self::error(reason.code(), reason.description())
    }

    /// Which embedded return URL this outcome is routed to.
    #[must_use]
    pub const fn kind(&self) -> ReturnKind {
        match self {
            Self::Success(_) => ReturnKind::Success,
            Self::Error { .. } => ReturnKind::Error,
            Self::Cancel => ReturnKind::Cancel,
        }
    }

    /// Returns `true` for [`XCallbackResponse::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` for [`XCallbackResponse::Cancel`].
    #[must_use]
    pub const fn is_cancel(&self) -> bool {
        matches!(self, Self::Cancel)
    }

    /// Success parameters, if this is a success.
    #[must_use]
    pub const fn parameters(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Success(parameters) => Some(parameters),
            Self::Error { .. } | Self::Cancel => None,
        }
    }

    /// Failure code, if this is an error.
    #[must_use]
    pub const fn error_code(&self) -> Option<i32> {
        match self {
            Self::Error { code, .. } => Some(*code),
            Self::Success(_) | Self::Cancel => None,
        }
    }

    /// Failure message, if this is an error.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message.as_str()),
            Self::Success(_) | Self::Cancel => None,
        }
    }
}
