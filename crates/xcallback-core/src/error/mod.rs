//! Failure taxonomy for x-callback-url exchanges.
//!
//! Every failure belongs to one of four kinds, each carrying a reason with a
//! stable numeric code and a human-readable description. The codes travel
//! across application boundaries inside error return URLs, so they must never
//! be renumbered.
//!
//! | Reason                          | Code |
//! |---------------------------------|------|
//! | `UnregisteredApplicationScheme` | 1200 |
//! | `InvalidXCallbackUrl`           | 1300 |
//! | `InvalidScheme`                 | 1301 |
//! | `MissingScheme`                 | 1305 |
//! | `MissingAction`                 | 1310 |
//! | `MissingSourceApp`              | 1320 |
//! | `MissingRequiredProperty`       | 1321 |
//! | `MissingActionHandler`          | 1404 |
//! | `ResourceNotFound`              | 1501 |
//!
//! Generic action failures and unknown failures report the code of the
//! failure they wrap.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// A failure that can be reported to another application as a code and text.
///
/// Implemented by every reason in the taxonomy and by [`XCallbackError`]
/// itself. Handler authors implement it for their own error types so those
/// can be wrapped in [`HandlerFailureReason::GenericActionFailure`] or turned
/// into an error response with
/// [`XCallbackResponse::from_failure`](crate::XCallbackResponse::from_failure).
pub trait FailureReason: fmt::Debug + Send + Sync {
    /// Stable numeric code reported in error return URLs.
    fn code(&self) -> i32;

    /// Human-readable description of the failure.
    fn description(&self) -> String;
}

/// Errors raised by the engine, the codec, and request resolution.
#[derive(Debug, Clone, Error)]
pub enum XCallbackError {
    /// The local application is not set up to perform the exchange.
    #[error("configuration failure: {0}")]
    ConfigurationFailure(#[from] ConfigurationFailureReason),
    /// A URL or request could not be interpreted as an x-callback-url.
    #[error("malformed request: {0}")]
    MalformedRequest(#[from] MalformedRequestReason),
    /// An action handler could not be found or failed.
    #[error("handler failure: {0}")]
    HandlerFailure(#[from] HandlerFailureReason),
    /// A failure outside the taxonomy.
    #[error("unknown failure: {}", .0.description())]
    UnknownFailure(Arc<dyn FailureReason>),
}

impl XCallbackError {
    /// The launcher reports that no installed application handles `scheme`.
    pub fn unregistered_scheme(scheme: impl Into<String>) -> Self {
        ConfigurationFailureReason::UnregisteredApplicationScheme {
            scheme: scheme.into(),
        }
        .into()
    }

    /// The named value could not be turned into a valid x-callback-url.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        MalformedRequestReason::InvalidXCallbackUrl { url: url.into() }.into()
    }

    /// No handler is registered for `action`.
    pub fn missing_action_handler(action: impl Into<String>) -> Self {
        HandlerFailureReason::MissingActionHandler {
            action: action.into(),
        }
        .into()
    }

    /// Wraps a handler's own failure.
    pub fn generic_action_failure(reason: impl FailureReason + 'static) -> Self {
        HandlerFailureReason::GenericActionFailure(Arc::new(reason)).into()
    }

    /// Wraps a failure outside the taxonomy.
    pub fn unknown(reason: impl FailureReason + 'static) -> Self {
        Self::UnknownFailure(Arc::new(reason))
    }

    /// Short label naming the failure kind.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::ConfigurationFailure(_) => "Configuration Failure",
            Self::MalformedRequest(_) => "Malformed Request",
            Self::HandlerFailure(_) => "Handler Failure",
            Self::UnknownFailure(_) => "Unknown Failure",
        }
    }
}

impl FailureReason for XCallbackError {
    fn code(&self) -> i32 {
        match self {
            Self::ConfigurationFailure(reason) => reason.code(),
            Self::MalformedRequest(reason) => reason.code(),
            Self::HandlerFailure(reason) => reason.code(),
            Self::UnknownFailure(reason) => reason.code(),
        }
    }

    fn description(&self) -> String {
        match self {
            Self::ConfigurationFailure(reason) => reason.description(),
            Self::MalformedRequest(reason) => reason.description(),
            Self::HandlerFailure(reason) => reason.description(),
            Self::UnknownFailure(reason) => reason.description(),
        }
    }
}

/// Reasons the local application cannot perform an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationFailureReason {
    /// No installed application handles the target scheme.
    #[error("no installed application is registered for the '{scheme}' scheme")]
    UnregisteredApplicationScheme {
        /// Scheme that could not be opened.
        scheme: String,
    },
}

impl FailureReason for ConfigurationFailureReason {
    fn code(&self) -> i32 {
        match self {
            Self::UnregisteredApplicationScheme { .. } => 1200,
        }
    }

    fn description(&self) -> String {
        self.to_string()
    }
}

/// Reasons a URL or request is not a usable x-callback-url.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRequestReason {
    /// The value could not be converted to or from a valid URL.
    #[error("could not convert '{url}' to a valid x-callback-url")]
    InvalidXCallbackUrl {
        /// Rendering of the offending value.
        url: String,
    },
    /// The request targets a scheme other than the one expected.
    #[error("the provided scheme does not match the expected scheme '{expected}'")]
    InvalidScheme {
        /// Scheme the receiver expected.
        expected: String,
    },
    /// The URL carries no scheme.
    #[error("x-callback-url requests require a scheme")]
    MissingScheme,
    /// The URL path names no action.
    #[error("x-callback-url requests require an action")]
    MissingAction,
    /// The request does not identify its source application.
    #[error("the `x-source` parameter is required")]
    MissingSourceApp,
    /// A parameter the handler depends on is absent.
    #[error("the `{name}` parameter is required")]
    MissingRequiredProperty {
        /// Name of the missing parameter.
        name: String,
    },
}

impl FailureReason for MalformedRequestReason {
    fn code(&self) -> i32 {
        match self {
            Self::InvalidXCallbackUrl { .. } => 1300,
            Self::InvalidScheme { .. } => 1301,
            Self::MissingScheme => 1305,
            Self::MissingAction => 1310,
            Self::MissingSourceApp => 1320,
            Self::MissingRequiredProperty { .. } => 1321,
        }
    }

    fn description(&self) -> String {
        self.to_string()
    }
}

/// Reasons an action handler could not service a request.
#[derive(Debug, Clone, Error)]
pub enum HandlerFailureReason {
    /// A resource named by the request does not exist.
    #[error("could not locate resource with id '{id}'")]
    ResourceNotFound {
        /// Identifier that was looked up.
        id: String,
    },
    /// No handler is registered for the requested action.
    #[error("missing action handler for action '{action}'")]
    MissingActionHandler {
        /// Action named by the request.
        action: String,
    },
    /// The handler failed with its own error.
    #[error("{}", .0.description())]
    GenericActionFailure(Arc<dyn FailureReason>),
}

impl FailureReason for HandlerFailureReason {
    fn code(&self) -> i32 {
        match self {
            Self::ResourceNotFound { .. } => 1501,
            Self::MissingActionHandler { .. } => 1404,
            Self::GenericActionFailure(reason) => reason.code(),
        }
    }

    fn description(&self) -> String {
        self.to_string()
    }
}

/// A plain code and description pair.
///
/// Useful for handlers whose failures are not modelled as Rust error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodedFailure {
    code: i32,
    description: String,
}

impl CodedFailure {
    /// Creates a failure with the given code and description.
    pub fn new(code: i32, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }
}

impl FailureReason for CodedFailure {
    fn code(&self) -> i32 {
        self.code
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

impl fmt::Display for CodedFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "code {}: {}", self.code, self.description)
    }
}
