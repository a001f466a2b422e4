//! Shared configuration for the x-callback-url engine and its tooling.
//!
//! [`Config`] carries everything the engine needs to know about the local
//! application: the identity written into outbound `x-source` parameters, the
//! launch policies applied before a URL is opened, and optional validation of
//! inbound requests. The logging fields are consumed by the binaries when
//! they install their tracing subscriber.
//!
//! All fields have defaults, so an empty document deserialises to
//! [`Config::default`]. The `ortho_config` derive layers the sources: a TOML
//! file named by `--config-path` (or `XCALLBACK_CONFIG_PATH`), then
//! `XCALLBACK_*` environment variables, then command-line flags. Loaded
//! values still pass through [`Config::validate`] before use.

mod defaults;
mod logging;
mod policy;
mod scheme;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::defaults::{
    DEFAULT_LOG_FILTER, default_log_filter, default_log_filter_string, default_log_format,
    default_return_launch, default_scheme_query, default_source_app_policy,
};
pub use self::logging::{LogFormat, LogFormatParseError};
pub use self::policy::{
    PolicyParseError, ReturnLaunchPolicy, SchemeQueryPolicy, SourceAppPolicy,
};
pub use self::scheme::is_valid_scheme;

/// Engine and binary configuration.
///
/// Each field maps to a kebab-case flag (`--source-app`), an upper-case
/// environment variable (`XCALLBACK_SOURCE_APP`) and a snake-case file key
/// (`source_app`).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, OrthoConfig)]
#[serde(default)]
#[ortho_config(prefix = "XCALLBACK")]
pub struct Config {
    source_app: Option<String>,
    scheme_query: SchemeQueryPolicy,
    return_launch: ReturnLaunchPolicy,
    expected_scheme: Option<String>,
    source_app_policy: SourceAppPolicy,
    log_filter: String,
    log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_app: None,
            scheme_query: default_scheme_query(),
            return_launch: default_return_launch(),
            expected_scheme: None,
            source_app_policy: default_source_app_policy(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Identity of the local application, written into `x-source`.
    #[must_use]
    pub fn source_app(&self) -> Option<&str> {
        self.source_app.as_deref()
    }

    /// Policy applied before an outbound send.
    #[must_use]
    pub const fn scheme_query(&self) -> SchemeQueryPolicy {
        self.scheme_query
    }

    /// Policy applied before launching a composed return URL.
    #[must_use]
    pub const fn return_launch(&self) -> ReturnLaunchPolicy {
        self.return_launch
    }

    /// Scheme inbound requests must target, when inbound validation is on.
    #[must_use]
    pub fn expected_scheme(&self) -> Option<&str> {
        self.expected_scheme.as_deref()
    }

    /// Policy applied to inbound requests that omit `x-source`.
    #[must_use]
    pub const fn source_app_policy(&self) -> SourceAppPolicy {
        self.source_app_policy
    }

    /// Whether inbound requests must carry `x-source`.
    #[must_use]
    pub const fn require_source_app(&self) -> bool {
        self.source_app_policy.is_required()
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Sets the local application identity.
    #[must_use]
    pub fn with_source_app(mut self, source_app: impl Into<String>) -> Self {
        self.source_app = Some(source_app.into());
        self
    }

    /// Sets the outbound scheme query policy.
    #[must_use]
    pub const fn with_scheme_query(mut self, policy: SchemeQueryPolicy) -> Self {
        self.scheme_query = policy;
        self
    }

    /// Sets the return launch policy.
    #[must_use]
    pub const fn with_return_launch(mut self, policy: ReturnLaunchPolicy) -> Self {
        self.return_launch = policy;
        self
    }

    /// Requires inbound requests to target `scheme`.
    #[must_use]
    pub fn with_expected_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.expected_scheme = Some(scheme.into());
        self
    }

    /// Requires inbound requests to carry `x-source`.
    #[must_use]
    pub const fn with_required_source_app(mut self, required: bool) -> Self {
        self.source_app_policy = if required {
            SourceAppPolicy::Required
        } else {
            SourceAppPolicy::Optional
        };
        self
    }

    /// Sets the tracing filter expression.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Sets the log output format.
    #[must_use]
    pub const fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Checks the configuration for values the engine cannot act on.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_app.as_deref().is_some_and(|app| app.trim().is_empty()) {
            return Err(ConfigError::EmptySourceApp);
        }
        if let Some(scheme) = self.expected_scheme.as_deref()
            && !is_valid_scheme(scheme)
        {
            return Err(ConfigError::InvalidExpectedScheme {
                scheme: scheme.to_owned(),
            });
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::EmptyLogFilter);
        }
        Ok(())
    }
}

/// Errors raised by [`Config::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The source application identity was blank.
    #[error("source_app must not be blank when set")]
    EmptySourceApp,
    /// The expected inbound scheme is not a valid URL scheme.
    #[error("expected_scheme '{scheme}' is not a valid URL scheme")]
    InvalidExpectedScheme {
        /// Offending scheme text.
        scheme: String,
    },
    /// The log filter expression was blank.
    #[error("log_filter must not be blank")]
    EmptyLogFilter,
}

#[cfg(test)]
mod tests;
