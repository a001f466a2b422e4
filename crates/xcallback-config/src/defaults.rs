use crate::logging::LogFormat;
use crate::policy::{ReturnLaunchPolicy, SchemeQueryPolicy, SourceAppPolicy};

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression used by the binaries.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Outbound sends query the launcher unless told otherwise.
#[must_use]
pub const fn default_scheme_query() -> SchemeQueryPolicy {
    SchemeQueryPolicy::Enabled
}

/// Return URLs are launched without a reachability query.
#[must_use]
pub const fn default_return_launch() -> ReturnLaunchPolicy {
    ReturnLaunchPolicy::FireAndForget
}

/// Inbound requests may omit `x-source`.
#[must_use]
pub const fn default_source_app_policy() -> SourceAppPolicy {
    SourceAppPolicy::Optional
}
