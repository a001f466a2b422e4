//! Launch policies applied by the engine before opening a URL.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Whether outbound sends ask the launcher if the target scheme is reachable.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SchemeQueryPolicy {
    /// Query `can_open` and refuse to send to unreachable schemes.
    #[default]
    Enabled,
    /// Open the URL without querying the launcher first.
    Disabled,
}

impl SchemeQueryPolicy {
    /// Returns `true` when the launcher must be queried before opening.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// How return URLs composed from handler responses are launched.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ReturnLaunchPolicy {
    /// Open the return URL without asking the launcher first.
    #[default]
    FireAndForget,
    /// Skip the return launch when the launcher reports the scheme unreachable.
    QueryScheme,
}

/// Whether inbound requests must name their caller through `x-source`.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SourceAppPolicy {
    /// Accept inbound requests without `x-source`.
    #[default]
    Optional,
    /// Reject inbound requests without `x-source`.
    Required,
}

impl SourceAppPolicy {
    /// Returns `true` when inbound requests must carry `x-source`.
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Required)
    }
}

/// Errors encountered while parsing a policy from text.
pub type PolicyParseError = strum::ParseError;
