//! The request value exchanged between applications.
//!
//! A [`XCallbackRequest`] names a target scheme, an action, and a flat
//! string-to-string parameter map. Return URLs for success, error and
//! cancellation are ordinary parameters under reserved keys (see
//! [`crate::params`]); the accessors here decode them lazily into nested
//! requests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::{MalformedRequestReason, XCallbackError};
use crate::params::{CALLBACK_HOST, ReturnKind, SOURCE_APP_KEY};

/// One directional x-callback-url request.
///
/// Requests are plain values: cloning yields an independent copy and only the
/// explicit parameter operations mutate them.
///
/// # Example
///
/// ```
/// use xcallback_core::XCallbackRequest;
///
/// let mut request = XCallbackRequest::new("notes", "create");
/// request.add_parameter("title", "Groceries");
/// request.add_x_success_action("tasks", "note-created");
///
/// let success = request.x_success().expect("success return is embedded");
/// assert_eq!(success.target_scheme(), "tasks");
/// assert_eq!(success.action(), "note-created");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XCallbackRequest {
    target_scheme: String,
    action: String,
    #[serde(default)]
    parameters: BTreeMap<String, String>,
}

impl XCallbackRequest {
    /// Creates a request with no parameters.
    ///
    /// The engine's [`request`](crate::XCallbackEngine::request) factory also
    /// fills in `x-source` from the configured identity.
    pub fn new(target_scheme: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            target_scheme: target_scheme.into(),
            action: action.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub(crate) const fn from_parts(
        target_scheme: String,
        action: String,
        parameters: BTreeMap<String, String>,
    ) -> Self {
        Self {
            target_scheme,
            action,
            parameters,
        }
    }

    /// Scheme of the application that should handle the request.
    #[must_use]
    pub const fn target_scheme(&self) -> &str {
        self.target_scheme.as_str()
    }

    /// Action the target application should perform.
    #[must_use]
    pub const fn action(&self) -> &str {
        self.action.as_str()
    }

    /// All parameters, reserved keys included.
    #[must_use]
    pub const fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Returns the value stored under `name`, failing when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRequestReason::MissingRequiredProperty`] when no
    /// value is stored under `name`.
    pub fn require_parameter(&self, name: &str) -> Result<&str, XCallbackError> {
        self.parameter(name).ok_or_else(|| {
            MalformedRequestReason::MissingRequiredProperty {
                name: name.to_owned(),
            }
            .into()
        })
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn add_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(key.into(), value.into());
    }

    /// Builder form of [`add_parameter`](Self::add_parameter).
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_parameter(key, value);
        self
    }

    /// Merges every entry of `parameters`, overwriting same-named keys.
    pub fn extend_parameters<I, K, V>(&mut self, parameters: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.parameters.extend(
            parameters
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
    }

    /// Removes and returns the value stored under `key`.
    pub fn remove_parameter(&mut self, key: &str) -> Option<String> {
        self.parameters.remove(key)
    }

    /// Identity of the requesting application (`x-source`).
    #[must_use]
    pub fn source_app(&self) -> Option<&str> {
        self.parameter(SOURCE_APP_KEY)
    }

    /// Sets `x-source`.
    pub fn set_source_app(&mut self, source_app: impl Into<String>) {
        self.add_parameter(SOURCE_APP_KEY, source_app);
    }

    /// Removes `x-source`.
    pub fn remove_source_app(&mut self) -> Option<String> {
        self.remove_parameter(SOURCE_APP_KEY)
    }

    /// Decodes the return URL embedded for `kind`.
    ///
    /// Returns `None` when no return URL is embedded or when the stored value
    /// does not decode; the decoding failure itself is discarded.
    #[must_use]
    pub fn return_request(&self, kind: ReturnKind) -> Option<Self> {
        let url = self.parameter(kind.key())?;
        codec::decode_str(url).ok()
    }

    /// Embeds `scheme://x-callback-url/action` as the return URL for `kind`.
    pub fn set_return_action(&mut self, kind: ReturnKind, scheme: &str, action: &str) {
        self.add_parameter(kind.key(), format!("{scheme}://{CALLBACK_HOST}/{action}"));
    }

    /// Removes the return URL embedded for `kind`.
    pub fn remove_return_action(&mut self, kind: ReturnKind) -> Option<String> {
        self.remove_parameter(kind.key())
    }

    /// Return request for `x-success`, if embedded and decodable.
    #[must_use]
    pub fn x_success(&self) -> Option<Self> {
        self.return_request(ReturnKind::Success)
    }

    /// Return request for `x-error`, if embedded and decodable.
    #[must_use]
    pub fn x_error(&self) -> Option<Self> {
        self.return_request(ReturnKind::Error)
    }

    /// Return request for `x-cancel`, if embedded and decodable.
    #[must_use]
    pub fn x_cancel(&self) -> Option<Self> {
        self.return_request(ReturnKind::Cancel)
    }

    /// Embeds the `x-success` return URL.
    pub fn add_x_success_action(&mut self, scheme: &str, action: &str) {
        self.set_return_action(ReturnKind::Success, scheme, action);
    }

    /// Embeds the `x-error` return URL.
    pub fn add_x_error_action(&mut self, scheme: &str, action: &str) {
        self.set_return_action(ReturnKind::Error, scheme, action);
    }

    /// Embeds the `x-cancel` return URL.
    pub fn add_x_cancel_action(&mut self, scheme: &str, action: &str) {
        self.set_return_action(ReturnKind::Cancel, scheme, action);
    }

    /// Removes the `x-success` return URL.
    pub fn remove_x_success_action(&mut self) -> Option<String> {
        self.remove_return_action(ReturnKind::Success)
    }

    /// Removes the `x-error` return URL.
    pub fn remove_x_error_action(&mut self) -> Option<String> {
        self.remove_return_action(ReturnKind::Error)
    }

    /// Removes the `x-cancel` return URL.
    pub fn remove_x_cancel_action(&mut self) -> Option<String> {
        self.remove_return_action(ReturnKind::Cancel)
    }
}

#[cfg(test)]
mod tests;
