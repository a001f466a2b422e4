//! Conversion of request-like values into [`XCallbackRequest`].

use url::Url;

use crate::codec::{self, XCallbackUrl};
use crate::error::XCallbackError;
use crate::request::XCallbackRequest;

/// Values that can be resolved to an [`XCallbackRequest`].
///
/// Requests convert to themselves; URLs and URL text go through the codec.
pub trait IntoXCallbackRequest {
    /// Resolves `self` to a request.
    ///
    /// # Errors
    ///
    /// Returns the [`XCallbackError::MalformedRequest`] produced by decoding.
    fn to_xcallback_request(&self) -> Result<XCallbackRequest, XCallbackError>;
}

impl IntoXCallbackRequest for XCallbackRequest {
    fn to_xcallback_request(&self) -> Result<XCallbackRequest, XCallbackError> {
        Ok(self.clone())
    }
}

impl IntoXCallbackRequest for XCallbackUrl {
    fn to_xcallback_request(&self) -> Result<XCallbackRequest, XCallbackError> {
        codec::decode(self)
    }
}

impl IntoXCallbackRequest for Url {
    fn to_xcallback_request(&self) -> Result<XCallbackRequest, XCallbackError> {
        codec::decode(&XCallbackUrl::from(self.clone()))
    }
}

impl IntoXCallbackRequest for str {
    fn to_xcallback_request(&self) -> Result<XCallbackRequest, XCallbackError> {
        codec::decode_str(self)
    }
}

impl IntoXCallbackRequest for String {
    fn to_xcallback_request(&self) -> Result<XCallbackRequest, XCallbackError> {
        codec::decode_str(self)
    }
}
