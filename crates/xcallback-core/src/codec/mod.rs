//! Conversion between URLs and [`XCallbackRequest`] values.
//!
//! The wire shape is `<scheme>://x-callback-url/<action>[?<k>=<v>&...]`.
//! Parameter keys and values are percent-encoded with everything outside the
//! RFC 3986 unreserved set escaped, so a nested return URL survives as a
//! single query value. Decoding accepts `+` as an encoded space.
//!
//! Encoding followed by decoding yields the original scheme, action, and
//! parameters. The `url` crate normalises schemes to lowercase, so
//! [`XCallbackUrl`] keeps the original text alongside the parsed form and
//! reports the scheme as written.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use percent_encoding::{
    AsciiSet, CONTROLS, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode,
};
use tracing::debug;
use url::Url;
use xcallback_config::is_valid_scheme;

use crate::error::{MalformedRequestReason, XCallbackError};
use crate::params::CALLBACK_HOST;
use crate::request::XCallbackRequest;

/// Tracing target for codec operations.
pub(crate) const CODEC_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::codec");

/// Bytes escaped in query keys and values: everything but `A-Z a-z 0-9 - . _ ~`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Bytes escaped in the action path. `/` is kept so nested actions survive.
const ACTION_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// A validated absolute URL that remembers how its scheme was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XCallbackUrl {
    raw: String,
    url: Url,
}

impl XCallbackUrl {
    /// Parses and validates `input` as an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRequestReason::MissingScheme`] when `input` is a
    /// relative reference and [`MalformedRequestReason::InvalidXCallbackUrl`]
    /// for any other parse failure.
    pub fn parse(input: &str) -> Result<Self, XCallbackError> {
        let url = Url::parse(input).map_err(|error| match error {
            url::ParseError::RelativeUrlWithoutBase => {
                XCallbackError::from(MalformedRequestReason::MissingScheme)
            }
            _ => XCallbackError::invalid_url(input),
        })?;
        let raw = input.trim_matches(|c: char| c <= ' ').to_owned();
        Ok(Self { raw, url })
    }

    /// The URL text as it was written.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// The scheme with its original letter case.
    #[must_use]
    pub fn scheme(&self) -> &str {
        let normalised = self.url.scheme();
        self.raw
            .get(..normalised.len())
            .filter(|written| written.eq_ignore_ascii_case(normalised))
            .unwrap_or(normalised)
    }

    /// The parsed URL. Its scheme is lowercase.
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.url
    }

    /// Consumes the wrapper, returning the URL text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.raw
    }
}

impl From<Url> for XCallbackUrl {
    fn from(url: Url) -> Self {
        Self {
            raw: url.as_str().to_owned(),
            url,
        }
    }
}

impl FromStr for XCallbackUrl {
    type Err = XCallbackError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

impl fmt::Display for XCallbackUrl {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.raw)
    }
}

impl AsRef<str> for XCallbackUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Decodes URL text into a request.
///
/// # Errors
///
/// See [`XCallbackUrl::parse`] and [`decode`].
pub fn decode_str(input: &str) -> Result<XCallbackRequest, XCallbackError> {
    decode(&XCallbackUrl::parse(input)?)
}

/// Decodes a URL into a request.
///
/// The action is the percent-decoded path without its leading `/`; the host
/// is not checked. When a query key repeats, the last value wins. Query
/// entries without `=` are dropped.
///
/// # Errors
///
/// Returns [`MalformedRequestReason::MissingScheme`] or
/// [`MalformedRequestReason::MissingAction`] when either component is empty,
/// and [`MalformedRequestReason::InvalidXCallbackUrl`] when the path or a
/// query component does not percent-decode to UTF-8.
pub fn decode(url: &XCallbackUrl) -> Result<XCallbackRequest, XCallbackError> {
    let scheme = url.scheme();
    if scheme.is_empty() {
        return Err(MalformedRequestReason::MissingScheme.into());
    }

    let path = url.as_url().path();
    let action = decode_component(path.strip_prefix('/').unwrap_or(path), url)?;
    if action.is_empty() {
        return Err(MalformedRequestReason::MissingAction.into());
    }

    let parameters = match url.as_url().query() {
        Some(query) => decode_query(query, url)?,
        None => BTreeMap::new(),
    };

    debug!(
        target: CODEC_TARGET,
        scheme,
        action = action.as_str(),
        parameters = parameters.len(),
        "decoded x-callback-url"
    );
    Ok(XCallbackRequest::from_parts(
        scheme.to_owned(),
        action,
        parameters,
    ))
}

/// Encodes a request as `scheme://x-callback-url/action?query`.
///
/// Parameters are written in key order.
///
/// # Errors
///
/// Returns [`MalformedRequestReason::InvalidXCallbackUrl`] when the scheme is
/// not a valid URL scheme, the action or a parameter key is empty, or the
/// assembled text does not parse as a URL.
pub fn encode(request: &XCallbackRequest) -> Result<XCallbackUrl, XCallbackError> {
    let invalid = || {
        XCallbackError::invalid_url(format!(
            "{}://{CALLBACK_HOST}/{}",
            request.target_scheme(),
            request.action()
        ))
    };

    if !is_valid_scheme(request.target_scheme()) || request.action().is_empty() {
        return Err(invalid());
    }
    if request.parameters().keys().any(String::is_empty) {
        return Err(invalid());
    }

    let mut text = format!(
        "{}://{CALLBACK_HOST}/{}",
        request.target_scheme(),
        utf8_percent_encode(request.action(), ACTION_PATH)
    );
    let query = request
        .parameters()
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_COMPONENT),
                utf8_percent_encode(value, QUERY_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&");
    if !query.is_empty() {
        text.push('?');
        text.push_str(&query);
    }

    let url = XCallbackUrl::parse(&text).map_err(|_| invalid())?;
    debug!(target: CODEC_TARGET, url = url.as_str(), "encoded x-callback-url");
    Ok(url)
}

fn decode_query(
    query: &str,
    url: &XCallbackUrl,
) -> Result<BTreeMap<String, String>, XCallbackError> {
    let mut parameters = BTreeMap::new();
    for item in query.split('&') {
        let Some((key, value)) = item.split_once('=') else {
            continue;
        };
        let decoded_key = decode_component(&key.replace('+', " "), url)?;
        let decoded_value = decode_component(&value.replace('+', " "), url)?;
        parameters.insert(decoded_key, decoded_value);
    }
    Ok(parameters)
}

fn decode_component(text: &str, url: &XCallbackUrl) -> Result<String, XCallbackError> {
    percent_decode_str(text)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| XCallbackError::invalid_url(url.as_str()))
}
