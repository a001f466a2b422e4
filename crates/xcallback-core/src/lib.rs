//! The x-callback-url protocol engine.
//!
//! x-callback-url lets one application ask another to perform an action and
//! report the outcome by opening a return URL. A request travels as
//! `scheme://x-callback-url/action?key=value&...`, where the reserved keys
//! `x-source`, `x-success`, `x-error` and `x-cancel` name the caller and
//! embed the URLs to open on each outcome.
//!
//! The crate is organised around the [`XCallbackEngine`]:
//!
//! - [`codec`] converts between [`XCallbackRequest`] values and
//!   [`XCallbackUrl`]s.
//! - [`registry`] maps action names to [`XCallbackActionHandler`]s.
//! - [`composer`] turns a handler's [`XCallbackResponse`] into the return
//!   URL the caller asked for and launches it through a [`Completion`].
//! - [`launcher`] defines the [`Launcher`] capability that actually opens
//!   URLs; binaries supply an operating-system implementation.
//! - [`error`] holds the numbered failure taxonomy shared across
//!   application boundaries.
//!
//! # Example
//!
//! ```
//! use xcallback_core::{XCallbackRequest, codec};
//!
//! let mut request = XCallbackRequest::new("tasks", "add");
//! request.add_parameter("title", "Buy milk");
//! request.add_x_success_action("notes", "added");
//!
//! let url = codec::encode(&request).expect("request encodes");
//! assert!(url.as_str().starts_with("tasks://x-callback-url/add?"));
//! assert_eq!(codec::decode(&url).expect("url decodes"), request);
//! ```

pub mod codec;
pub mod composer;
pub mod convert;
pub mod engine;
pub mod error;
pub mod launcher;
pub mod params;
pub mod registry;
pub mod request;
pub mod response;

#[cfg(test)]
mod tests;

pub use self::codec::XCallbackUrl;
pub use self::composer::{Completion, ReturnOutcome, compose_return, compose_return_url};
pub use self::convert::IntoXCallbackRequest;
pub use self::engine::XCallbackEngine;
pub use self::error::{
    CodedFailure, ConfigurationFailureReason, FailureReason, HandlerFailureReason,
    MalformedRequestReason, XCallbackError,
};
#[cfg(any(test, feature = "test-support"))]
pub use self::launcher::RecordingLauncher;
pub use self::launcher::{LaunchError, Launcher};
pub use self::params::ReturnKind;
pub use self::registry::{ActionRegistry, SharedActionHandler, XCallbackActionHandler};
pub use self::request::XCallbackRequest;
pub use self::response::XCallbackResponse;
pub use xcallback_config::Config;
