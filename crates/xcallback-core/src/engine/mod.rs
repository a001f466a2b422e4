//! The engine that sends outbound requests and dispatches inbound ones.
//!
//! [`XCallbackEngine`] ties the pieces together: it encodes outbound
//! requests and hands them to the [`Launcher`], resolves inbound URLs to
//! requests, routes them to the registered [`XCallbackActionHandler`], and
//! gives each handler a [`Completion`] that launches the correlated return
//! URL once the handler reports its response.
//!
//! Registration takes `&mut self` while sending and dispatch take `&self`,
//! so the borrow checker keeps registration and dispatch apart. Wrap the
//! engine in a lock when handlers must be registered while requests are
//! being dispatched from other threads.

use std::sync::Arc;

use tracing::debug;
use xcallback_config::Config;

use crate::codec::{self, XCallbackUrl};
use crate::composer::Completion;
use crate::convert::IntoXCallbackRequest;
use crate::error::{MalformedRequestReason, XCallbackError};
use crate::launcher::Launcher;
use crate::registry::{ActionRegistry, SharedActionHandler, XCallbackActionHandler};
use crate::request::XCallbackRequest;

/// Tracing target for engine operations.
pub(crate) const ENGINE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::engine");

/// Sends and receives x-callback-url requests.
///
/// # Example
///
/// ```
/// use std::sync::Mutex;
/// use xcallback_config::Config;
/// use xcallback_core::{
///     Completion, LaunchError, Launcher, XCallbackEngine, XCallbackRequest, XCallbackResponse,
///     XCallbackUrl,
/// };
///
/// #[derive(Default)]
/// struct Log(Mutex<Vec<String>>);
///
/// impl Launcher for Log {
///     fn can_open(&self, _url: &XCallbackUrl) -> bool {
///         true
///     }
///
///     fn open(&self, url: &XCallbackUrl) -> Result<(), LaunchError> {
///         self.0.lock().expect("log lock").push(url.to_string());
///         Ok(())
///     }
/// }
///
/// let mut engine = XCallbackEngine::new(Config::default().with_source_app("Notes"), Log::default());
/// engine.register_action_handler("ping", |_request: XCallbackRequest, completion: Completion| {
///     completion.complete(XCallbackResponse::success([("reply", "pong")]));
/// });
///
/// let mut request = XCallbackRequest::new("notes", "ping");
/// request.add_x_success_action("tasks", "pong");
/// engine.handle(&request).expect("ping is registered");
/// ```
pub struct XCallbackEngine {
    config: Config,
    registry: ActionRegistry,
    launcher: Arc<dyn Launcher>,
}

impl XCallbackEngine {
    /// Creates an engine that opens URLs through `launcher`.
    pub fn new(config: Config, launcher: impl Launcher + 'static) -> Self {
        Self::with_shared_launcher(config, Arc::new(launcher))
    }

    /// Creates an engine around an already shared launcher.
    #[must_use]
    pub fn with_shared_launcher(config: Config, launcher: Arc<dyn Launcher>) -> Self {
        Self {
            config,
            registry: ActionRegistry::new(),
            launcher,
        }
    }

    /// The engine configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The registered action handlers.
    #[must_use]
    pub const fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Builds an outbound request carrying the configured `x-source`.
    #[must_use]
    pub fn request(&self, target_scheme: &str, action: &str) -> XCallbackRequest {
        let mut request = XCallbackRequest::new(target_scheme, action);
        if let Some(source_app) = self.config.source_app() {
            request.set_source_app(source_app);
        }
        request
    }

    /// Registers `handler` for `action`, returning the handler it replaces.
    pub fn register_action_handler(
        &mut self,
        action: impl Into<String>,
        handler: impl XCallbackActionHandler + 'static,
    ) -> Option<SharedActionHandler> {
        let name = action.into();
        debug!(target: ENGINE_TARGET, action = name.as_str(), "registering action handler");
        self.registry.register(name, handler)
    }

    /// Sends `request` to the application that handles its scheme.
    ///
    /// Unless scheme querying is disabled, the launcher is asked whether the
    /// target is reachable first. Returns the URL that was opened.
    ///
    /// # Errors
    ///
    /// Returns [`XCallbackError::MalformedRequest`] when the request cannot be
    /// resolved or encoded,
    /// [`XCallbackError::ConfigurationFailure`] when the launcher reports the
    /// target scheme unreachable, and [`XCallbackError::UnknownFailure`]
    /// wrapping the [`LaunchError`](crate::LaunchError) when opening fails.
    pub fn send<R>(&self, request: &R) -> Result<XCallbackUrl, XCallbackError>
    where
        R: IntoXCallbackRequest + ?Sized,
    {
        let resolved = request.to_xcallback_request()?;
        let url = codec::encode(&resolved)?;

        if self.config.scheme_query().is_enabled() && !self.launcher.can_open(&url) {
            return Err(XCallbackError::unregistered_scheme(resolved.target_scheme()));
        }

        debug!(target: ENGINE_TARGET, url = url.as_str(), "sending request");
        self.launcher.open(&url).map_err(XCallbackError::unknown)?;
        Ok(url)
    }

    /// Reports whether a handler is registered for the request's action.
    ///
    /// Resolution failures yield `false`; this never fails.
    pub fn can_handle<R>(&self, request: &R) -> bool
    where
        R: IntoXCallbackRequest + ?Sized,
    {
        request
            .to_xcallback_request()
            .is_ok_and(|resolved| self.registry.contains(resolved.action()))
    }

    /// Dispatches an inbound request to its action handler.
    ///
    /// Returns as soon as the handler has been invoked; the handler reports
    /// its response later through the [`Completion`] it receives. The
    /// request is passed on untouched: its `x-source` names the remote
    /// caller and is never replaced with the local identity.
    ///
    /// # Errors
    ///
    /// Returns the [`XCallbackError::MalformedRequest`] produced while
    /// resolving or validating the request, or
    /// [`HandlerFailureReason::MissingActionHandler`](crate::HandlerFailureReason::MissingActionHandler)
    /// when no handler is registered for its action.
    pub fn handle<R>(&self, request: &R) -> Result<(), XCallbackError>
    where
        R: IntoXCallbackRequest + ?Sized,
    {
        let resolved = request.to_xcallback_request()?;
        self.validate_inbound(&resolved)?;

        let handler = self
            .registry
            .get(resolved.action())
            .ok_or_else(|| XCallbackError::missing_action_handler(resolved.action()))?;

        debug!(
            target: ENGINE_TARGET,
            action = resolved.action(),
            source = resolved.source_app(),
            "dispatching request"
        );
        let completion = Completion::new(
            resolved.clone(),
            Arc::clone(&self.launcher),
            self.config.return_launch(),
        );
        handler.handle(resolved, completion);
        Ok(())
    }

    fn validate_inbound(&self, request: &XCallbackRequest) -> Result<(), XCallbackError> {
        if let Some(expected) = self.config.expected_scheme()
            && !request.target_scheme().eq_ignore_ascii_case(expected)
        {
            return Err(MalformedRequestReason::InvalidScheme {
                expected: expected.to_owned(),
            }
            .into());
        }
        if self.config.require_source_app() && request.source_app().is_none() {
            return Err(MalformedRequestReason::MissingSourceApp.into());
        }
        Ok(())
    }
}

impl std::fmt::Debug for XCallbackEngine {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("XCallbackEngine")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
