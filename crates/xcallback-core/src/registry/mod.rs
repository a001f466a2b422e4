//! Action handler registry.
//!
//! The [`ActionRegistry`] maps action names to handlers. At most one handler
//! is stored per action and a later registration replaces an earlier one.
//! Entries live as long as the registry; nothing is removed automatically.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::composer::Completion;
use crate::request::XCallbackRequest;

/// Handles inbound requests for one or more actions.
///
/// `handle` receives the decoded request and a [`Completion`]. The handler
/// may complete synchronously, hand the completion to another thread, or
/// never complete at all; the engine does not wait either way.
///
/// Failures are reported by completing with
/// [`XCallbackResponse::Error`](crate::XCallbackResponse::Error), never by
/// panicking.
///
/// Closures taking `(XCallbackRequest, Completion)` are handlers too:
///
/// ```
/// use xcallback_core::{ActionRegistry, Completion, XCallbackRequest, XCallbackResponse};
///
/// let mut registry = ActionRegistry::new();
/// registry.register("ping", |_request: XCallbackRequest, completion: Completion| {
///     completion.complete(XCallbackResponse::success([("reply", "pong")]));
/// });
/// assert!(registry.contains("ping"));
/// ```
pub trait XCallbackActionHandler: Send + Sync {
    /// Processes `request` and eventually reports through `completion`.
    fn handle(&self, request: XCallbackRequest, completion: Completion);
}

impl<F> XCallbackActionHandler for F
where
    F: Fn(XCallbackRequest, Completion) + Send + Sync,
{
    fn handle(&self, request: XCallbackRequest, completion: Completion) {
        self(request, completion);
    }
}

/// Shared handle to a registered handler.
pub type SharedActionHandler = Arc<dyn XCallbackActionHandler>;

/// Registry of action handlers keyed by action name.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    handlers: HashMap<String, SharedActionHandler>,
}

impl ActionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `action`, returning the handler it replaces.
    ///
    /// The action name is not validated.
    pub fn register(
        &mut self,
        action: impl Into<String>,
        handler: impl XCallbackActionHandler + 'static,
    ) -> Option<SharedActionHandler> {
        self.register_shared(action, Arc::new(handler))
    }

    /// Registers an already shared handler for `action`.
    pub fn register_shared(
        &mut self,
        action: impl Into<String>,
        handler: SharedActionHandler,
    ) -> Option<SharedActionHandler> {
        self.handlers.insert(action.into(), handler)
    }

    /// Looks up the handler registered for `action`.
    #[must_use]
    pub fn get(&self, action: &str) -> Option<&SharedActionHandler> {
        self.handlers.get(action)
    }

    /// Returns `true` when a handler is registered for `action`.
    #[must_use]
    pub fn contains(&self, action: &str) -> bool {
        self.handlers.contains_key(action)
    }

    /// Registered action names in sorted order.
    #[must_use]
    pub fn actions(&self) -> Vec<&str> {
        let mut actions: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        actions.sort_unstable();
        actions
    }

    /// Returns the number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` when no actions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ActionRegistry")
            .field("actions", &self.actions())
            .finish()
    }
}
