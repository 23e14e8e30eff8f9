//! The `Component` trait: the backing type of an extension.
//!
//! A component declares its listeners and actions as tables of plain
//! function pointers. The framework binds them to the owning instance, so
//! handlers always run against the right instance no matter how they are
//! invoked.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::context::Cx;
use super::naming::Namespace;
use super::options::Options;
use crate::dom::ElementId;
use crate::error::ExtensionError;
use crate::event::Event;
use crate::runtime::Page;

/// An event handler method.
pub type Handler<T> = fn(&mut T, &mut Cx<'_, T>, &Event);

/// A perform-method invoked by name through the extension handle.
pub type Action<T> = fn(&mut T, &mut Cx<'_, T>, &[Value]) -> Result<(), ExtensionError>;

/// A method with no arguments besides the context.
pub type Method<T> = fn(&mut T, &mut Cx<'_, T>);

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// What a component sees while it is being constructed.
#[derive(Debug)]
pub struct Setup<'a> {
    pub page: &'a Page,
    pub namespace: &'a Namespace,
    /// The element for single-element instances.
    pub element: Option<ElementId>,
    /// The context element for shared instances.
    pub context_element: Option<ElementId>,
    /// Elements selected by a shared instance's query.
    pub elements: &'a [ElementId],
    pub options: &'a Options,
}

// ---------------------------------------------------------------------------
// EventListenerMap
// ---------------------------------------------------------------------------

/// One declared listener.
pub struct ListenerSpec<T> {
    pub handler: Handler<T>,
    pub passive: bool,
}

impl<T> Clone for ListenerSpec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ListenerSpec<T> {}

impl<T> fmt::Debug for ListenerSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSpec")
            .field("passive", &self.passive)
            .finish_non_exhaustive()
    }
}

/// Event type → handler, in declaration order.
pub struct EventListenerMap<T> {
    entries: Vec<(String, ListenerSpec<T>)>,
}

impl<T> EventListenerMap<T> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Declare a listener (builder). Redeclaring an event replaces its handler.
    pub fn on(self, event: impl Into<String>, handler: Handler<T>) -> Self {
        self.insert(event.into(), ListenerSpec { handler, passive: false })
    }

    /// Declare a passive listener (builder).
    pub fn on_passive(self, event: impl Into<String>, handler: Handler<T>) -> Self {
        self.insert(event.into(), ListenerSpec { handler, passive: true })
    }

    pub fn get(&self, event: &str) -> Option<&ListenerSpec<T>> {
        self.entries.iter().find(|(name, _)| name == event).map(|(_, spec)| spec)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ListenerSpec<T>)> {
        self.entries.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(mut self, event: String, spec: ListenerSpec<T>) -> Self {
        match self.entries.iter_mut().find(|(name, _)| *name == event) {
            Some(entry) => entry.1 = spec,
            None => self.entries.push((event, spec)),
        }
        self
    }
}

impl<T> Default for EventListenerMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EventListenerMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter().map(|(k, v)| (k, v))).finish()
    }
}

// ---------------------------------------------------------------------------
// ActionMap
// ---------------------------------------------------------------------------

/// Action name → perform-method.
pub struct ActionMap<T> {
    actions: BTreeMap<String, Action<T>>,
}

impl<T> ActionMap<T> {
    pub fn new() -> Self {
        Self { actions: BTreeMap::new() }
    }

    /// Register an action (builder).
    pub fn with(mut self, name: impl Into<String>, action: Action<T>) -> Self {
        self.actions.insert(name.into(), action);
        self
    }

    pub fn get(&self, name: &str) -> Option<Action<T>> {
        self.actions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<T> Default for ActionMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ActionMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.actions.keys()).finish()
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// The backing type of an extension. One value per live instance.
pub trait Component: Sized + 'static {
    /// Construct the component for a new instance.
    fn create(setup: &Setup<'_>) -> Self;

    /// Called once after the instance is registered and its options resolved.
    fn init(&mut self, _cx: &mut Cx<'_, Self>) {}

    /// Called when the instance is removed, before its listeners are detached.
    fn deinit(&mut self, _cx: &mut Cx<'_, Self>) {}

    /// Called once per extension, before the first instance's `init`.
    fn init_class(_page: &mut Page) {}

    /// Listeners attached to the root element. Event names are usually
    /// namespaced through `namespace.event_name`.
    fn event_listeners(&self, _namespace: &Namespace) -> EventListenerMap<Self> {
        EventListenerMap::new()
    }

    /// Quiet period for the window resize handler. Declaring a delay
    /// without a [`window_resize_handler`](Self::window_resize_handler) is a
    /// wiring error.
    fn resize_delay(&self) -> Option<u64> {
        None
    }

    /// Handler for window resizes, debounced by [`resize_delay`](Self::resize_delay).
    fn window_resize_handler() -> Option<Handler<Self>> {
        None
    }

    /// Named perform-methods.
    fn actions() -> ActionMap<Self> {
        ActionMap::new()
    }

    /// Fallback for actions missing from [`actions`](Self::actions).
    fn perform(
        &mut self,
        cx: &mut Cx<'_, Self>,
        action: &str,
        _args: &[Value],
    ) -> Result<(), ExtensionError> {
        Err(ExtensionError::InvalidAction {
            extension: cx.namespace().name().to_owned(),
            action: action.to_owned(),
        })
    }
}
