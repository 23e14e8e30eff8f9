//! `Cx`: the execution context handed to every component callback.

use std::cell::RefCell;
use std::fmt;
use std::rc::Weak;

use serde_json::Value;

use super::component::Component;
use super::instance::{with_instance, Instance, InstanceCore};
use super::naming::Namespace;
use super::options::Options;
use crate::dom::ElementId;
use crate::event::Event;
use crate::runtime::{Page, TimerId};

/// Page access plus the calling instance's framework state.
///
/// The component itself is passed alongside as `&mut T`; `Cx` carries
/// everything else. Deferred work scheduled through `Cx` is bound to the
/// instance and never outlives it.
pub struct Cx<'a, T> {
    /// The page the instance lives in.
    pub page: &'a mut Page,
    pub(crate) core: &'a mut InstanceCore,
    pub(crate) this: &'a Weak<RefCell<Instance<T>>>,
}

impl<'a, T> Cx<'a, T> {
    pub(crate) fn new(
        page: &'a mut Page,
        core: &'a mut InstanceCore,
        this: &'a Weak<RefCell<Instance<T>>>,
    ) -> Self {
        Self { page, core, this }
    }

    pub fn core(&self) -> &InstanceCore {
        &*self.core
    }

    pub fn id(&self) -> u64 {
        self.core.id
    }

    pub fn namespace(&self) -> &Namespace {
        &self.core.namespace
    }

    pub fn element(&self) -> Option<ElementId> {
        self.core.element
    }

    pub fn context_element(&self) -> Option<ElementId> {
        self.core.context_element
    }

    pub fn root_element(&self) -> ElementId {
        self.core.root
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.core.elements
    }

    pub fn options(&self) -> &Options {
        &self.core.options
    }

    /// Mutable options. Changes bypass `configure` and its re-selection.
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.core.options
    }

    /// See [`InstanceCore::prop`].
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.core.prop(key)
    }

    /// Re-run a shared instance's query against the current document and
    /// store the result as `elements`. No-op for single-element instances.
    pub fn requery(&mut self) -> &[ElementId] {
        if let (Some(query), Some(context)) = (&self.core.query, self.core.context_element) {
            self.core.elements = query(&self.page.dom, context);
        }
        &self.core.elements
    }

    // ── Naming ───────────────────────────────────────────────────────

    pub fn attr_name(&self, base: &str) -> String {
        self.core.namespace.attr_name(base)
    }

    pub fn class_name(&self, base: &str) -> String {
        self.core.namespace.class_name(base)
    }

    pub fn event_name(&self, base: &str) -> String {
        self.core.namespace.event_name(base)
    }

    pub fn var_name(&self, base: &str) -> String {
        self.core.namespace.var_name(base)
    }

    /// Emit a debug event tagged with the namespace and instance, if the
    /// namespace has debugging on.
    pub fn debug_log(&self, message: impl fmt::Display) {
        if self.core.namespace.debug() {
            tracing::debug!(
                namespace = %self.core.namespace,
                instance = self.core.id,
                "{message}"
            );
        }
    }

    // ── Custom events ────────────────────────────────────────────────

    /// A namespaced custom event targeting the root element.
    pub fn create_custom_event(&self, kind: &str, detail: Value) -> Event {
        Event::custom(self.event_name(kind), self.core.root, detail)
    }

    /// Build and dispatch a namespaced custom event on the root element.
    /// Returns `false` if a listener prevented the default.
    ///
    /// This instance's own handlers for the event run once the current call
    /// into the instance returns, so they never see the instance mid-update
    /// and do not count toward the returned flag.
    pub fn dispatch_custom_event(&mut self, kind: &str, detail: Value) -> bool {
        let event = self.create_custom_event(kind, detail);
        self.page.dispatch(event)
    }
}

impl<T: Component> Cx<'_, T> {
    /// Run `callback` against this instance on the next animation frame.
    pub fn request_animation_frame(
        &mut self,
        callback: impl FnOnce(&mut T, &mut Cx<'_, T>) + 'static,
    ) -> TimerId {
        let this = self.this.clone();
        self.page.request_animation_frame(move |page| {
            with_instance(&this, page, "animation frame", callback);
        })
    }
}

impl<T> fmt::Debug for Cx<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cx")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}
