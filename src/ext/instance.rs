//! Instances: one live component bound to one root element.
//!
//! An [`Instance`] pairs the component value with its framework-owned
//! [`InstanceCore`]. Instances live in `Rc<RefCell<..>>` cells owned by the
//! extension's registry; every closure the framework hands to the page
//! (listeners, timers, animation frames) holds only a [`Weak`] reference, so
//! removing an instance makes all of its pending work inert.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use super::component::{Component, EventListenerMap, Handler, Method};
use super::config::ExtensionConfig;
use super::context::Cx;
use super::naming::Namespace;
use super::options::Options;
use super::select::Selection;
use crate::dom::{Dom, ElementId};
use crate::event::{Event, Listener, ListenerId, ListenerOptions};
use crate::runtime::{Page, TimerId};

/// Query function retained by shared instances: `(dom, context) → elements`.
pub type QueryFn = Rc<dyn Fn(&Dom, ElementId) -> Vec<ElementId>>;

/// Shared, registry-owned instance cell.
pub type InstanceRef<T> = Rc<RefCell<Instance<T>>>;

/// Option keys readable through [`InstanceCore::prop`] even without compaction.
pub(crate) const ALWAYS_COMPACTED: [&str; 2] = ["classNames", "selectors"];

// ---------------------------------------------------------------------------
// BoundListener
// ---------------------------------------------------------------------------

/// A declared handler pre-bound to its instance.
#[derive(Clone)]
pub struct BoundListener {
    pub event: String,
    pub listener: Listener,
    pub options: ListenerOptions,
}

impl fmt::Debug for BoundListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundListener")
            .field("event", &self.event)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// InstanceCore
// ---------------------------------------------------------------------------

/// Framework-owned state of an instance.
pub struct InstanceCore {
    pub(crate) id: u64,
    pub(crate) namespace: Rc<Namespace>,
    pub(crate) config: Rc<ExtensionConfig>,
    pub(crate) element: Option<ElementId>,
    pub(crate) context_element: Option<ElementId>,
    pub(crate) root: ElementId,
    pub(crate) elements: Vec<ElementId>,
    pub(crate) query: Option<QueryFn>,
    pub(crate) options: Options,
    pub(crate) selections: BTreeMap<String, Selection>,
    pub(crate) bound: Vec<BoundListener>,
    pub(crate) resize_delay: Option<u64>,
    pub(crate) resize_handler: Option<Listener>,
    pub(crate) resize_timer: Option<TimerId>,
    pub(crate) listening: Vec<ListenerId>,
    pub(crate) timeouts: HashMap<String, TimerId>,
    pub(crate) element_timeouts: HashMap<(ElementId, String), TimerId>,
    pub(crate) removed: bool,
}

impl InstanceCore {
    pub(crate) fn new(
        id: u64,
        namespace: Rc<Namespace>,
        config: Rc<ExtensionConfig>,
        element: Option<ElementId>,
        context_element: Option<ElementId>,
        root: ElementId,
        options: Options,
    ) -> Self {
        Self {
            id,
            namespace,
            config,
            element,
            context_element,
            root,
            elements: Vec::new(),
            query: None,
            options,
            selections: BTreeMap::new(),
            bound: Vec::new(),
            resize_delay: None,
            resize_handler: None,
            resize_timer: None,
            listening: Vec::new(),
            timeouts: HashMap::new(),
            element_timeouts: HashMap::new(),
            removed: false,
        }
    }

    /// Registry id, also stored in the root element's instance-id attribute.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    /// The element a single-element instance is attached to.
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    /// The context element of a shared instance.
    pub fn context_element(&self) -> Option<ElementId> {
        self.context_element
    }

    /// The context element if there is one, otherwise the element.
    pub fn root_element(&self) -> ElementId {
        self.root
    }

    /// Elements matched by a shared instance's query. Empty otherwise.
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    /// The retained query of a shared instance.
    pub fn query(&self) -> Option<&QueryFn> {
        self.query.as_ref()
    }

    /// The merged options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Read view over the top-level options. Every key is readable when the
    /// extension compacts options; `classNames` and `selectors` always are.
    pub fn prop(&self, key: &str) -> Option<&Value> {
        if self.config.compact_options || ALWAYS_COMPACTED.contains(&key) {
            self.options.get(key)
        } else {
            None
        }
    }

    /// Whether the instance has been removed.
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Whether declared listeners are currently attached.
    pub fn is_listening(&self) -> bool {
        !self.listening.is_empty()
    }

    /// Whether a named timeout is stored (pending, or currently firing).
    pub fn has_timeout(&self, name: &str) -> bool {
        self.timeouts.contains_key(name)
    }

    pub(crate) fn selection(&self, key: &str) -> Option<&Selection> {
        self.selections.get(key)
    }
}

impl fmt::Debug for InstanceCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceCore")
            .field("id", &self.id)
            .field("namespace", &self.namespace.name())
            .field("element", &self.element)
            .field("context_element", &self.context_element)
            .field("elements", &self.elements)
            .field("options", &self.options)
            .field("selections", &self.selections)
            .field("listening", &self.listening.len())
            .field("timeouts", &self.timeouts)
            .field("removed", &self.removed)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Instance
// ---------------------------------------------------------------------------

/// A component value and its framework state.
pub struct Instance<T> {
    pub(crate) core: InstanceCore,
    pub(crate) component: T,
    pub(crate) this: Weak<RefCell<Instance<T>>>,
}

impl<T: Component> Instance<T> {
    /// Build the instance cell, pre-binding the declared listeners and the
    /// resize handler to it.
    pub(crate) fn new_cell(
        mut core: InstanceCore,
        component: T,
        listeners: &EventListenerMap<T>,
    ) -> InstanceRef<T> {
        Rc::new_cyclic(|this: &Weak<RefCell<Instance<T>>>| {
            core.bound = listeners
                .iter()
                .map(|(event, spec)| BoundListener {
                    event: event.to_owned(),
                    listener: bind_handler(this.clone(), spec.handler),
                    options: ListenerOptions { passive: spec.passive },
                })
                .collect();
            core.resize_delay = component.resize_delay();
            core.resize_handler =
                T::window_resize_handler().map(|handler| bind_handler(this.clone(), handler));
            RefCell::new(Instance {
                core,
                component,
                this: this.clone(),
            })
        })
    }

    /// Run `f` against the component with a fresh context.
    pub(crate) fn run<R>(
        &mut self,
        page: &mut Page,
        f: impl FnOnce(&mut T, &mut Cx<'_, T>) -> R,
    ) -> R {
        let Instance { core, component, this } = self;
        page.enter_instance();
        let result = f(component, &mut Cx::new(page, core, this));
        page.leave_instance();
        result
    }

    /// The pre-bound listener for `event`. Only exposed when the extension
    /// auto-binds.
    pub fn bound_listener(&self, event: &str) -> Option<Listener> {
        if !self.core.config.auto_bind {
            return None;
        }
        self.core
            .bound
            .iter()
            .find(|bound| bound.event == event)
            .map(|bound| Rc::clone(&bound.listener))
    }
}

impl<T> Instance<T> {
    pub fn component(&self) -> &T {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut T {
        &mut self.component
    }

    pub fn core(&self) -> &InstanceCore {
        &self.core
    }

    pub fn id(&self) -> u64 {
        self.core.id
    }

    pub fn element(&self) -> Option<ElementId> {
        self.core.element
    }

    pub fn context_element(&self) -> Option<ElementId> {
        self.core.context_element
    }

    pub fn root_element(&self) -> ElementId {
        self.core.root_element()
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.core.elements
    }

    pub fn options(&self) -> &Options {
        &self.core.options
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.core.prop(key)
    }
}

impl<T: fmt::Debug> fmt::Debug for Instance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("core", &self.core)
            .field("component", &self.component)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Delivery
// ---------------------------------------------------------------------------

/// Run `f` on a live, unborrowed instance, then flush calls deferred while it
/// ran. Dropped instances are skipped silently; a borrowed one is logged and
/// skipped.
pub(crate) fn with_instance<T: Component, R>(
    this: &Weak<RefCell<Instance<T>>>,
    page: &mut Page,
    what: &str,
    f: impl FnOnce(&mut T, &mut Cx<'_, T>) -> R,
) -> Option<R> {
    let Some(cell) = this.upgrade() else {
        tracing::trace!(what, "instance dropped, skipping");
        return None;
    };
    let Ok(mut instance) = cell.try_borrow_mut() else {
        tracing::warn!(what, "instance is already borrowed, skipping re-entrant delivery");
        return None;
    };
    if instance.core.removed {
        return None;
    }
    let result = instance.run(page, f);
    drop(instance);
    page.flush_deferred();
    Some(result)
}

/// Whether the instance is the one running further up the stack, so an
/// event it dispatched has reached its own listeners.
fn is_running<T: Component>(this: &Weak<RefCell<Instance<T>>>, page: &Page) -> bool {
    page.instance_running()
        && this.upgrade().is_some_and(|cell| {
            let borrowed = cell.try_borrow_mut().is_err();
            borrowed
        })
}

/// Bind a handler to an instance as a page listener.
///
/// A handler reached while its own instance is running runs right after the
/// instance returns, with a copy of the event. It cannot affect that
/// dispatch's default-prevented result.
pub(crate) fn bind_handler<T: Component>(
    this: Weak<RefCell<Instance<T>>>,
    handler: Handler<T>,
) -> Listener {
    Rc::new(move |page: &mut Page, event: &Event| {
        if is_running(&this, page) {
            tracing::trace!(event = %event.kind, "instance is running, deferring handler");
            let this = this.clone();
            let event = event.clone();
            page.defer(move |page| {
                with_instance(&this, page, &event.kind, |component, cx| handler(component, cx, &event));
            });
            return;
        }
        with_instance(&this, page, &event.kind, |component, cx| handler(component, cx, event));
    })
}

/// Bind an argument-less method to an instance.
pub(crate) fn bind_method<T: Component>(
    this: Weak<RefCell<Instance<T>>>,
    method: Method<T>,
) -> Rc<dyn Fn(&mut Page)> {
    Rc::new(move |page: &mut Page| {
        if is_running(&this, page) {
            let this = this.clone();
            page.defer(move |page| {
                with_instance(&this, page, "method", |component, cx| method(component, cx));
            });
            return;
        }
        with_instance(&this, page, "method", |component, cx| method(component, cx));
    })
}
