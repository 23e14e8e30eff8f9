//! DOM events: targets, pointer coordinates, detail payloads.
//!
//! [`Event`] mirrors the subset of the platform event model extensions rely
//! on: a type name, a target, an optional related target and pointer
//! position, and an arbitrary JSON `detail` for custom events.

use std::cell::Cell;

use serde_json::Value;

use crate::dom::ElementId;

// ---------------------------------------------------------------------------
// EventTarget
// ---------------------------------------------------------------------------

/// Where an event is dispatched or a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The global window (resize events).
    Window,
    /// A document element.
    Element(ElementId),
}

impl EventTarget {
    /// The element, if this target is one.
    pub fn element(self) -> Option<ElementId> {
        match self {
            Self::Element(id) => Some(id),
            Self::Window => None,
        }
    }
}

impl From<ElementId> for EventTarget {
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}

// ---------------------------------------------------------------------------
// Pointer
// ---------------------------------------------------------------------------

/// Pointer coordinates carried by mouse events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
    pub client_x: f64,
    pub client_y: f64,
    pub page_x: f64,
    pub page_y: f64,
}

impl Pointer {
    /// Pointer at a page position, with client coordinates equal to page
    /// coordinates (unscrolled page).
    pub fn at(page_x: f64, page_y: f64) -> Self {
        Self {
            client_x: page_x,
            client_y: page_y,
            page_x,
            page_y,
        }
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A dispatched event.
#[derive(Debug, Clone)]
pub struct Event {
    /// Event type, e.g. `"mouseover"` or a namespaced custom type like `"sesomeevent"`.
    pub kind: String,
    /// The original target.
    pub target: EventTarget,
    /// Secondary element for pointer transitions (`mouseover` / `mouseout`).
    pub related_target: Option<ElementId>,
    /// Pointer position, for mouse events.
    pub pointer: Option<Pointer>,
    /// Arbitrary payload, `Value::Null` when absent.
    pub detail: Value,
    /// Whether dispatch continues up the ancestor chain.
    pub bubbles: bool,
    current_target: Cell<Option<EventTarget>>,
    default_prevented: Cell<bool>,
    in_passive_listener: Cell<bool>,
}

impl Event {
    /// A plain, non-bubbling event.
    pub fn new(kind: impl Into<String>, target: impl Into<EventTarget>) -> Self {
        Self {
            kind: kind.into(),
            target: target.into(),
            related_target: None,
            pointer: None,
            detail: Value::Null,
            bubbles: false,
            current_target: Cell::new(None),
            default_prevented: Cell::new(false),
            in_passive_listener: Cell::new(false),
        }
    }

    /// A custom event carrying `detail`. Does not bubble unless enabled with
    /// [`bubbling`](Self::bubbling).
    pub fn custom(kind: impl Into<String>, target: impl Into<EventTarget>, detail: Value) -> Self {
        Self {
            detail,
            ..Self::new(kind, target)
        }
    }

    /// A bubbling mouse event at `pointer`.
    pub fn mouse(
        kind: impl Into<String>,
        target: ElementId,
        pointer: Pointer,
        related_target: Option<ElementId>,
    ) -> Self {
        Self {
            pointer: Some(pointer),
            related_target,
            bubbles: true,
            ..Self::new(kind, target)
        }
    }

    /// Enable or disable bubbling (builder).
    pub fn bubbling(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    /// Set the related target (builder).
    pub fn with_related_target(mut self, related: Option<ElementId>) -> Self {
        self.related_target = related;
        self
    }

    /// The target element, if the event was dispatched on one.
    pub fn target_element(&self) -> Option<ElementId> {
        self.target.element()
    }

    /// The node whose listeners are currently running.
    pub fn current_target(&self) -> Option<EventTarget> {
        self.current_target.get()
    }

    /// Request that the default action be skipped. Ignored inside passive listeners.
    pub fn prevent_default(&self) {
        if !self.in_passive_listener.get() {
            self.default_prevented.set(true);
        }
    }

    /// Whether a non-passive listener called [`prevent_default`](Self::prevent_default).
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub(crate) fn enter_listener(&self, current: EventTarget, passive: bool) {
        self.current_target.set(Some(current));
        self.in_passive_listener.set(passive);
    }

    pub(crate) fn leave_dispatch(&self) {
        self.current_target.set(None);
        self.in_passive_listener.set(false);
    }
}
