//! Pilot: programmatic pointer, window, and clock input for a headless page.
//!
//! The `Pilot` owns a [`Page`] and simulates the event sequences a browser
//! would produce: moving the pointer between elements emits paired
//! `mouseout` / `mouseover` events with related targets, moving within an
//! element emits `mousemove`. Time only passes when the pilot advances it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::{Dom, ElementId};
use crate::event::{Event, EventTarget, ListenerId, ListenerOptions, Pointer};
use crate::runtime::{Page, FRAME_INTERVAL_MS};

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless page driver for testing.
///
/// # Examples
///
/// ```ignore
/// use hlf_ext::testing::Pilot;
///
/// let mut pilot = Pilot::new(dom);
/// pilot.hover(box_element, 10.0, 10.0);
/// pilot.advance(300);
/// pilot.leave(500.0, 500.0);
/// ```
#[derive(Debug, Default)]
pub struct Pilot {
    page: Page,
    hovered: Option<ElementId>,
    pointer: Pointer,
}

impl Pilot {
    /// Drive a page built around `dom`.
    pub fn new(dom: Dom) -> Self {
        Self::with_page(Page::with_dom(dom))
    }

    /// Drive an existing page.
    pub fn with_page(page: Page) -> Self {
        Self {
            page,
            hovered: None,
            pointer: Pointer::default(),
        }
    }

    // ── Pointer ──────────────────────────────────────────────────────

    /// Move the pointer onto `element` at a page position. Leaving the
    /// previously hovered element emits `mouseout` first.
    pub fn hover(&mut self, element: ElementId, x: f64, y: f64) {
        let pointer = Pointer::at(x, y);
        let previous = self.hovered;
        if previous == Some(element) {
            self.move_to(x, y);
            return;
        }
        if let Some(previous) = previous {
            self.page
                .dispatch(Event::mouse("mouseout", previous, pointer, Some(element)));
        }
        self.hovered = Some(element);
        self.pointer = pointer;
        self.page
            .dispatch(Event::mouse("mouseover", element, pointer, previous));
    }

    /// Move the pointer within the hovered element.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.pointer = Pointer::at(x, y);
        if let Some(element) = self.hovered {
            self.page
                .dispatch(Event::mouse("mousemove", element, self.pointer, None));
        }
    }

    /// Move the pointer off the hovered element to nowhere in the document.
    pub fn leave(&mut self, x: f64, y: f64) {
        self.pointer = Pointer::at(x, y);
        if let Some(element) = self.hovered.take() {
            self.page
                .dispatch(Event::mouse("mouseout", element, self.pointer, None));
        }
    }

    /// The element under the pointer.
    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    // ── Window ───────────────────────────────────────────────────────

    /// Resize the window, dispatching `resize`.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.page.resize_window(width, height);
    }

    // ── Clock ────────────────────────────────────────────────────────

    /// Advance page time, firing due timers. Returns how many fired.
    pub fn advance(&mut self, ms: u64) -> usize {
        self.page.advance(ms)
    }

    /// Advance through `frames` animation frames.
    pub fn advance_frames(&mut self, frames: u64) -> usize {
        self.page.advance(frames * FRAME_INTERVAL_MS)
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Record every `kind` event reaching `target`.
    pub fn record(&mut self, target: impl Into<EventTarget>, kind: &str) -> Recorder {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let id = self.page.add_listener(
            target.into(),
            kind,
            Rc::new(move |_: &mut Page, event: &Event| sink.borrow_mut().push(event.clone())),
            ListenerOptions::passive(),
        );
        Recorder { id, events }
    }

    // ── Access ───────────────────────────────────────────────────────

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn dom(&self) -> &Dom {
        &self.page.dom
    }

    pub fn into_page(self) -> Page {
        self.page
    }
}

// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

/// Events captured by [`Pilot::record`].
#[derive(Debug, Clone)]
pub struct Recorder {
    id: ListenerId,
    events: Rc<RefCell<Vec<Event>>>,
}

impl Recorder {
    pub fn count(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn last(&self) -> Option<Event> {
        self.events.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// The listener backing this recorder.
    pub fn listener_id(&self) -> ListenerId {
        self.id
    }
}

// ===========================================================================
// Tests
// ===========================================================================
