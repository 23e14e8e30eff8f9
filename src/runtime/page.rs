//! Page: the document, its listeners, the window, and the timer queue.
//!
//! [`Page`] is the single-threaded host every extension runs in. All
//! framework operations take `&mut Page`; deferred work goes through the
//! scheduler and runs when the page is advanced.

use std::collections::VecDeque;
use std::fmt;

use crate::dom::Dom;
use crate::event::{propagation_path, Event, EventTarget, Listener, ListenerId, ListenerOptions, ListenerRegistry};

use super::scheduler::{Scheduler, TimerId};

// ---------------------------------------------------------------------------
// WindowSize
// ---------------------------------------------------------------------------

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

// ---------------------------------------------------------------------------
// Deferred
// ---------------------------------------------------------------------------

type DeferredCall = Box<dyn FnOnce(&mut Page)>;

/// Calls postponed until no instance is running.
#[derive(Default)]
struct Deferred(VecDeque<DeferredCall>);

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").field("len", &self.0.len()).finish()
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// The host environment: document, event listeners, window, and timers.
#[derive(Debug, Default)]
pub struct Page {
    /// The document tree.
    pub dom: Dom,
    listeners: ListenerRegistry,
    scheduler: Scheduler,
    window: WindowSize,
    deferred: Deferred,
    running: usize,
}

impl Page {
    /// Create a page with an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a page around an existing document.
    pub fn with_dom(dom: Dom) -> Self {
        Self {
            dom,
            ..Self::default()
        }
    }

    // ── Listeners ────────────────────────────────────────────────────

    /// Attach a listener for `kind` events on `target`.
    pub fn add_listener(
        &mut self,
        target: EventTarget,
        kind: &str,
        listener: Listener,
        options: ListenerOptions,
    ) -> ListenerId {
        self.listeners.add(target, kind, listener, options)
    }

    /// Detach a listener. Safe to call more than once.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Whether the listener is attached.
    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.contains(id)
    }

    /// Number of listeners for `kind` on `target`.
    pub fn listener_count(&self, target: EventTarget, kind: &str) -> usize {
        self.listeners.count_for(target, kind)
    }

    /// Dispatch an event synchronously along its propagation path.
    ///
    /// Listeners removed by an earlier listener during the same dispatch are
    /// skipped. Returns `false` if a non-passive listener prevented the default.
    pub fn dispatch(&mut self, event: Event) -> bool {
        let path = propagation_path(&self.dom, event.target, event.bubbles);
        for node in path {
            for (id, listener, options) in self.listeners.snapshot(node, &event.kind) {
                if !self.listeners.contains(id) {
                    continue;
                }
                event.enter_listener(node, options.passive);
                listener(self, &event);
            }
        }
        event.leave_dispatch();
        !event.default_prevented()
    }

    // ── Instance delivery ────────────────────────────────────────────

    /// Mark an instance as running. Deferred calls wait until every running
    /// instance has returned.
    pub(crate) fn enter_instance(&mut self) {
        self.running += 1;
    }

    pub(crate) fn leave_instance(&mut self) {
        self.running = self.running.saturating_sub(1);
    }

    /// Whether some instance is running further up the stack.
    pub(crate) fn instance_running(&self) -> bool {
        self.running > 0
    }

    /// Queue `call` for the next [`flush_deferred`](Self::flush_deferred)
    /// outside any running instance.
    pub(crate) fn defer(&mut self, call: impl FnOnce(&mut Page) + 'static) {
        self.deferred.0.push_back(Box::new(call));
    }

    /// Run queued calls in order, including any they queue. A no-op while an
    /// instance is running.
    pub(crate) fn flush_deferred(&mut self) {
        if self.instance_running() {
            return;
        }
        while let Some(call) = self.deferred.0.pop_front() {
            call(self);
        }
    }

    // ── Window ───────────────────────────────────────────────────────

    /// Current viewport size.
    pub fn window_size(&self) -> WindowSize {
        self.window
    }

    /// Resize the viewport and dispatch `resize` on the window.
    pub fn resize_window(&mut self, width: u32, height: u32) {
        self.window = WindowSize { width, height };
        self.dispatch(Event::new("resize", EventTarget::Window));
    }

    // ── Timers ───────────────────────────────────────────────────────

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    /// Run `callback` after `delay_ms` of page time.
    pub fn set_timeout(
        &mut self,
        delay_ms: u64,
        callback: impl FnOnce(&mut Page) + 'static,
    ) -> TimerId {
        self.scheduler.set_timeout(delay_ms, Box::new(callback))
    }

    /// Cancel a pending timeout. Unknown, fired, or canceled ids are a no-op.
    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.scheduler.clear(id)
    }

    /// Whether the timer has neither fired nor been canceled.
    pub fn timer_pending(&self, id: TimerId) -> bool {
        self.scheduler.is_pending(id)
    }

    /// Run `callback` on the next animation frame.
    pub fn request_animation_frame(&mut self, callback: impl FnOnce(&mut Page) + 'static) -> TimerId {
        self.scheduler.request_animation_frame(Box::new(callback))
    }

    /// Due time of the earliest pending callback.
    pub fn next_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    /// Number of pending timers and frames.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Advance page time by `ms`, firing every callback that falls due, in
    /// due order. Callbacks scheduled while advancing fire too if they fall
    /// inside the window. Returns the number of callbacks fired.
    pub fn advance(&mut self, ms: u64) -> usize {
        let until = self.now().saturating_add(ms);
        self.advance_to(until)
    }

    /// Advance page time to the absolute time `until`.
    pub fn advance_to(&mut self, until: u64) -> usize {
        let mut fired = 0;
        while let Some((id, callback)) = self.scheduler.pop_due(until) {
            tracing::trace!(timer = %id, now = self.now(), "timer fired");
            callback(self);
            fired += 1;
        }
        self.scheduler.set_now(until);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementData;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, label: &str) -> Listener {
        let log = Rc::clone(log);
        let label = label.to_owned();
        Rc::new(move |_: &mut Page, event: &Event| {
            log.borrow_mut().push(format!("{label}:{}", event.kind));
        })
    }

    #[test]
    fn dispatch_bubbles_through_ancestors() {
        let mut page = Page::new();
        let root = page.dom.insert(ElementData::new("body"));
        let child = page.dom.insert_child(root, ElementData::new("div"));
        let log = Rc::new(RefCell::new(Vec::new()));
        page.add_listener(root.into(), "mouseover", recorder(&log, "root"), ListenerOptions::default());
        page.add_listener(child.into(), "mouseover", recorder(&log, "child"), ListenerOptions::default());

        page.dispatch(Event::new("mouseover", child).bubbling(true));
        assert_eq!(*log.borrow(), vec!["child:mouseover", "root:mouseover"]);

        log.borrow_mut().clear();
        page.dispatch(Event::new("mouseover", child));
        assert_eq!(*log.borrow(), vec!["child:mouseover"]);
    }

    #[test]
    fn listener_removed_mid_dispatch_is_skipped() {
        let mut page = Page::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let second: Rc<RefCell<Option<ListenerId>>> = Rc::new(RefCell::new(None));
        let second_c = Rc::clone(&second);
        page.add_listener(
            EventTarget::Window,
            "resize",
            Rc::new(move |page: &mut Page, _: &Event| {
                if let Some(id) = *second_c.borrow() {
                    page.remove_listener(id);
                }
            }),
            ListenerOptions::default(),
        );
        let id = page.add_listener(
            EventTarget::Window,
            "resize",
            recorder(&log, "second"),
            ListenerOptions::default(),
        );
        *second.borrow_mut() = Some(id);
        page.resize_window(800, 600);
        assert!(log.borrow().is_empty());
        assert_eq!(page.window_size(), WindowSize { width: 800, height: 600 });
    }

    #[test]
    fn passive_listener_cannot_cancel() {
        let mut page = Page::new();
        let el = page.dom.insert(ElementData::new("div"));
        page.add_listener(
            el.into(),
            "mousemove",
            Rc::new(|_: &mut Page, event: &Event| event.prevent_default()),
            ListenerOptions::passive(),
        );
        assert!(page.dispatch(Event::new("mousemove", el)));
        page.add_listener(
            el.into(),
            "mousemove",
            Rc::new(|_: &mut Page, event: &Event| event.prevent_default()),
            ListenerOptions::default(),
        );
        assert!(!page.dispatch(Event::new("mousemove", el)));
    }

    #[test]
    fn advance_fires_due_timers_in_order() {
        let mut page = Page::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (delay, label) in [(30, "b"), (10, "a"), (100, "c")] {
            let log = Rc::clone(&log);
            page.set_timeout(delay, move |page| log.borrow_mut().push((label, page.now())));
        }
        assert_eq!(page.advance(50), 2);
        assert_eq!(*log.borrow(), vec![("a", 10), ("b", 30)]);
        assert_eq!(page.now(), 50);
        assert_eq!(page.pending_timers(), 1);
    }

    #[test]
    fn timers_scheduled_while_advancing_fire_in_window() {
        let mut page = Page::new();
        let fired = Rc::new(RefCell::new(0));
        let fired_c = Rc::clone(&fired);
        page.set_timeout(10, move |page| {
            page.set_timeout(10, move |_| *fired_c.borrow_mut() += 1);
        });
        assert_eq!(page.advance(20), 2);
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn deferred_calls_wait_for_running_instances() {
        let mut page = Page::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        page.enter_instance();
        for label in ["first", "second"] {
            let log = Rc::clone(&log);
            page.defer(move |page| {
                log.borrow_mut().push(label);
                if label == "first" {
                    let log = Rc::clone(&log);
                    page.defer(move |_| log.borrow_mut().push("queued by first"));
                }
            });
        }
        page.flush_deferred();
        assert!(log.borrow().is_empty());

        page.leave_instance();
        page.flush_deferred();
        assert_eq!(*log.borrow(), vec!["first", "second", "queued by first"]);
    }

    #[test]
    fn cleared_timeout_never_fires() {
        let mut page = Page::new();
        let fired = Rc::new(RefCell::new(false));
        let fired_c = Rc::clone(&fired);
        let id = page.set_timeout(10, move |_| *fired_c.borrow_mut() = true);
        assert!(page.timer_pending(id));
        assert!(page.clear_timeout(id));
        assert!(!page.clear_timeout(id));
        page.advance(100);
        assert!(!*fired.borrow());
    }
}
