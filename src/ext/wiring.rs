//! Event wiring: attaching an instance's declared listeners to the page.

use std::rc::Rc;

use super::component::Component;
use super::context::Cx;
use super::instance::with_instance;
use crate::error::ExtensionError;
use crate::event::{Event, EventTarget, Listener, ListenerOptions};
use crate::runtime::Page;

impl<T: Component> Cx<'_, T> {
    /// Attach every declared listener to the root element, and the debounced
    /// resize listener to the window when a resize delay is declared.
    ///
    /// Calling it while already attached is a no-op.
    pub fn add_event_listeners(&mut self) -> Result<(), ExtensionError> {
        if self.core.is_listening() {
            return Ok(());
        }
        let window_listener = match (self.core.resize_delay, self.core.resize_handler.is_some()) {
            (Some(delay), true) => Some(self.resize_listener(delay)),
            (Some(_), false) => {
                return Err(ExtensionError::MissingHandler {
                    extension: self.core.namespace.name().to_owned(),
                    event: "resize".to_owned(),
                })
            }
            (None, _) => None,
        };
        let root = EventTarget::Element(self.core.root);
        for bound in &self.core.bound {
            let id = self
                .page
                .add_listener(root, &bound.event, Rc::clone(&bound.listener), bound.options);
            self.core.listening.push(id);
        }
        if let Some(listener) = window_listener {
            let id = self
                .page
                .add_listener(EventTarget::Window, "resize", listener, ListenerOptions::passive());
            self.core.listening.push(id);
        }
        tracing::debug!(
            namespace = %self.core.namespace,
            instance = self.core.id,
            count = self.core.listening.len(),
            "listeners attached"
        );
        Ok(())
    }

    /// Detach exactly what [`add_event_listeners`](Self::add_event_listeners)
    /// attached and drop a pending resize. Safe to call when nothing is attached.
    pub fn remove_event_listeners(&mut self) {
        for id in self.core.listening.drain(..) {
            self.page.remove_listener(id);
        }
        if let Some(timer) = self.core.resize_timer.take() {
            self.page.clear_timeout(timer);
        }
    }

    pub fn toggle_event_listeners(&mut self, on: bool) -> Result<(), ExtensionError> {
        if on {
            self.add_event_listeners()
        } else {
            self.remove_event_listeners();
            Ok(())
        }
    }

    /// Trailing-edge debounce: each resize restarts the quiet period, and the
    /// handler sees the last resize event once it elapses.
    fn resize_listener(&self, delay: u64) -> Listener {
        let this = self.this.clone();
        Rc::new(move |page: &mut Page, event: &Event| {
            with_instance(&this, page, "resize", |_, cx| {
                if let Some(previous) = cx.core.resize_timer.take() {
                    cx.page.clear_timeout(previous);
                }
                let Some(handler) = cx.core.resize_handler.clone() else {
                    return;
                };
                let event = event.clone();
                let timer = cx.page.set_timeout(delay, move |page| handler(page, &event));
                tracing::trace!(%timer, delay, "resize deferred");
                cx.core.resize_timer = Some(timer);
            });
        })
    }
}
