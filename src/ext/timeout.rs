//! Scoped timeouts: timers keyed by a name on the instance, or by a
//! namespaced attribute on an element.
//!
//! A key holds at most one timer. Setting a key cancels its previous timer;
//! a `None` delay only cancels. The key is cleared once the callback has run,
//! unless the callback re-armed it.

use std::str::FromStr;

use super::component::Component;
use super::context::Cx;
use super::instance::with_instance;
use crate::dom::ElementId;
use crate::runtime::TimerId;

impl<T: Component> Cx<'_, T> {
    /// Start (or with `None`, cancel) the timeout stored under `name`.
    pub fn set_timeout(
        &mut self,
        name: &str,
        delay: Option<u64>,
        callback: impl FnOnce(&mut T, &mut Cx<'_, T>) + 'static,
    ) {
        self.clear_timeout(name);
        let Some(delay) = delay else {
            return;
        };
        let this = self.this.clone();
        let key = name.to_owned();
        let timer = self.page.set_timeout(delay, move |page| {
            with_instance(&this, page, &key, |component, cx| {
                callback(component, cx);
                let fired = cx.core.timeouts.get(&key).is_some_and(|&t| !cx.page.timer_pending(t));
                if fired {
                    cx.core.timeouts.remove(&key);
                }
            });
        });
        tracing::trace!(name, %timer, delay, "timeout set");
        self.core.timeouts.insert(name.to_owned(), timer);
    }

    /// Cancel the timeout stored under `name`. Returns whether one was pending.
    pub fn clear_timeout(&mut self, name: &str) -> bool {
        match self.core.timeouts.remove(name) {
            Some(timer) => self.page.clear_timeout(timer),
            None => false,
        }
    }

    /// Whether a timeout is stored under `name`. Stays true while its
    /// callback runs.
    pub fn has_timeout(&self, name: &str) -> bool {
        self.core.has_timeout(name)
    }

    /// Like [`set_timeout`](Self::set_timeout), keyed by the attribute
    /// `data-<prefix>-<suffix>` on `element`. The attribute is present
    /// exactly while the timeout is stored.
    pub fn set_element_timeout(
        &mut self,
        element: ElementId,
        suffix: &str,
        delay: Option<u64>,
        callback: impl FnOnce(&mut T, &mut Cx<'_, T>) + 'static,
    ) {
        let attr = self.attr_name(suffix);
        self.clear_element_timeout(element, suffix);
        let Some(delay) = delay else {
            return;
        };
        if !self.page.dom.contains_node(element) {
            tracing::warn!(?element, %attr, "element timeout on a detached element, skipping");
            return;
        }
        let this = self.this.clone();
        let key = (element, suffix.to_owned());
        let timer = self.page.set_timeout(delay, {
            let attr = attr.clone();
            move |page| {
                with_instance(&this, page, &attr, |component, cx| {
                    callback(component, cx);
                    let stored = cx.page.dom.attr(element, &attr).and_then(|v| TimerId::from_str(v).ok());
                    if stored.is_some_and(|t| !cx.page.timer_pending(t)) {
                        if let Some(data) = cx.page.dom.get_mut(element) {
                            data.remove_attr(&attr);
                        }
                        cx.core.element_timeouts.remove(&key);
                    }
                });
            }
        });
        if let Some(data) = self.page.dom.get_mut(element) {
            data.set_attr(attr, timer.to_string());
        }
        self.core.element_timeouts.insert((element, suffix.to_owned()), timer);
    }

    /// Cancel the element timeout `data-<prefix>-<suffix>` on `element` and
    /// remove the attribute. Returns whether one was pending.
    pub fn clear_element_timeout(&mut self, element: ElementId, suffix: &str) -> bool {
        let attr = self.attr_name(suffix);
        let stored = self
            .page
            .dom
            .get_mut(element)
            .and_then(|data| data.remove_attr(&attr))
            .and_then(|value| TimerId::from_str(&value).ok());
        self.core.element_timeouts.remove(&(element, suffix.to_owned()));
        stored.is_some_and(|timer| self.page.clear_timeout(timer))
    }

    /// Cancel every timeout this instance owns.
    pub(crate) fn clear_all_timeouts(&mut self) {
        for (_, timer) in self.core.timeouts.drain() {
            self.page.clear_timeout(timer);
        }
        let keyed: Vec<_> = self.core.element_timeouts.keys().cloned().collect();
        for (element, suffix) in keyed {
            self.clear_element_timeout(element, &suffix);
        }
    }
}
