//! Listener registry: (target, type) → ordered listeners.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::dom_event::{Event, EventTarget};
use crate::runtime::Page;

/// A listener callback. Receives the page so handlers can mutate the
/// document, dispatch further events, and schedule timers.
pub type Listener = Rc<dyn Fn(&mut Page, &Event)>;

/// Handle returned by [`ListenerRegistry::add`], used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Per-listener flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    /// Passive listeners cannot cancel the default action.
    pub passive: bool,
}

impl ListenerOptions {
    /// Options for a passive listener.
    pub fn passive() -> Self {
        Self { passive: true }
    }
}

struct Entry {
    id: ListenerId,
    listener: Listener,
    options: ListenerOptions,
}

/// Registry of every attached listener in a page.
///
/// Listeners for the same target and type run in registration order.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    entries: HashMap<(EventTarget, String), Vec<Entry>>,
    index: HashMap<ListenerId, (EventTarget, String)>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener.
    pub fn add(
        &mut self,
        target: EventTarget,
        kind: &str,
        listener: Listener,
        options: ListenerOptions,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        let key = (target, kind.to_owned());
        self.entries
            .entry(key.clone())
            .or_default()
            .push(Entry { id, listener, options });
        self.index.insert(id, key);
        id
    }

    /// Detach a listener. Unknown or already-removed ids are a no-op.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let Some(key) = self.index.remove(&id) else {
            return false;
        };
        if let Some(list) = self.entries.get_mut(&key) {
            list.retain(|entry| entry.id != id);
            if list.is_empty() {
                self.entries.remove(&key);
            }
        }
        true
    }

    /// Whether the listener is still attached.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.index.contains_key(&id)
    }

    /// Snapshot of the listeners for a target and type, in registration order.
    pub fn snapshot(
        &self,
        target: EventTarget,
        kind: &str,
    ) -> Vec<(ListenerId, Listener, ListenerOptions)> {
        self.entries
            .get(&(target, kind.to_owned()))
            .map(|list| {
                list.iter()
                    .map(|e| (e.id, Rc::clone(&e.listener), e.options))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of listeners for a target and type.
    pub fn count_for(&self, target: EventTarget, kind: &str) -> usize {
        self.entries
            .get(&(target, kind.to_owned()))
            .map_or(0, Vec::len)
    }

    /// Total number of attached listeners.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether no listeners are attached.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.index.len())
            .finish()
    }
}
