//! Event system: DOM events, listener registry, propagation.

pub mod dom_event;
pub mod listener;
pub mod propagation;

pub use dom_event::{Event, EventTarget, Pointer};
pub use listener::{Listener, ListenerId, ListenerOptions, ListenerRegistry};
pub use propagation::propagation_path;
