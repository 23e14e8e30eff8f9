//! The extension framework.
//!
//! An [`Extension`] turns a [`Component`] type into a namespaced,
//! per-element singleton: attaching it to an element creates (or returns)
//! the one instance for that element, with resolved options, pre-bound
//! listeners, scoped timeouts, and lifecycle hooks.

pub mod component;
pub mod config;
pub mod context;
pub mod css;
pub mod extension;
pub mod instance;
pub mod naming;
pub mod options;
pub mod registry;
pub mod select;
pub mod timeout;
pub mod wiring;

pub use component::{Action, ActionMap, Component, EventListenerMap, Handler, ListenerSpec, Method, Setup};
pub use config::{ExtensionConfig, MethodGroup};
pub use context::Cx;
pub use extension::{Extension, ExtensionHandle, Subject};
pub use instance::{BoundListener, Instance, InstanceCore, InstanceRef, QueryFn};
pub use naming::Namespace;
pub use options::Options;
pub use select::{LiveQuery, Selection};
