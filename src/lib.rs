//! # hlf-ext
//!
//! An extension framework for interactive document behaviors.
//!
//! An [`Extension`](ext::Extension) turns a plain [`Component`](ext::Component)
//! type into a namespaced, per-element singleton: declarative options,
//! auto-bound event listeners, scoped timeouts, and lifecycle hooks, all
//! managed through one entry point per component kind.
//!
//! ## Core Systems
//!
//! - **[`ext`]**: Namespaces, option resolution, instance registry, event wiring, timeouts
//! - **[`behaviors`]**: Behaviors built on the framework (hover intent)
//! - **[`dom`]**: Slotmap-backed document arena with tree operations and queries
//! - **[`selector`]**: Selector tokenizer, parser, and matcher
//! - **[`event`]**: Events, listener registry, propagation
//! - **[`runtime`]**: Page host, virtual-clock scheduler, async driver
//! - **[`testing`]**: Headless pilot and snapshot outlines
//!
//! ## Example
//!
//! ```ignore
//! use hlf_ext::behaviors::hover_intent;
//! use hlf_ext::dom::{Dom, ElementData};
//! use hlf_ext::runtime::Page;
//!
//! let mut dom = Dom::new();
//! let card = dom.insert(ElementData::new("div").with_class("card"));
//! let mut page = Page::with_dom(dom);
//!
//! let hover = hover_intent::extension();
//! let handle = hover.attach(&mut page, card, None)?;
//! assert!(hover.get(&page, card).is_some_and(|h| h.same_instance(&handle)));
//! ```

// Host environment
pub mod dom;
pub mod event;
pub mod runtime;
pub mod selector;

// Framework
pub mod error;
pub mod ext;

// Behaviors
pub mod behaviors;

// Testing
pub mod testing;

pub use error::ExtensionError;
pub use ext::{Component, Cx, Extension, ExtensionConfig, ExtensionHandle, Namespace};
