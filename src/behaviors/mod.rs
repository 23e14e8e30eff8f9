//! Behaviors built on the extension framework.

pub mod hover_intent;

pub use hover_intent::HoverIntent;
