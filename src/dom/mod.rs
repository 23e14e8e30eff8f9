//! Document arena: slotmap-backed element tree with selector queries.

pub mod node;
pub mod query;
pub mod tree;

pub use node::{ElementData, ElementId};
pub use tree::Dom;
