//! Selector engine: tokenizer, parser, matcher.
//!
//! Supports the subset extensions rely on for sub-element lookup: type,
//! universal, class, id, and attribute selectors, compound selectors,
//! descendant and child combinators, and comma-separated lists.

pub mod matcher;
pub mod model;
pub mod parser;
pub mod tokenizer;

pub use model::{Combinator, CompoundSelector, Selector, SelectorComponent, SelectorList};
pub use parser::parse_selector;

/// Errors from selector parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("invalid character '{text}' at byte {position}")]
    InvalidCharacter { position: usize, text: String },
    #[error("unexpected token at byte {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of selector: {0}")]
    UnexpectedEof(String),
}
