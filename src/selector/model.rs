//! Selector AST: components, compounds, combinators, lists.

/// A single simple selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorComponent {
    /// Type selector: matches the tag name (e.g. `div`).
    Type(String),
    /// Universal selector: `*`.
    Universal,
    /// Class selector: `.classname`.
    Class(String),
    /// ID selector: `#id`.
    Id(String),
    /// Attribute selector: `[name]` or `[name="value"]`.
    Attribute { name: String, value: Option<String> },
}

/// A combinator between compound selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant combinator (whitespace): `A B`.
    Descendant,
    /// Child combinator: `A > B`.
    Child,
}

/// Simple selectors with no combinator between them, e.g. `div.foo[data-x]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

/// One element in a selector chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorPart {
    Compound(CompoundSelector),
    Combinator(Combinator),
}

/// A complex selector: compound selectors joined by combinators.
///
/// Always starts and ends with a `SelectorPart::Compound`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    pub parts: Vec<SelectorPart>,
}

/// A comma-separated selector list. Matches if any member matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorList {
    pub selectors: Vec<Selector>,
}
