//! Sub-element selection from the `selectors` option, and class-derived
//! lookups within the root element.

use super::component::Component;
use super::config::MethodGroup;
use super::context::Cx;
use super::instance::InstanceCore;
use crate::dom::{Dom, ElementId};
use crate::error::ExtensionError;
use crate::selector::{parse_selector, SelectorList};

/// A query that re-runs against the current document on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveQuery {
    scope: ElementId,
    source: String,
    selector: SelectorList,
}

impl LiveQuery {
    pub fn new(scope: ElementId, source: &str) -> Result<Self, ExtensionError> {
        Ok(Self {
            scope,
            source: source.to_owned(),
            selector: parse_selector(source)?,
        })
    }

    /// Current matches below the scope, in document order.
    pub fn elements(&self, dom: &Dom) -> Vec<ElementId> {
        if !dom.contains_node(self.scope) {
            return Vec::new();
        }
        dom.select_parsed(self.scope, &self.selector)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// The result of resolving one `selectors` entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Singular key: the first match at selection time.
    One(Option<ElementId>),
    /// Plural key (ending in `s`): every current match.
    All(LiveQuery),
}

/// Resolve every entry of the `selectors` option against the root element,
/// replacing earlier selections. Non-string entries are skipped.
pub(crate) fn select_to_properties(core: &mut InstanceCore, dom: &Dom) -> Result<(), ExtensionError> {
    let mut selections = std::collections::BTreeMap::new();
    if let Some(selectors) = core.options.get("selectors").and_then(|v| v.as_object()) {
        for (key, value) in selectors {
            let Some(source) = value.as_str() else {
                tracing::warn!(%key, %value, "selector is not a string, skipping");
                continue;
            };
            let selection = if key.ends_with('s') {
                Selection::All(LiveQuery::new(core.root, source)?)
            } else {
                Selection::One(dom.query_selector(core.root, source)?)
            };
            selections.insert(key.clone(), selection);
        }
    }
    core.selections = selections;
    Ok(())
}

impl InstanceCore {
    /// The element selected under a singular key.
    pub fn selected(&self, key: &str) -> Option<ElementId> {
        match self.selection(key)? {
            Selection::One(element) => *element,
            Selection::All(_) => None,
        }
    }

    /// Current matches of a plural key's live query.
    pub fn selected_all(&self, dom: &Dom, key: &str) -> Vec<ElementId> {
        match self.selection(key) {
            Some(Selection::All(query)) => query.elements(dom),
            _ => Vec::new(),
        }
    }

    pub fn selection_keys(&self) -> impl Iterator<Item = &str> {
        self.selections.keys().map(String::as_str)
    }
}

impl<T: Component> Cx<'_, T> {
    /// Re-resolve the `selectors` option.
    pub fn select_to_properties(&mut self) -> Result<(), ExtensionError> {
        self.require_group(MethodGroup::Selection)?;
        select_to_properties(self.core, &self.page.dom)
    }

    /// First element below the root with class `js-<prefix>-<base>`.
    pub fn select_by_class(&self, base: &str) -> Result<Option<ElementId>, ExtensionError> {
        self.require_group(MethodGroup::Selection)?;
        let selector = format!(".{}", self.class_name(base));
        Ok(self.page.dom.query_selector(self.core.root, &selector)?)
    }

    /// Every element below the root with class `js-<prefix>-<base>`.
    pub fn select_all_by_class(&self, base: &str) -> Result<Vec<ElementId>, ExtensionError> {
        self.require_group(MethodGroup::Selection)?;
        let selector = format!(".{}", self.class_name(base));
        Ok(self.page.dom.query_selector_all(self.core.root, &selector)?)
    }

    pub fn selected(&self, key: &str) -> Option<ElementId> {
        self.core.selected(key)
    }

    pub fn selected_all(&self, key: &str) -> Vec<ElementId> {
        self.core.selected_all(&self.page.dom, key)
    }

    pub(crate) fn require_group(&self, group: MethodGroup) -> Result<(), ExtensionError> {
        if self.core.config.has_group(group) {
            Ok(())
        } else {
            Err(ExtensionError::MethodGroupDisabled {
                extension: self.core.namespace.name().to_owned(),
                group,
            })
        }
    }
}
