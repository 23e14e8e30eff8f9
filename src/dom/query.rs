//! DOM queries: selector lookups scoped to a subtree, class and predicate queries.

use super::node::{ElementData, ElementId};
use super::tree::Dom;
use crate::selector::{parse_selector, SelectorError, SelectorList};

impl Dom {
    /// First descendant of `scope` (excluding `scope` itself) matching
    /// `selector`, in document order.
    pub fn query_selector(
        &self,
        scope: ElementId,
        selector: &str,
    ) -> Result<Option<ElementId>, SelectorError> {
        let list = parse_selector(selector)?;
        Ok(self.descendants(scope).find(|&id| list.matches(self, id)))
    }

    /// All descendants of `scope` (excluding `scope` itself) matching
    /// `selector`, in document order.
    pub fn query_selector_all(
        &self,
        scope: ElementId,
        selector: &str,
    ) -> Result<Vec<ElementId>, SelectorError> {
        let list = parse_selector(selector)?;
        Ok(self.select_parsed(scope, &list))
    }

    /// Like [`query_selector_all`](Self::query_selector_all) with a pre-parsed list.
    pub fn select_parsed(&self, scope: ElementId, list: &SelectorList) -> Vec<ElementId> {
        self.descendants(scope)
            .filter(|&id| list.matches(self, id))
            .collect()
    }

    /// Whether `element` itself matches `selector`.
    pub fn matches(&self, element: ElementId, selector: &str) -> Result<bool, SelectorError> {
        Ok(parse_selector(selector)?.matches(self, element))
    }

    /// Elements of the document carrying `class`, in document order.
    pub fn query_by_class(&self, class: &str) -> Vec<ElementId> {
        self.query_all(|data| data.has_class(class))
    }

    /// Elements of the document matching `predicate`, in document order.
    /// Detached elements are not searched.
    pub fn query_all(&self, predicate: impl Fn(&ElementData) -> bool) -> Vec<ElementId> {
        let Some(document) = self.document_element() else {
            return Vec::new();
        };
        self.walk_depth_first(document)
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(&predicate))
            .collect()
    }

    fn descendants(&self, scope: ElementId) -> impl Iterator<Item = ElementId> {
        self.walk_depth_first(scope).into_iter().skip(1)
    }
}
