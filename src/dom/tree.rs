//! The document tree: element insertion and removal, ancestry, traversal.

use std::iter;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{ElementData, ElementId};

/// A retained document.
///
/// Elements live in one slotmap arena; links between them are kept in
/// secondary maps keyed by the same ids. The first top-level element inserted
/// is the document element, the scope of document-wide queries. Other
/// top-level elements stay detached until moved under it.
///
/// Elements never carry framework state; extensions key their own registries
/// by ids written into attributes.
#[derive(Debug)]
pub struct Dom {
    pub(crate) nodes: SlotMap<ElementId, ElementData>,
    children: SecondaryMap<ElementId, Vec<ElementId>>,
    parent: SecondaryMap<ElementId, ElementId>,
    document_element: Option<ElementId>,
}

impl Dom {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            document_element: None,
        }
    }

    /// Create a top-level element. The first one becomes the document element.
    pub fn insert(&mut self, data: ElementData) -> ElementId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if self.document_element.is_none() {
            self.document_element = Some(id);
        }
        id
    }

    /// Append a new element to `parent`'s children.
    ///
    /// # Panics
    ///
    /// Panics (debug) if `parent` is not in the document.
    pub fn insert_child(&mut self, parent: ElementId, data: ElementData) -> ElementId {
        debug_assert!(self.nodes.contains_key(parent), "parent element does not exist");
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.attach(id, parent);
        id
    }

    /// Remove `id` and everything below it, returning `id`'s data.
    ///
    /// Ids of removed elements stay invalid; a later insert never reuses them
    /// with the same version, so stale ids held elsewhere simply miss.
    pub fn remove(&mut self, id: ElementId) -> Option<ElementData> {
        if !self.nodes.contains_key(id) {
            return None;
        }
        let subtree = self.walk_depth_first(id);
        self.detach(id);
        if self.document_element == Some(id) {
            self.document_element = None;
        }
        let mut removed = None;
        for element in subtree {
            self.children.remove(element);
            self.parent.remove(element);
            let data = self.nodes.remove(element);
            if element == id {
                removed = data;
            }
        }
        removed
    }

    /// Move `node` and its subtree to the end of `new_parent`'s children.
    ///
    /// # Panics
    ///
    /// Panics (debug) if either element is missing, or if `new_parent` lies
    /// inside `node`'s subtree.
    pub fn reparent(&mut self, node: ElementId, new_parent: ElementId) {
        debug_assert!(self.nodes.contains_key(node), "element does not exist");
        debug_assert!(!self.contains(node, new_parent), "cannot move an element into itself");
        self.detach(node);
        self.attach(node, new_parent);
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.parent.get(id).copied()
    }

    /// Child elements in document order. Empty for unknown ids.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.children.get(id).map_or(&[][..], Vec::as_slice)
    }

    /// Ancestors of `id` from its parent up to the top.
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        iter::successors(self.parent(id), |&current| self.parent(current)).collect()
    }

    /// Inclusive containment, as `Node.contains`: every element contains itself.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        self.nodes.contains_key(ancestor)
            && iter::successors(self.nodes.contains_key(node).then_some(node), |&current| {
                self.parent(current)
            })
            .any(|current| current == ancestor)
    }

    pub fn get(&self, id: ElementId) -> Option<&ElementData> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id)
    }

    /// The attribute `name` on `id`, if both exist.
    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.nodes.get(id)?.attr(name)
    }

    pub fn has_attr(&self, id: ElementId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.nodes.get(id).is_some_and(|data| data.has_class(class))
    }

    /// The top of the document, unless it was removed.
    pub fn document_element(&self) -> Option<ElementId> {
        self.document_element
    }

    /// Number of elements, attached or detached.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` names a live element.
    pub fn contains_node(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// `start` and its descendants in document order (pre-order).
    pub fn walk_depth_first(&self, start: ElementId) -> Vec<ElementId> {
        let mut order = Vec::new();
        let mut pending = vec![start];
        while let Some(current) = pending.pop() {
            if self.nodes.contains_key(current) {
                order.push(current);
                pending.extend(self.children(current).iter().rev());
            }
        }
        order
    }

    fn attach(&mut self, node: ElementId, parent: ElementId) {
        self.parent.insert(node, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(node);
        }
    }

    fn detach(&mut self, node: ElementId) {
        if let Some(parent) = self.parent.remove(node) {
            if let Some(siblings) = self.children.get_mut(parent) {
                siblings.retain(|&sibling| sibling != node);
            }
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}
