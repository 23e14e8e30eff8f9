//! Right-to-left selector matching against the [`Dom`].

use crate::dom::{Dom, ElementData, ElementId};

use super::model::{Combinator, CompoundSelector, Selector, SelectorComponent, SelectorList, SelectorPart};

impl SelectorList {
    /// Whether `element` matches any selector in the list.
    pub fn matches(&self, dom: &Dom, element: ElementId) -> bool {
        self.selectors.iter().any(|s| matches_selector(s, element, dom))
    }
}

impl Selector {
    /// Whether `element` matches this selector.
    pub fn matches(&self, dom: &Dom, element: ElementId) -> bool {
        matches_selector(self, element, dom)
    }
}

fn matches_selector(selector: &Selector, element: ElementId, dom: &Dom) -> bool {
    let parts = &selector.parts;
    let Some(SelectorPart::Compound(last)) = parts.last() else {
        return false;
    };
    let Some(data) = dom.get(element) else {
        return false;
    };
    if !matches_compound(last, data) {
        return false;
    }

    let mut part_idx = parts.len() - 1;
    let mut current = element;

    while part_idx > 0 {
        part_idx -= 1;
        let SelectorPart::Combinator(combinator) = &parts[part_idx] else {
            return false;
        };
        if part_idx == 0 {
            return false;
        }
        part_idx -= 1;
        let SelectorPart::Compound(compound) = &parts[part_idx] else {
            return false;
        };

        match combinator {
            Combinator::Child => {
                let Some(parent) = dom.parent(current) else {
                    return false;
                };
                if !dom.get(parent).is_some_and(|p| matches_compound(compound, p)) {
                    return false;
                }
                current = parent;
            }
            Combinator::Descendant => {
                let found = dom.ancestors(current).into_iter().find(|&ancestor| {
                    dom.get(ancestor)
                        .is_some_and(|a| matches_compound(compound, a))
                });
                match found {
                    Some(ancestor) => current = ancestor,
                    None => return false,
                }
            }
        }
    }

    true
}

fn matches_compound(compound: &CompoundSelector, element: &ElementData) -> bool {
    compound.components.iter().all(|component| match component {
        SelectorComponent::Type(tag) => element.tag.eq_ignore_ascii_case(tag),
        SelectorComponent::Universal => true,
        SelectorComponent::Class(name) => element.has_class(name),
        SelectorComponent::Id(id) => element.id.as_deref() == Some(id.as_str()),
        SelectorComponent::Attribute { name, value: None } => element.has_attr(name),
        SelectorComponent::Attribute { name, value: Some(value) } => {
            element.attr(name) == Some(value.as_str())
        }
    })
}
