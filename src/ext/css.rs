//! CSS helpers: namespaced custom properties and duration values read from
//! inline styles.

use super::component::Component;
use super::config::MethodGroup;
use super::context::Cx;
use crate::dom::{Dom, ElementId};
use crate::error::ExtensionError;

/// Value of a custom property on `element` or its nearest ancestor that sets
/// it. Custom properties inherit.
pub fn read_variable(dom: &Dom, element: ElementId, property: &str) -> Option<String> {
    std::iter::once(element)
        .chain(dom.ancestors(element))
        .find_map(|id| dom.get(id)?.style(property).map(|v| v.trim().to_owned()))
}

/// Parse a CSS time (`0.1s`, `100ms`) into whole milliseconds.
pub fn parse_duration(value: &str) -> Option<u64> {
    let value = value.trim();
    // Multiple durations: the first one wins.
    let value = value.split(',').next()?.trim();
    let (number, scale) = if let Some(ms) = value.strip_suffix("ms") {
        (ms, 1.0)
    } else if let Some(s) = value.strip_suffix('s') {
        (s, 1000.0)
    } else {
        return None;
    };
    let number: f64 = number.trim().parse().ok()?;
    if !number.is_finite() || number < 0.0 {
        return None;
    }
    Some((number * scale).round() as u64)
}

impl<T: Component> Cx<'_, T> {
    /// The value of `--<prefix>-<name>` for `element` (default: the root).
    pub fn css_variable(
        &self,
        name: &str,
        element: Option<ElementId>,
    ) -> Result<Option<String>, ExtensionError> {
        self.require_group(MethodGroup::Css)?;
        let element = element.unwrap_or(self.core.root);
        Ok(read_variable(&self.page.dom, element, &self.var_name(name)))
    }

    /// The inline duration `property` of `element` (default: the root) in
    /// milliseconds.
    pub fn css_duration(
        &self,
        property: &str,
        element: Option<ElementId>,
    ) -> Result<Option<u64>, ExtensionError> {
        self.require_group(MethodGroup::Css)?;
        let element = element.unwrap_or(self.core.root);
        Ok(self
            .page
            .dom
            .get(element)
            .and_then(|data| data.style(property))
            .and_then(parse_duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementData;

    #[test]
    fn durations() {
        assert_eq!(parse_duration("0.1s"), Some(100));
        assert_eq!(parse_duration("0.2s"), Some(200));
        assert_eq!(parse_duration("150ms"), Some(150));
        assert_eq!(parse_duration(" 1.5s, 2s"), Some(1500));
        assert_eq!(parse_duration("0s"), Some(0));
        assert_eq!(parse_duration("fast"), None);
        assert_eq!(parse_duration("-1s"), None);
        assert_eq!(parse_duration("100"), None);
    }

    #[test]
    fn variables_inherit() {
        let mut dom = Dom::new();
        let root = dom.insert(ElementData::new("div").with_style("--se-some-size", "1px"));
        let child = dom.insert_child(root, ElementData::new("div"));
        assert_eq!(read_variable(&dom, child, "--se-some-size").as_deref(), Some("1px"));
        dom.get_mut(child).unwrap().set_style("--se-some-size", " 2px ");
        assert_eq!(read_variable(&dom, child, "--se-some-size").as_deref(), Some("2px"));
        assert_eq!(read_variable(&dom, root, "--se-other"), None);
    }
}
