//! Snapshot helpers.
//!
//! Render a document subtree as an indented outline suitable for inline
//! snapshot assertions.

use std::fmt::Write as _;

use crate::dom::{Dom, ElementData, ElementId};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Outline of the subtree at `root`, one element per line, two spaces of
/// indentation per level.
///
/// Each line is `tag#id.class1.class2 [name="value" ...] {property: value; ...}`,
/// omitting empty parts. Attributes and styles are sorted by name.
///
/// # Examples
///
/// ```ignore
/// insta::assert_snapshot!(outline(&page.dom, root), @r###"
/// div.js-se [data-se-instance-id="0"]
///   div.foo
/// "###);
/// ```
pub fn outline(dom: &Dom, root: ElementId) -> String {
    let mut out = String::new();
    write_node(dom, root, 0, &mut out);
    out
}

/// A single element's outline line, without indentation.
pub fn describe(data: &ElementData) -> String {
    let mut line = data.tag.clone();
    if let Some(id) = &data.id {
        let _ = write!(line, "#{id}");
    }
    for class in &data.classes {
        let _ = write!(line, ".{class}");
    }
    if !data.attributes.is_empty() {
        let attrs: Vec<String> = data
            .attributes
            .iter()
            .map(|(name, value)| format!("{name}={value:?}"))
            .collect();
        let _ = write!(line, " [{}]", attrs.join(" "));
    }
    if !data.style.is_empty() {
        let styles: Vec<String> = data
            .style
            .iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect();
        let _ = write!(line, " {{{}}}", styles.join("; "));
    }
    line
}

fn write_node(dom: &Dom, id: ElementId, depth: usize, out: &mut String) {
    let Some(data) = dom.get(id) else {
        return;
    };
    let _ = writeln!(out, "{}{}", "  ".repeat(depth), describe(data));
    for &child in dom.children(id) {
        write_node(dom, child, depth + 1, out);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
