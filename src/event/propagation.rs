//! Propagation path computation.

use super::dom_event::EventTarget;
use crate::dom::Dom;

/// Nodes an event visits, in order: the target, then (for bubbling events)
/// every ancestor up to the document root.
///
/// Stale element targets yield an empty path; the window is always reachable.
pub fn propagation_path(dom: &Dom, target: EventTarget, bubbles: bool) -> Vec<EventTarget> {
    match target {
        EventTarget::Window => vec![EventTarget::Window],
        EventTarget::Element(id) => {
            if !dom.contains_node(id) {
                return Vec::new();
            }
            let mut path = vec![target];
            if bubbles {
                path.extend(dom.ancestors(id).into_iter().map(EventTarget::Element));
            }
            path
        }
    }
}
