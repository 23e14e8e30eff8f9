//! Hover intent: normalized enter/leave events that ignore a pointer merely
//! passing over an element.
//!
//! A `mouseover` records the pointer position and schedules an intent check
//! `interval` ms later. `mousemove` keeps updating the current position.
//! When the check runs, the pointer is intentional if it never moved, or if
//! it travelled at least `sensitivity` pixels since the `mouseover`. An
//! intentional hover dispatches `hlfhienter`, and the following `mouseout`
//! dispatches `hlfhileave`. A `mouseout` before the check cancels it.
//! Every move also dispatches `hlfhitrack` on the next animation frame.
//!
//! Hover events bubble and carry `clientX`, `clientY`, `pageX`, `pageY` in
//! their detail and the original related target on the event.

use serde_json::json;

use crate::event::{Event, Pointer};
use crate::ext::{Component, Cx, EventListenerMap, Extension, ExtensionConfig, Namespace, Setup};

/// Namespace prefix.
pub const PREFIX: &str = "hlf-hi";

/// Milliseconds to wait before deciding intent.
pub const DEFAULT_INTERVAL: u64 = 300;

/// Pixel threshold for pointer travel during the interval.
pub const DEFAULT_SENSITIVITY: f64 = 2.0;

const TIMEOUT: &str = "_timeout";

/// The hover-intent namespace with its default options.
pub fn namespace() -> Namespace {
    Namespace::new(PREFIX).with_defaults(json!({
        "interval": DEFAULT_INTERVAL,
        "sensitivity": DEFAULT_SENSITIVITY,
    }))
}

/// Auto-bound, auto-listening, with compacted options.
pub fn config() -> ExtensionConfig {
    ExtensionConfig::new()
        .auto_bind(true)
        .auto_listen(true)
        .compact_options(true)
}

/// A ready-to-use hover-intent extension.
pub fn extension() -> Extension<HoverIntent> {
    Extension::new(namespace(), config())
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Axis {
    current: Option<f64>,
    previous: Option<f64>,
}

#[derive(Debug, Default)]
pub struct HoverIntent {
    intentional: bool,
    x: Axis,
    y: Axis,
}

impl HoverIntent {
    /// Whether the current hover has been judged intentional.
    pub fn is_intentional(&self) -> bool {
        self.intentional
    }

    fn interval(cx: &Cx<'_, Self>) -> u64 {
        cx.prop("interval")
            .and_then(|v| v.as_u64())
            .unwrap_or(DEFAULT_INTERVAL)
    }

    fn sensitivity(cx: &Cx<'_, Self>) -> f64 {
        cx.prop("sensitivity")
            .and_then(|v| v.as_f64())
            .unwrap_or(DEFAULT_SENSITIVITY)
    }

    fn check_event_element(cx: &Cx<'_, Self>, event: &Event) -> bool {
        let Some(target) = event.target_element() else {
            return false;
        };
        if event.kind == "mouseout" {
            if let Some(related) = event.related_target {
                if cx.page.dom.contains(target, related) {
                    return false;
                }
            }
        }
        if cx.context_element().is_some() {
            cx.elements().contains(&target)
        } else {
            target == cx.root_element()
        }
    }

    fn dispatch_hover_event(&self, cx: &mut Cx<'_, Self>, on: bool, event: &Event) {
        let Some(target) = event.target_element() else {
            return;
        };
        let pointer = event.pointer.unwrap_or_default();
        let kind = if on { "enter" } else { "leave" };
        let detail = json!({
            "clientX": pointer.client_x,
            "clientY": pointer.client_y,
            "pageX": self.x.current.unwrap_or(pointer.page_x),
            "pageY": self.y.current.unwrap_or(pointer.page_y),
        });
        let hover = Event::custom(cx.event_name(kind), target, detail)
            .bubbling(true)
            .with_related_target(event.related_target);
        cx.page.dispatch(hover);
        cx.debug_log(format_args!(
            "{kind} {} {} at {}",
            pointer.page_x,
            pointer.page_y,
            cx.page.now()
        ));
    }

    fn dispatch_track_event(cx: &mut Cx<'_, Self>, event: &Event) {
        let Some(target) = event.target_element() else {
            return;
        };
        let Pointer {
            client_x,
            client_y,
            page_x,
            page_y,
        } = event.pointer.unwrap_or_default();
        let track = Event::custom(
            cx.event_name("track"),
            target,
            json!({ "clientX": client_x, "clientY": client_y, "pageX": page_x, "pageY": page_y }),
        )
        .bubbling(true);
        cx.page.dispatch(track);
    }

    fn on_mouse_move(&mut self, cx: &mut Cx<'_, Self>, event: &Event) {
        self.update_state(cx, event);
        let event = event.clone();
        cx.request_animation_frame(move |this, cx| {
            if this.intentional {
                cx.debug_log(format_args!("track {:?}", event.pointer));
            }
            Self::dispatch_track_event(cx, &event);
        });
    }

    fn on_mouse_out(&mut self, cx: &mut Cx<'_, Self>, event: &Event) {
        if !Self::check_event_element(cx, event) {
            return;
        }
        let keep_position = self.intentional;
        if keep_position {
            self.dispatch_hover_event(cx, false, event);
        }
        self.reset_state(cx);
        if let (true, Some(pointer)) = (keep_position, event.pointer) {
            self.x.previous = Some(pointer.page_x);
            self.y.previous = Some(pointer.page_y);
        }
    }

    fn on_mouse_over(&mut self, cx: &mut Cx<'_, Self>, event: &Event) {
        if self.intentional || cx.has_timeout(TIMEOUT) || !Self::check_event_element(cx, event) {
            return;
        }
        self.update_state(cx, event);
        let interval = Self::interval(cx);
        let event = event.clone();
        cx.set_timeout(TIMEOUT, Some(interval), move |this, cx| {
            this.update_state(cx, &event);
            if this.intentional {
                this.dispatch_hover_event(cx, true, &event);
            }
        });
    }

    fn reset_state(&mut self, cx: &mut Cx<'_, Self>) {
        cx.debug_log("reset");
        self.intentional = false;
        self.x = Axis::default();
        self.y = Axis::default();
        cx.clear_timeout(TIMEOUT);
    }

    fn update_state(&mut self, cx: &mut Cx<'_, Self>, event: &Event) {
        let Some(Pointer { page_x, page_y, .. }) = event.pointer else {
            return;
        };
        if event.kind == "mousemove" {
            self.x.current = Some(page_x);
            self.y.current = Some(page_y);
            return;
        }
        if !cx.has_timeout(TIMEOUT) {
            self.x.previous = Some(page_x);
            self.y.previous = Some(page_y);
            return;
        }
        let sensitivity = Self::sensitivity(cx);
        let distance = match (self.x.current, self.y.current, self.x.previous, self.y.previous) {
            (Some(x), Some(y), Some(px), Some(py)) => Some((x - px).hypot(y - py)),
            _ => None,
        };
        self.intentional = distance.is_none_or(|d| d >= sensitivity);
        cx.debug_log(format_args!("checked {distance:?} against {sensitivity}"));
    }
}

impl Component for HoverIntent {
    fn create(_setup: &Setup<'_>) -> Self {
        Self::default()
    }

    fn init(&mut self, cx: &mut Cx<'_, Self>) {
        self.reset_state(cx);
    }

    fn deinit(&mut self, cx: &mut Cx<'_, Self>) {
        self.reset_state(cx);
    }

    fn event_listeners(&self, _namespace: &Namespace) -> EventListenerMap<Self> {
        EventListenerMap::new()
            .on_passive("mousemove", Self::on_mouse_move)
            .on_passive("mouseout", Self::on_mouse_out)
            .on_passive("mouseover", Self::on_mouse_over)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let ns = namespace();
        assert_eq!(ns.defaults()["interval"], 300);
        assert_eq!(ns.defaults()["sensitivity"], 2.0);
        assert_eq!(ns.event_name("enter"), "hlfhienter");
        let config = config();
        assert!(config.auto_bind && config.auto_listen && config.compact_options);
        assert!(!config.auto_select);
    }
}
