//! Hover-intent behavior driven through the headless pilot.

use std::time::Duration;

use hlf_ext::behaviors::hover_intent::{self, HoverIntent};
use hlf_ext::dom::{Dom, ElementData, ElementId};
use hlf_ext::runtime::{run_for, run_until_idle};
use hlf_ext::testing::{outline, Pilot};
use hlf_ext::{Extension, ExtensionHandle};
use pretty_assertions::assert_eq;
use serde_json::json;

struct Scene {
    pilot: Pilot,
    hover: Extension<HoverIntent>,
    body: ElementId,
    card: ElementId,
    label: ElementId,
    other: ElementId,
}

fn scene() -> Scene {
    let mut dom = Dom::new();
    let body = dom.insert(ElementData::new("body"));
    let card = dom.insert_child(body, ElementData::new("div").with_class("card"));
    let label = dom.insert_child(card, ElementData::new("span").with_class("label"));
    let other = dom.insert_child(body, ElementData::new("div").with_class("other"));
    Scene {
        pilot: Pilot::new(dom),
        hover: hover_intent::extension(),
        body,
        card,
        label,
        other,
    }
}

fn attach(scene: &mut Scene, options: Option<serde_json::Value>) -> ExtensionHandle<HoverIntent> {
    scene
        .hover
        .attach(scene.pilot.page_mut(), scene.card, options)
        .unwrap()
}

#[test]
fn resting_pointer_enters_after_interval() {
    let mut s = scene();
    let handle = attach(&mut s, None);
    let enter = s.pilot.record(s.card, "hlfhienter");

    s.pilot.hover(s.card, 10.0, 20.0);
    s.pilot.advance(299);
    assert_eq!(enter.count(), 0);
    s.pilot.advance(1);
    assert_eq!(enter.count(), 1);

    let event = enter.last().unwrap();
    assert_eq!(
        event.detail,
        json!({ "clientX": 10.0, "clientY": 20.0, "pageX": 10.0, "pageY": 20.0 })
    );
    assert!(event.bubbles);
    assert!(handle.read(|instance| instance.component().is_intentional()).unwrap());
}

#[test]
fn passing_over_does_not_enter() {
    let mut s = scene();
    attach(&mut s, None);
    let enter = s.pilot.record(s.card, "hlfhienter");
    let leave = s.pilot.record(s.card, "hlfhileave");

    s.pilot.hover(s.card, 10.0, 10.0);
    s.pilot.advance(100);
    s.pilot.leave(500.0, 500.0);
    s.pilot.advance(1000);
    assert_eq!(enter.count(), 0);
    assert_eq!(leave.count(), 0);
}

#[test]
fn leave_follows_enter() {
    let mut s = scene();
    let handle = attach(&mut s, None);
    let leave = s.pilot.record(s.body, "hlfhileave");

    s.pilot.hover(s.card, 10.0, 10.0);
    s.pilot.advance(300);
    s.pilot.hover(s.other, 200.0, 10.0);

    assert_eq!(leave.count(), 1);
    let event = leave.last().unwrap();
    assert_eq!(event.target_element(), Some(s.card));
    assert_eq!(event.related_target, Some(s.other));
    assert_eq!(event.detail["pageX"], json!(200.0));
    assert!(!handle.read(|instance| instance.component().is_intentional()).unwrap());
}

#[test]
fn small_moves_stay_below_sensitivity() {
    let mut s = scene();
    attach(&mut s, None);
    let enter = s.pilot.record(s.card, "hlfhienter");

    s.pilot.hover(s.card, 10.0, 10.0);
    s.pilot.move_to(11.0, 10.0);
    s.pilot.advance(300);
    assert_eq!(enter.count(), 0);
}

#[test]
fn moves_beyond_sensitivity_enter() {
    let mut s = scene();
    attach(&mut s, None);
    let enter = s.pilot.record(s.card, "hlfhienter");

    s.pilot.hover(s.card, 10.0, 10.0);
    s.pilot.move_to(13.0, 14.0);
    s.pilot.advance(300);
    assert_eq!(enter.count(), 1);
    let detail = enter.last().unwrap().detail;
    assert_eq!(detail["pageX"], json!(13.0));
    assert_eq!(detail["pageY"], json!(14.0));
}

#[test]
fn moving_into_a_child_is_not_leaving() {
    let mut s = scene();
    attach(&mut s, None);
    let enter = s.pilot.record(s.card, "hlfhienter");
    let leave = s.pilot.record(s.card, "hlfhileave");

    s.pilot.hover(s.card, 10.0, 10.0);
    s.pilot.hover(s.label, 12.0, 12.0);
    s.pilot.advance(300);
    assert_eq!(enter.count(), 1);
    assert_eq!(leave.count(), 0);

    s.pilot.hover(s.card, 30.0, 30.0);
    assert_eq!(leave.count(), 0);
}

#[test]
fn track_event_fires_on_next_frame() {
    let mut s = scene();
    attach(&mut s, None);
    let track = s.pilot.record(s.card, "hlfhitrack");

    s.pilot.hover(s.card, 10.0, 10.0);
    s.pilot.move_to(15.0, 12.0);
    assert_eq!(track.count(), 0);
    s.pilot.advance_frames(1);
    assert_eq!(track.count(), 1);
    assert_eq!(
        track.last().unwrap().detail,
        json!({ "clientX": 15.0, "clientY": 12.0, "pageX": 15.0, "pageY": 12.0 })
    );
}

#[test]
fn embedded_interval_overrides_default() {
    let mut s = scene();
    s.pilot
        .page_mut()
        .dom
        .get_mut(s.card)
        .unwrap()
        .set_attr("data-hlf-hi", r#"{"interval": 100}"#);
    let handle = attach(&mut s, None);
    let enter = s.pilot.record(s.card, "hlfhienter");

    s.pilot.hover(s.card, 10.0, 10.0);
    s.pilot.advance(100);
    assert_eq!(enter.count(), 1);
    assert_eq!(
        handle.read(|instance| instance.prop("interval").cloned()).unwrap(),
        Some(json!(100))
    );
}

#[test]
fn sensitivity_option_applies() {
    let mut s = scene();
    attach(&mut s, Some(json!({ "sensitivity": 0.5 })));
    let enter = s.pilot.record(s.card, "hlfhienter");

    s.pilot.hover(s.card, 10.0, 10.0);
    s.pilot.move_to(11.0, 10.0);
    s.pilot.advance(300);
    assert_eq!(enter.count(), 1);
}

#[test]
fn removal_cancels_pending_check() {
    let mut s = scene();
    let handle = attach(&mut s, None);
    let enter = s.pilot.record(s.card, "hlfhienter");

    s.pilot.hover(s.card, 10.0, 10.0);
    handle.remove(s.pilot.page_mut()).unwrap();
    s.pilot.advance(1000);
    assert_eq!(enter.count(), 0);
    assert_eq!(s.pilot.page().pending_timers(), 0);
    assert_eq!(s.pilot.page().listener_count(s.card.into(), "mouseover"), 0);
    insta::assert_snapshot!(outline(s.pilot.dom(), s.body), @r###"
    body
      div.card
        span.label
      div.other
    "###);
}

#[test]
fn shared_instance_filters_by_elements() {
    let mut dom = Dom::new();
    let list = dom.insert(ElementData::new("ul"));
    let first = dom.insert_child(list, ElementData::new("li").with_class("item"));
    let second = dom.insert_child(list, ElementData::new("li").with_class("item"));
    let divider = dom.insert_child(list, ElementData::new("li").with_class("divider"));
    let mut pilot = Pilot::new(dom);

    let extension: Extension<HoverIntent> = hover_intent::extension();
    let handle = extension
        .attach_shared(
            pilot.page_mut(),
            |dom: &Dom, context: ElementId| dom.query_selector_all(context, ".item").unwrap_or_default(),
            list,
            None,
        )
        .unwrap();
    assert_eq!(handle.read(|instance| instance.elements().to_vec()).unwrap(), vec![first, second]);

    let enter = pilot.record(list, "hlfhienter");
    pilot.hover(divider, 5.0, 5.0);
    pilot.advance(300);
    assert_eq!(enter.count(), 0);

    pilot.hover(second, 5.0, 25.0);
    pilot.advance(300);
    assert_eq!(enter.count(), 1);
    assert_eq!(enter.last().unwrap().target_element(), Some(second));
}

#[tokio::test(start_paused = true)]
async fn driver_delivers_enter() {
    let mut s = scene();
    attach(&mut s, None);
    let enter = s.pilot.record(s.card, "hlfhienter");

    s.pilot.hover(s.card, 10.0, 10.0);
    assert_eq!(run_for(s.pilot.page_mut(), Duration::from_millis(150)).await, 0);
    assert_eq!(enter.count(), 0);
    assert_eq!(run_until_idle(s.pilot.page_mut()).await, 1);
    assert_eq!(enter.count(), 1);
    assert_eq!(s.pilot.page().now(), 300);
}
