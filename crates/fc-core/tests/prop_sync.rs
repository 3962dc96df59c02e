//! Integration tests: input slots forwarded to engine mutators.

mod common;

use common::{Call, Host, node, profile};
use fc_core::*;
use pretty_assertions::assert_eq;
use std::rc::Rc;

/// A component with a live engine (#1) and an empty log.
fn mounted(host: &Host) -> FlameChartComponent<Host> {
    let chart = FlameChartComponent::new(host.clone());
    chart.attach_container(Some(host.container(1)));
    chart.attach_surface(Some(host.surface(1)));
    host.take();
    chart
}

// ─── Slot independence ──────────────────────────────────────────────────

#[test]
fn each_slot_calls_only_its_mutator() {
    let host = Host::new();
    let chart = mounted(&host);
    let p = profile();

    chart.set_data(Some(Rc::new(p.data.clone())));
    assert_eq!(host.take(), vec![(1, Call::SetNodes(p.data.clone()))]);

    chart.set_marks(Some(Rc::new(p.marks.clone())));
    assert_eq!(host.take(), vec![(1, Call::SetMarks(p.marks.clone()))]);

    chart.set_waterfall(Some(Rc::new(p.waterfall.clone())));
    assert_eq!(host.take(), vec![(1, Call::SetWaterfall(p.waterfall.clone()))]);

    chart.set_timeseries(Some(Rc::new(p.timeseries.clone())));
    assert_eq!(host.take(), vec![(1, Call::SetTimeseries(p.timeseries.clone()))]);

    chart.set_timeframe_timeseries(Some(Rc::new(p.timeseries.clone())));
    assert_eq!(
        host.take(),
        vec![(1, Call::SetTimeframeTimeseries(p.timeseries.clone()))]
    );

    chart.set_position(Some(Rc::new(Position { x: 10.0, y: 25.0 })));
    assert_eq!(
        host.take(),
        vec![(1, Call::SetPosition(Position { x: 10.0, y: 25.0 }))]
    );

    chart.set_zoom(Some(Rc::new(Zoom { start: 40.0, end: 90.0 })));
    assert_eq!(host.take(), vec![(1, Call::SetZoom(40.0, 90.0))]);
}

#[test]
fn same_value_is_forwarded_once() {
    let host = Host::new();
    let chart = mounted(&host);
    let marks = Rc::new(profile().marks);

    chart.set_marks(Some(marks.clone()));
    chart.set_marks(Some(marks.clone()));
    chart.set_marks(Some(marks.clone()));
    assert_eq!(host.take().len(), 1);

    // Equal content in a fresh allocation is a new value.
    chart.set_marks(Some(Rc::new((*marks).clone())));
    assert_eq!(host.take().len(), 1);
}

#[test]
fn absent_values_are_never_forwarded() {
    let host = Host::new();
    let chart = mounted(&host);

    chart.set_data(None);
    chart.set_settings(None);
    chart.set_zoom(None);

    let data = Rc::new(vec![node("a", 0.0, 1.0)]);
    chart.set_data(Some(data.clone()));
    chart.set_data(None);
    assert_eq!(host.take(), vec![(1, Call::SetNodes((*data).clone()))]);
}

#[test]
fn colors_and_plugins_have_no_mutator() {
    let host = Host::new();
    let chart = mounted(&host);

    chart.set_colors(Some(Rc::new(Colors::new())));
    chart.set_plugins(Some(Rc::new(vec!["marks".to_string()])));
    chart.set_class_name(Some("chart".into()));
    assert!(host.take().is_empty());
    assert_eq!(chart.class_name().as_deref(), Some("chart"));
}

// ─── Settings ───────────────────────────────────────────────────────────

#[test]
fn settings_apply_then_relayout_then_render() {
    let host = Host::new();
    let chart = mounted(&host);
    let settings = Rc::new(profile().settings);

    chart.set_settings(Some(settings.clone()));
    assert_eq!(
        host.take(),
        vec![
            (1, Call::SetSettings((*settings).clone())),
            (1, Call::RecalcChildrenLayout),
            (1, Call::Render),
        ]
    );
}

#[test]
fn settings_without_engine_are_read_at_construction() {
    let host = Host::new();
    let chart = FlameChartComponent::new(host.clone());
    let settings = Rc::new(profile().settings);
    chart.set_settings(Some(settings.clone()));

    chart.attach_surface(Some(host.surface(1)));
    chart.attach_container(Some(host.container(1)));

    let calls = host.calls_to(1);
    assert_eq!(calls.len(), 1, "only the construction, got {calls:?}");
    match &calls[0] {
        Call::Construct { settings: s, .. } => assert_eq!(s.as_ref(), Some(&*settings)),
        other => panic!("expected construction, got {other:?}"),
    }
}

// ─── Render passes ──────────────────────────────────────────────────────

#[test]
fn update_forwards_only_changed_slots() {
    let host = Host::new();
    let chart = mounted(&host);
    let p = profile();

    let mut props = FlameChartProps::<String> {
        data: Some(Rc::new(p.data.clone())),
        marks: Some(Rc::new(p.marks.clone())),
        zoom: Some(Rc::new(Zoom { start: 0.0, end: 100.0 })),
        class_name: Some("flame".into()),
        ..Default::default()
    };
    chart.update(props.clone());
    assert_eq!(
        host.take(),
        vec![
            (1, Call::SetNodes(p.data.clone())),
            (1, Call::SetMarks(p.marks.clone())),
            (1, Call::SetZoom(0.0, 100.0)),
        ]
    );

    // Re-render with only the zoom replaced.
    props.zoom = Some(Rc::new(Zoom { start: 10.0, end: 20.0 }));
    chart.update(props.clone());
    assert_eq!(host.take(), vec![(1, Call::SetZoom(10.0, 20.0))]);

    // Identical props: nothing.
    chart.update(props);
    assert!(host.take().is_empty());
    assert_eq!(chart.class_name().as_deref(), Some("flame"));
}

// ─── View state across construction ─────────────────────────────────────

#[test]
fn view_state_set_before_mount_follows_construction() {
    let host = Host::new();
    let chart = FlameChartComponent::new(host.clone());
    let props = FlameChartProps::<String> {
        data: Some(Rc::new(vec![node("boot", 0.0, 3.0)])),
        position: Some(Rc::new(Position { x: 0.0, y: 12.0 })),
        zoom: Some(Rc::new(Zoom { start: 10.0, end: 20.0 })),
        ..Default::default()
    };
    chart.update(props.clone());
    chart.attach_container(Some(host.container(1)));
    chart.attach_surface(Some(host.surface(1)));
    chart.update(props);

    // Data rides in the constructor; position and zoom are applied right
    // after it, once, and the second render sends nothing.
    let calls = host.calls_to(1);
    assert_eq!(calls.len(), 3, "got {calls:?}");
    match &calls[0] {
        Call::Construct { data, .. } => {
            assert_eq!(data.as_deref(), Some(&[node("boot", 0.0, 3.0)][..]))
        }
        other => panic!("expected construction, got {other:?}"),
    }
    assert_eq!(
        calls[1..].to_vec(),
        vec![
            Call::SetPosition(Position { x: 0.0, y: 12.0 }),
            Call::SetZoom(10.0, 20.0),
        ]
    );
}

#[test]
fn view_state_is_replayed_on_reconstruction() {
    let host = Host::new();
    let chart = mounted(&host);
    chart.set_position(Some(Rc::new(Position { x: 5.0, y: 40.0 })));
    chart.set_zoom(Some(Rc::new(Zoom { start: 2.0, end: 8.0 })));
    host.take();

    chart.attach_surface(Some(host.surface(2)));

    let calls = host.calls_to(2);
    assert!(matches!(calls[0], Call::Construct { surface: 2, .. }), "got {calls:?}");
    assert_eq!(
        calls[1..].to_vec(),
        vec![
            Call::SetPosition(Position { x: 5.0, y: 40.0 }),
            Call::SetZoom(2.0, 8.0),
        ]
    );
}

#[test]
fn absent_view_state_is_not_replayed() {
    let host = Host::new();
    let chart = mounted(&host);
    chart.set_zoom(Some(Rc::new(Zoom { start: 2.0, end: 8.0 })));
    chart.set_zoom(None);

    chart.attach_container(Some(host.container(2)));
    assert_eq!(host.calls_to(2).len(), 1);
}
