//! Recording host used by the integration suites.
//!
//! `Host` is the backend, the source of container/surface handles and the
//! environment firing resize events. Every engine and host call lands in a
//! shared log, tagged with the engine it went to (0 for host-level calls).

#![allow(dead_code)]

use fc_core::*;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Construct {
        surface: u32,
        data: Option<FlameChartNodes>,
        marks: Option<Marks>,
        settings: Option<Settings>,
        colors: Option<Colors>,
        plugins: Option<Vec<String>>,
    },
    SurfaceSize { surface: u32, width: f64, height: f64 },
    Observe { container: u32 },
    Disconnect { container: u32 },
    Resize(f64, f64),
    SetNodes(FlameChartNodes),
    SetMarks(Marks),
    SetWaterfall(Waterfall),
    SetTimeseries(Timeseries),
    SetTimeframeTimeseries(Timeseries),
    SetSettings(Settings),
    RecalcChildrenLayout,
    Render,
    SetPosition(Position),
    SetZoom(f64, f64),
    On(String),
    RemoveListener(String),
}

/// Log tag of a listener.
pub fn tag(listener: &SelectListener) -> String {
    format!("{listener:?}")
}

struct Observer {
    container: u32,
    active: Rc<Cell<bool>>,
    callback: Box<dyn FnMut(BoxSize)>,
}

#[derive(Default)]
pub struct HostState {
    log: RefCell<Vec<(u32, Call)>>,
    engines: Cell<u32>,
    boxes: RefCell<HashMap<u32, BoxSize>>,
    observers: RefCell<Vec<Observer>>,
    listeners: RefCell<HashMap<u32, Vec<SelectListener>>>,
}

#[derive(Clone, Default)]
pub struct Host(Rc<HostState>);

impl Host {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self::default()
    }

    fn record(&self, engine: u32, call: Call) {
        self.0.log.borrow_mut().push((engine, call));
    }

    pub fn container(&self, id: u32) -> MockContainer {
        MockContainer {
            id,
            host: self.clone(),
        }
    }

    pub fn surface(&self, id: u32) -> MockSurface {
        MockSurface {
            id,
            host: self.clone(),
        }
    }

    /// Set the box a container reports when measured, without firing
    /// observers.
    pub fn set_box(&self, container: u32, size: BoxSize) {
        self.0.boxes.borrow_mut().insert(container, size);
    }

    /// Set the box and fire every active observer of `container`.
    pub fn resize(&self, container: u32, size: BoxSize) {
        self.set_box(container, size);
        let mut observers = self.0.observers.borrow_mut();
        for observer in observers.iter_mut() {
            if observer.container == container && observer.active.get() {
                (observer.callback)(size);
            }
        }
    }

    pub fn active_observers(&self) -> usize {
        self.0
            .observers
            .borrow()
            .iter()
            .filter(|o| o.active.get())
            .count()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<(u32, Call)> {
        std::mem::take(&mut *self.0.log.borrow_mut())
    }

    /// Calls received by one engine so far (not drained).
    pub fn calls_to(&self, engine: u32) -> Vec<Call> {
        self.0
            .log
            .borrow()
            .iter()
            .filter(|(e, _)| *e == engine)
            .map(|(_, c)| c.clone())
            .collect()
    }

    pub fn engines_built(&self) -> u32 {
        self.0.engines.get()
    }

    /// Tags of the listeners currently registered on `engine`.
    pub fn listeners(&self, engine: u32) -> Vec<String> {
        self.0
            .listeners
            .borrow()
            .get(&engine)
            .map(|l| l.iter().map(tag).collect())
            .unwrap_or_default()
    }

    /// Registrations across every engine ever built.
    pub fn total_listeners(&self) -> usize {
        self.0.listeners.borrow().values().map(Vec::len).sum()
    }

    /// Deliver a selection through `engine`'s select channel.
    pub fn emit_select(&self, engine: u32, selection: Option<&Selection>) {
        let listeners = self
            .0
            .listeners
            .borrow()
            .get(&engine)
            .cloned()
            .unwrap_or_default();
        for listener in &listeners {
            listener.call(selection);
        }
    }
}

pub struct MockContainer {
    pub id: u32,
    host: Host,
}

pub struct MockObservation {
    container: u32,
    active: Rc<Cell<bool>>,
    host: Host,
}

impl ResizeObservation for MockObservation {
    fn disconnect(&mut self) {
        if self.active.replace(false) {
            self.host.record(
                0,
                Call::Disconnect {
                    container: self.container,
                },
            );
        }
    }
}

impl Container for MockContainer {
    type Observation = MockObservation;

    fn content_box(&self) -> BoxSize {
        self.host
            .0
            .boxes
            .borrow()
            .get(&self.id)
            .copied()
            .unwrap_or_default()
    }

    fn observe_resize(&self, on_resize: Box<dyn FnMut(BoxSize)>) -> MockObservation {
        let active = Rc::new(Cell::new(true));
        self.host.0.observers.borrow_mut().push(Observer {
            container: self.id,
            active: active.clone(),
            callback: on_resize,
        });
        self.host.record(0, Call::Observe { container: self.id });
        MockObservation {
            container: self.id,
            active,
            host: self.host.clone(),
        }
    }

    fn same_handle(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

pub struct MockSurface {
    pub id: u32,
    host: Host,
}

impl Surface for MockSurface {
    fn set_size(&self, size: BoxSize) {
        self.host.record(
            0,
            Call::SurfaceSize {
                surface: self.id,
                width: size.width,
                height: size.height,
            },
        );
    }

    fn same_handle(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

pub struct MockEngine {
    pub id: u32,
    host: Host,
}

impl MockEngine {
    fn record(&self, call: Call) {
        self.host.record(self.id, call);
    }
}

impl Engine for MockEngine {
    fn resize(&mut self, width: f64, height: f64) {
        self.record(Call::Resize(width, height));
    }

    fn set_nodes(&mut self, data: &FlameChartNodes) {
        self.record(Call::SetNodes(data.clone()));
    }

    fn set_marks(&mut self, marks: &Marks) {
        self.record(Call::SetMarks(marks.clone()));
    }

    fn set_waterfall(&mut self, waterfall: &Waterfall) {
        self.record(Call::SetWaterfall(waterfall.clone()));
    }

    fn set_timeseries(&mut self, timeseries: &Timeseries) {
        self.record(Call::SetTimeseries(timeseries.clone()));
    }

    fn set_timeframe_timeseries(&mut self, timeseries: &Timeseries) {
        self.record(Call::SetTimeframeTimeseries(timeseries.clone()));
    }

    fn set_settings(&mut self, settings: &Settings) {
        self.record(Call::SetSettings(settings.clone()));
    }

    fn recalc_children_layout(&mut self) {
        self.record(Call::RecalcChildrenLayout);
    }

    fn render(&mut self) {
        self.record(Call::Render);
    }

    fn set_flame_chart_position(&mut self, position: Position) {
        self.record(Call::SetPosition(position));
    }

    fn set_zoom(&mut self, start: f64, end: f64) {
        self.record(Call::SetZoom(start, end));
    }

    fn on(&mut self, event: EngineEvent, listener: SelectListener) {
        assert_eq!(event, EngineEvent::Select);
        self.record(Call::On(tag(&listener)));
        self.host
            .0
            .listeners
            .borrow_mut()
            .entry(self.id)
            .or_default()
            .push(listener);
    }

    fn remove_listener(&mut self, event: EngineEvent, listener: &SelectListener) {
        assert_eq!(event, EngineEvent::Select);
        self.record(Call::RemoveListener(tag(listener)));
        if let Some(live) = self.host.0.listeners.borrow_mut().get_mut(&self.id) {
            live.retain(|l| !l.same(listener));
        }
    }
}

impl Backend for Host {
    type Container = MockContainer;
    type Surface = MockSurface;
    type Engine = MockEngine;
    type Plugin = String;

    fn create_engine(&self, options: EngineOptions<'_, Self>) -> MockEngine {
        let id = self.0.engines.get() + 1;
        self.0.engines.set(id);
        self.record(
            id,
            Call::Construct {
                surface: options.surface.id,
                data: options.data.map(|d| (**d).clone()),
                marks: options.marks.map(|m| (**m).clone()),
                settings: options.settings.map(|s| (**s).clone()),
                colors: options.colors.map(|c| (**c).clone()),
                plugins: options.plugins.map(|p| (**p).clone()),
            },
        );
        MockEngine {
            id,
            host: self.clone(),
        }
    }
}

// ─── Fixtures ────────────────────────────────────────────────────────────

#[derive(serde::Deserialize)]
pub struct Profile {
    pub data: FlameChartNodes,
    pub marks: Marks,
    pub waterfall: Waterfall,
    pub timeseries: Timeseries,
    pub settings: Settings,
}

pub fn profile() -> Profile {
    serde_json::from_str(include_str!("../fixtures/profile.json")).unwrap()
}

pub fn node(name: &str, start: f64, duration: f64) -> FlameChartNode {
    FlameChartNode {
        name: name.into(),
        start,
        duration,
        kind: None,
        color: None,
        pattern: None,
        children: None,
        extra: Extra::new(),
    }
}
