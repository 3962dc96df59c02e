//! One-way prop → engine synchronization.
//!
//! Every input slot is an independent [`Binding`] that remembers the value
//! it last observed and compares by identity (`Rc::ptr_eq`), never by
//! content. A binding fires once per identity change, and only when the
//! new value is present. With no engine, firing is a no-op: construction
//! reads the current slot values. Position and zoom are not constructor
//! options, so they are replayed onto each new engine instead.
//!
//! The settings binding is the one binding with an extra effect: new
//! settings can invalidate cached layout, so it is followed by
//! `recalc_children_layout` and `render`.

use crate::engine::{Engine, SelectListener};
use crate::model::*;
use std::rc::Rc;

/// Last observed value of one input slot.
#[derive(Debug)]
pub struct Binding<T> {
    value: Option<Rc<T>>,
}

impl<T> Binding<T> {
    pub fn new() -> Self {
        Self { value: None }
    }

    /// Record `next` and return it if it is present and not the value
    /// already observed.
    pub fn observe(&mut self, next: Option<Rc<T>>) -> Option<Rc<T>> {
        let changed = match (&self.value, &next) {
            (Some(old), Some(new)) => !Rc::ptr_eq(old, new),
            (None, None) => false,
            _ => true,
        };
        self.value = next;
        if changed { self.value.clone() } else { None }
    }

    pub fn current(&self) -> Option<&Rc<T>> {
        self.value.as_ref()
    }
}

impl<T> Default for Binding<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the owning component passes in on a render.
pub struct FlameChartProps<P> {
    pub data: Option<Rc<FlameChartNodes>>,
    pub marks: Option<Rc<Marks>>,
    pub waterfall: Option<Rc<Waterfall>>,
    pub timeseries: Option<Rc<Timeseries>>,
    pub timeframe_timeseries: Option<Rc<Timeseries>>,
    pub colors: Option<Rc<Colors>>,
    pub settings: Option<Rc<Settings>>,
    pub position: Option<Rc<Position>>,
    pub zoom: Option<Rc<Zoom>>,
    pub plugins: Option<Rc<Vec<P>>>,
    /// Styling handle (a class name) for the container.
    pub class_name: Option<String>,
    pub on_select: Option<SelectListener>,
}

impl<P> Default for FlameChartProps<P> {
    fn default() -> Self {
        Self {
            data: None,
            marks: None,
            waterfall: None,
            timeseries: None,
            timeframe_timeseries: None,
            colors: None,
            settings: None,
            position: None,
            zoom: None,
            plugins: None,
            class_name: None,
            on_select: None,
        }
    }
}

impl<P> Clone for FlameChartProps<P> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            marks: self.marks.clone(),
            waterfall: self.waterfall.clone(),
            timeseries: self.timeseries.clone(),
            timeframe_timeseries: self.timeframe_timeseries.clone(),
            colors: self.colors.clone(),
            settings: self.settings.clone(),
            position: self.position.clone(),
            zoom: self.zoom.clone(),
            plugins: self.plugins.clone(),
            class_name: self.class_name.clone(),
            on_select: self.on_select.clone(),
        }
    }
}

/// The per-slot bindings of one adapter instance.
///
/// `colors` and `plugins` have no mutator on the engine; they are only
/// tracked so construction can read them.
pub struct PropSynchronizer<P> {
    pub data: Binding<FlameChartNodes>,
    pub marks: Binding<Marks>,
    pub waterfall: Binding<Waterfall>,
    pub timeseries: Binding<Timeseries>,
    pub timeframe_timeseries: Binding<Timeseries>,
    pub settings: Binding<Settings>,
    pub position: Binding<Position>,
    pub zoom: Binding<Zoom>,
    pub colors: Binding<Colors>,
    pub plugins: Binding<Vec<P>>,
}

impl<P> PropSynchronizer<P> {
    pub fn new() -> Self {
        Self {
            data: Binding::new(),
            marks: Binding::new(),
            waterfall: Binding::new(),
            timeseries: Binding::new(),
            timeframe_timeseries: Binding::new(),
            settings: Binding::new(),
            position: Binding::new(),
            zoom: Binding::new(),
            colors: Binding::new(),
            plugins: Binding::new(),
        }
    }

    pub fn sync_data<E: Engine>(&mut self, value: Option<Rc<FlameChartNodes>>, engine: Option<&mut E>) {
        if let (Some(data), Some(engine)) = (self.data.observe(value), engine) {
            log::trace!("set_nodes ({} roots)", data.len());
            engine.set_nodes(&data);
        }
    }

    pub fn sync_marks<E: Engine>(&mut self, value: Option<Rc<Marks>>, engine: Option<&mut E>) {
        if let (Some(marks), Some(engine)) = (self.marks.observe(value), engine) {
            log::trace!("set_marks ({} marks)", marks.len());
            engine.set_marks(&marks);
        }
    }

    pub fn sync_waterfall<E: Engine>(&mut self, value: Option<Rc<Waterfall>>, engine: Option<&mut E>) {
        if let (Some(waterfall), Some(engine)) = (self.waterfall.observe(value), engine) {
            log::trace!("set_waterfall ({} items)", waterfall.items.len());
            engine.set_waterfall(&waterfall);
        }
    }

    pub fn sync_timeseries<E: Engine>(&mut self, value: Option<Rc<Timeseries>>, engine: Option<&mut E>) {
        if let (Some(timeseries), Some(engine)) = (self.timeseries.observe(value), engine) {
            log::trace!("set_timeseries ({} charts)", timeseries.len());
            engine.set_timeseries(&timeseries);
        }
    }

    pub fn sync_timeframe_timeseries<E: Engine>(
        &mut self,
        value: Option<Rc<Timeseries>>,
        engine: Option<&mut E>,
    ) {
        if let (Some(timeseries), Some(engine)) = (self.timeframe_timeseries.observe(value), engine) {
            log::trace!("set_timeframe_timeseries ({} charts)", timeseries.len());
            engine.set_timeframe_timeseries(&timeseries);
        }
    }

    /// Settings go through a fixed three-step sequence: apply, relayout,
    /// repaint.
    pub fn sync_settings<E: Engine>(&mut self, value: Option<Rc<Settings>>, engine: Option<&mut E>) {
        if let (Some(settings), Some(engine)) = (self.settings.observe(value), engine) {
            log::trace!("set_settings + relayout + render");
            engine.set_settings(&settings);
            engine.recalc_children_layout();
            engine.render();
        }
    }

    pub fn sync_position<E: Engine>(&mut self, value: Option<Rc<Position>>, engine: Option<&mut E>) {
        if let (Some(position), Some(engine)) = (self.position.observe(value), engine) {
            log::trace!("set_flame_chart_position ({}, {})", position.x, position.y);
            engine.set_flame_chart_position(*position);
        }
    }

    pub fn sync_zoom<E: Engine>(&mut self, value: Option<Rc<Zoom>>, engine: Option<&mut E>) {
        if let (Some(zoom), Some(engine)) = (self.zoom.observe(value), engine) {
            log::trace!("set_zoom ({}..{})", zoom.start, zoom.end);
            engine.set_zoom(zoom.start, zoom.end);
        }
    }

    /// Put the current viewport (position, then zoom) on a freshly built
    /// engine.
    pub fn replay_view_state<E: Engine>(&self, engine: &mut E) {
        if let Some(position) = self.position.current() {
            log::trace!("replay position ({}, {})", position.x, position.y);
            engine.set_flame_chart_position(**position);
        }
        if let Some(zoom) = self.zoom.current() {
            log::trace!("replay zoom ({}..{})", zoom.start, zoom.end);
            engine.set_zoom(zoom.start, zoom.end);
        }
    }

    /// Construction-time only.
    pub fn sync_colors(&mut self, value: Option<Rc<Colors>>) {
        self.colors.observe(value);
    }

    /// Construction-time only.
    pub fn sync_plugins(&mut self, value: Option<Rc<Vec<P>>>) {
        self.plugins.observe(value);
    }
}

impl<P> Default for PropSynchronizer<P> {
    fn default() -> Self {
        Self::new()
    }
}
