//! Boundary to the host: the rendering engine and the two UI resources.
//!
//! The adapter never draws anything itself. A [`Backend`] supplies the
//! concrete container, drawing surface and engine types, and constructs an
//! engine from [`EngineOptions`]. Everything the adapter does afterwards
//! goes through the [`Engine`] mutators and its `select` event channel.

use crate::model::*;
use std::fmt;
use std::rc::Rc;

/// Height reserved below the drawing surface for the container's border
/// and scrollbar.
pub const SURFACE_INSET: f64 = 3.0;

/// A measured box, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxSize {
    pub width: f64,
    pub height: f64,
}

impl BoxSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The area handed to the surface and engine: full width, height minus
    /// [`SURFACE_INSET`], never negative.
    pub fn usable(self) -> Self {
        Self {
            width: self.width.max(0.0),
            height: (self.height - SURFACE_INSET).max(0.0),
        }
    }
}

/// Event channels the adapter subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineEvent {
    Select,
}

impl EngineEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineEvent::Select => "select",
        }
    }
}

/// A selection callback. Identity is the allocation it points at: clones
/// of one listener are the same listener, two listeners built from equal
/// closures are not.
#[derive(Clone)]
pub struct SelectListener(Rc<dyn Fn(Option<&Selection>)>);

impl SelectListener {
    pub fn new(f: impl Fn(Option<&Selection>) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, selection: Option<&Selection>) {
        (self.0)(selection);
    }

    /// Identity comparison.
    pub fn same(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl fmt::Debug for SelectListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SelectListener({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// A live resize subscription on a container.
pub trait ResizeObservation {
    /// Stop delivering resize events. Must be safe to call twice.
    fn disconnect(&mut self);
}

/// The layout container the surface lives in.
pub trait Container {
    type Observation: ResizeObservation;

    /// Current content-box size.
    fn content_box(&self) -> BoxSize;

    /// Start observing the content box. The callback must not be invoked
    /// synchronously from within this call.
    fn observe_resize(&self, on_resize: Box<dyn FnMut(BoxSize)>) -> Self::Observation;

    /// Whether `other` refers to the same underlying resource.
    fn same_handle(&self, other: &Self) -> bool;
}

/// The 2D drawing surface the engine paints onto.
pub trait Surface {
    fn set_size(&self, size: BoxSize);

    /// Whether `other` refers to the same underlying resource.
    fn same_handle(&self, other: &Self) -> bool;
}

/// Mutators and observers of a live engine.
pub trait Engine {
    fn resize(&mut self, width: f64, height: f64);
    fn set_nodes(&mut self, data: &FlameChartNodes);
    fn set_marks(&mut self, marks: &Marks);
    fn set_waterfall(&mut self, waterfall: &Waterfall);
    fn set_timeseries(&mut self, timeseries: &Timeseries);
    fn set_timeframe_timeseries(&mut self, timeseries: &Timeseries);
    fn set_settings(&mut self, settings: &Settings);
    fn recalc_children_layout(&mut self);
    fn render(&mut self);
    fn set_flame_chart_position(&mut self, position: Position);
    fn set_zoom(&mut self, start: f64, end: f64);
    fn on(&mut self, event: EngineEvent, listener: SelectListener);
    /// Removing a listener that is not registered is a no-op.
    fn remove_listener(&mut self, event: EngineEvent, listener: &SelectListener);
}

/// Everything an engine is constructed from: the surface plus the value of
/// every input slot at construction time.
pub struct EngineOptions<'a, B: Backend + ?Sized> {
    pub surface: &'a B::Surface,
    pub data: Option<&'a Rc<FlameChartNodes>>,
    pub marks: Option<&'a Rc<Marks>>,
    pub waterfall: Option<&'a Rc<Waterfall>>,
    pub timeseries: Option<&'a Rc<Timeseries>>,
    pub timeframe_timeseries: Option<&'a Rc<Timeseries>>,
    pub settings: Option<&'a Rc<Settings>>,
    pub colors: Option<&'a Rc<Colors>>,
    pub plugins: Option<&'a Rc<Vec<B::Plugin>>>,
}

/// Host integration: the concrete resource and engine types, and the
/// engine constructor.
pub trait Backend {
    type Container: Container;
    type Surface: Surface;
    type Engine: Engine;
    type Plugin;

    fn create_engine(&self, options: EngineOptions<'_, Self>) -> Self::Engine;
}
