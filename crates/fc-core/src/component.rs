//! The adapter instance bound to one mount point.
//!
//! [`FlameChartComponent`] owns at most one engine and keeps it in step
//! with the host:
//!
//! - **Handles**: the container and surface arrive independently, in any
//!   order. Every identity change re-runs construction. An engine exists
//!   only while both handles are attached, and replacing either one
//!   discards the old engine and builds a new one from the current slot
//!   values. Position and zoom follow construction as mutator calls.
//! - **Resize**: the container is observed while attached; each reported
//!   box resizes the surface and the engine (minus the bottom inset).
//! - **Props**: each slot forwards identity changes to its own mutator.
//! - **Select**: one callback registration at most, always the latest.
//!
//! State lives behind `Rc<RefCell<..>>` so the resize observation can call
//! back in. Nothing here fails; calls made at the wrong time (before an
//! engine exists, after unmount, or re-entrantly from inside an engine
//! call) are dropped.

use crate::engine::*;
use crate::events::EventBridge;
use crate::model::*;
use crate::refs::RefCoordinator;
use crate::resize::SizeObserver;
use crate::sync::{FlameChartProps, PropSynchronizer};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Observation<B> = <<B as Backend>::Container as Container>::Observation;

struct Inner<B: Backend> {
    backend: B,
    refs: RefCoordinator<B::Container, B::Surface>,
    engine: Option<B::Engine>,
    size: SizeObserver<Observation<B>>,
    props: PropSynchronizer<B::Plugin>,
    events: EventBridge,
    class_name: Option<String>,
    /// Number of engines constructed so far.
    generation: u64,
    unmounted: bool,
}

impl<B: Backend> Inner<B> {
    /// Drop the live engine (if any) and build a new one when both handles
    /// are attached.
    fn try_initialize(&mut self) {
        self.discard_engine();

        let Some((container, surface)) = self.refs.both() else {
            log::trace!(
                "construction deferred (container: {}, surface: {})",
                self.refs.container().is_some(),
                self.refs.surface().is_some()
            );
            return;
        };

        let usable = container.content_box().usable();
        surface.set_size(usable);

        let mut engine = self.backend.create_engine(EngineOptions {
            surface,
            data: self.props.data.current(),
            marks: self.props.marks.current(),
            waterfall: self.props.waterfall.current(),
            timeseries: self.props.timeseries.current(),
            timeframe_timeseries: self.props.timeframe_timeseries.current(),
            settings: self.props.settings.current(),
            colors: self.props.colors.current(),
            plugins: self.props.plugins.current(),
        });
        self.generation += 1;
        log::debug!(
            "engine #{} constructed at {}x{}",
            self.generation,
            usable.width,
            usable.height
        );

        self.props.replay_view_state(&mut engine);
        self.events.attach(&mut engine);
        self.engine = Some(engine);
    }

    fn discard_engine(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            self.events.detach(&mut engine);
            log::debug!("engine #{} discarded", self.generation);
        }
    }

    fn handle_resize(&mut self, size: BoxSize) {
        self.size
            .apply(size, self.refs.surface(), self.engine.as_mut());
    }

    fn apply_props(&mut self, props: FlameChartProps<B::Plugin>) {
        let engine = &mut self.engine;
        let sync = &mut self.props;
        self.class_name = props.class_name;
        sync.sync_colors(props.colors);
        sync.sync_plugins(props.plugins);
        sync.sync_data(props.data, engine.as_mut());
        sync.sync_marks(props.marks, engine.as_mut());
        sync.sync_waterfall(props.waterfall, engine.as_mut());
        sync.sync_timeseries(props.timeseries, engine.as_mut());
        sync.sync_timeframe_timeseries(props.timeframe_timeseries, engine.as_mut());
        sync.sync_settings(props.settings, engine.as_mut());
        sync.sync_position(props.position, engine.as_mut());
        sync.sync_zoom(props.zoom, engine.as_mut());
        self.events.set_listener(props.on_select, engine.as_mut());
    }

    fn teardown(&mut self) {
        if self.unmounted {
            return;
        }
        self.discard_engine();
        self.size.disconnect();
        self.refs.clear();
        self.unmounted = true;
        log::debug!("unmounted after {} engine(s)", self.generation);
    }
}

/// Declarative front for one imperative flame chart engine.
pub struct FlameChartComponent<B: Backend + 'static> {
    inner: Rc<RefCell<Inner<B>>>,
}

impl<B: Backend + 'static> FlameChartComponent<B> {
    pub fn new(backend: B) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                backend,
                refs: RefCoordinator::new(),
                engine: None,
                size: SizeObserver::new(),
                props: PropSynchronizer::new(),
                events: EventBridge::new(),
                class_name: None,
                generation: 0,
                unmounted: false,
            })),
        }
    }

    /// Run `f` on the state unless the component is unmounted or already
    /// borrowed further up the stack.
    fn with_inner<R>(&self, op: &str, f: impl FnOnce(&mut Inner<B>) -> R) -> Option<R> {
        let Ok(mut inner) = self.inner.try_borrow_mut() else {
            log::warn!("{op}: re-entrant call dropped");
            return None;
        };
        if inner.unmounted {
            log::trace!("{op} after unmount, ignored");
            return None;
        }
        Some(f(&mut *inner))
    }

    // ─── Resource handles ────────────────────────────────────────────────

    /// Attach, replace (`Some`) or detach (`None`) the layout container.
    /// Passing the handle already attached is a no-op.
    pub fn attach_container(&self, handle: Option<B::Container>) {
        let weak = Rc::downgrade(&self.inner);
        self.with_inner("attach_container", move |inner| {
            if !inner.refs.set_container(handle) {
                return;
            }
            inner.size.disconnect();
            if let Some(container) = inner.refs.container() {
                let observation = container.observe_resize(resize_callback(weak));
                inner.size.observe(observation);
            }
            inner.try_initialize();
        });
    }

    /// Attach, replace (`Some`) or detach (`None`) the drawing surface.
    /// Passing the handle already attached is a no-op.
    pub fn attach_surface(&self, handle: Option<B::Surface>) {
        self.with_inner("attach_surface", |inner| {
            if inner.refs.set_surface(handle) {
                inner.try_initialize();
            }
        });
    }

    /// Apply a container box reported by the resize observation.
    pub fn handle_resize(&self, size: BoxSize) {
        self.with_inner("handle_resize", |inner| inner.handle_resize(size));
    }

    // ─── Input slots ─────────────────────────────────────────────────────

    /// Feed every slot from one render's props.
    pub fn update(&self, props: FlameChartProps<B::Plugin>) {
        self.with_inner("update", |inner| inner.apply_props(props));
    }

    pub fn set_data(&self, data: Option<Rc<FlameChartNodes>>) {
        self.with_inner("set_data", |inner| {
            inner.props.sync_data(data, inner.engine.as_mut());
        });
    }

    pub fn set_marks(&self, marks: Option<Rc<Marks>>) {
        self.with_inner("set_marks", |inner| {
            inner.props.sync_marks(marks, inner.engine.as_mut());
        });
    }

    pub fn set_waterfall(&self, waterfall: Option<Rc<Waterfall>>) {
        self.with_inner("set_waterfall", |inner| {
            inner.props.sync_waterfall(waterfall, inner.engine.as_mut());
        });
    }

    pub fn set_timeseries(&self, timeseries: Option<Rc<Timeseries>>) {
        self.with_inner("set_timeseries", |inner| {
            inner.props.sync_timeseries(timeseries, inner.engine.as_mut());
        });
    }

    pub fn set_timeframe_timeseries(&self, timeseries: Option<Rc<Timeseries>>) {
        self.with_inner("set_timeframe_timeseries", |inner| {
            inner
                .props
                .sync_timeframe_timeseries(timeseries, inner.engine.as_mut());
        });
    }

    pub fn set_settings(&self, settings: Option<Rc<Settings>>) {
        self.with_inner("set_settings", |inner| {
            inner.props.sync_settings(settings, inner.engine.as_mut());
        });
    }

    pub fn set_position(&self, position: Option<Rc<Position>>) {
        self.with_inner("set_position", |inner| {
            inner.props.sync_position(position, inner.engine.as_mut());
        });
    }

    pub fn set_zoom(&self, zoom: Option<Rc<Zoom>>) {
        self.with_inner("set_zoom", |inner| {
            inner.props.sync_zoom(zoom, inner.engine.as_mut());
        });
    }

    /// Read at the next construction only.
    pub fn set_colors(&self, colors: Option<Rc<Colors>>) {
        self.with_inner("set_colors", |inner| inner.props.sync_colors(colors));
    }

    /// Read at the next construction only.
    pub fn set_plugins(&self, plugins: Option<Rc<Vec<B::Plugin>>>) {
        self.with_inner("set_plugins", |inner| inner.props.sync_plugins(plugins));
    }

    pub fn set_class_name(&self, class_name: Option<String>) {
        self.with_inner("set_class_name", |inner| inner.class_name = class_name);
    }

    pub fn set_on_select(&self, listener: Option<SelectListener>) {
        self.with_inner("set_on_select", |inner| {
            inner.events.set_listener(listener, inner.engine.as_mut());
        });
    }

    // ─── Teardown & inspection ───────────────────────────────────────────

    /// Unregister the select callback, release the resize observation and
    /// drop the engine. Every later call is ignored.
    pub fn unmount(&self) {
        match self.inner.try_borrow_mut() {
            Ok(mut inner) => inner.teardown(),
            Err(_) => log::warn!("unmount: re-entrant call dropped"),
        }
    }

    pub fn is_unmounted(&self) -> bool {
        self.inner.try_borrow().is_ok_and(|inner| inner.unmounted)
    }

    pub fn has_engine(&self) -> bool {
        self.inner
            .try_borrow()
            .is_ok_and(|inner| inner.engine.is_some())
    }

    pub fn class_name(&self) -> Option<String> {
        self.inner
            .try_borrow()
            .ok()
            .and_then(|inner| inner.class_name.clone())
    }
}

impl<B: Backend + 'static> Drop for FlameChartComponent<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn resize_callback<B: Backend + 'static>(weak: Weak<RefCell<Inner<B>>>) -> Box<dyn FnMut(BoxSize)> {
    Box::new(move |size| {
        let Some(cell) = weak.upgrade() else {
            return;
        };
        let Ok(mut inner) = cell.try_borrow_mut() else {
            log::warn!("resize to {}x{} arrived re-entrantly, dropped", size.width, size.height);
            return;
        };
        if !inner.unmounted {
            inner.handle_resize(size);
        }
    })
}
