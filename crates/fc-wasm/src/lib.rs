//! WASM bridge: hosts a `flame-chart-js` engine behind declarative props.
//!
//! Compiled via `wasm-pack build --target web`. JavaScript creates a
//! [`FlameChartElement`] under a parent node, then pushes props into it as
//! JSON. The element renders `<div><canvas/></div>`, hands both to the
//! `fc-core` component, and the component decides when to build, feed,
//! resize and tear down the engine.

mod codec;
mod dom;
mod engine;
mod logger;

use codec::{parse_slot, selection_to_js};
use dom::{WebContainer, WebSurface};
use engine::{RawTargets, WebBackend};
use fc_core::*;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlElement};

/// One mounted flame chart.
#[wasm_bindgen]
pub struct FlameChartElement {
    component: FlameChartComponent<WebBackend>,
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    /// The JS select callback and the listener wrapping it, so passing the
    /// same function again keeps the same registration.
    on_select: Option<(js_sys::Function, SelectListener)>,
    raw_targets: RawTargets,
}

#[wasm_bindgen]
impl FlameChartElement {
    /// Render the container and canvas under `parent` and attach them.
    #[wasm_bindgen(constructor)]
    pub fn new(parent: &HtmlElement) -> Result<FlameChartElement, JsValue> {
        logger::init();

        let document = parent
            .owner_document()
            .ok_or_else(|| JsValue::from_str("parent has no owner document"))?;
        let container: HtmlElement = document.create_element("div")?.dyn_into()?;
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        container.append_child(&canvas)?;
        parent.append_child(&container)?;

        let backend = WebBackend::default();
        let raw_targets = backend.raw_targets();
        let component = FlameChartComponent::new(backend);
        // Child first, the way hosts deliver refs.
        component.attach_surface(Some(WebSurface(canvas.clone())));
        component.attach_container(Some(WebContainer(container.clone())));

        Ok(Self {
            component,
            container,
            canvas,
            on_select: None,
            raw_targets,
        })
    }

    pub fn set_data(&self, json: Option<String>) -> Result<(), JsValue> {
        let data = parse_slot::<FlameChartNodes>("data", json.as_deref())?;
        self.component.set_data(data);
        Ok(())
    }

    pub fn set_marks(&self, json: Option<String>) -> Result<(), JsValue> {
        let marks = parse_slot::<Marks>("marks", json.as_deref())?;
        self.component.set_marks(marks);
        Ok(())
    }

    pub fn set_waterfall(&self, json: Option<String>) -> Result<(), JsValue> {
        let waterfall = parse_slot::<Waterfall>("waterfall", json.as_deref())?;
        self.component.set_waterfall(waterfall);
        Ok(())
    }

    pub fn set_timeseries(&self, json: Option<String>) -> Result<(), JsValue> {
        let timeseries = parse_slot::<Timeseries>("timeseries", json.as_deref())?;
        self.component.set_timeseries(timeseries);
        Ok(())
    }

    pub fn set_timeframe_timeseries(&self, json: Option<String>) -> Result<(), JsValue> {
        let timeseries = parse_slot::<Timeseries>("timeframeTimeseries", json.as_deref())?;
        self.component.set_timeframe_timeseries(timeseries);
        Ok(())
    }

    pub fn set_settings(&self, json: Option<String>) -> Result<(), JsValue> {
        let settings = parse_slot::<Settings>("settings", json.as_deref())?;
        self.component.set_settings(settings);
        Ok(())
    }

    pub fn set_position(&self, json: Option<String>) -> Result<(), JsValue> {
        let position = parse_slot::<Position>("position", json.as_deref())?;
        self.component.set_position(position);
        Ok(())
    }

    pub fn set_zoom(&self, json: Option<String>) -> Result<(), JsValue> {
        let zoom = parse_slot::<Zoom>("zoom", json.as_deref())?;
        self.component.set_zoom(zoom);
        Ok(())
    }

    /// Colors are read when the engine is (re)built.
    pub fn set_colors(&self, json: Option<String>) -> Result<(), JsValue> {
        let colors = parse_slot::<Colors>("colors", json.as_deref())?;
        self.component.set_colors(colors);
        Ok(())
    }

    /// Plugins are read when the engine is (re)built.
    pub fn set_plugins(&self, plugins: Option<js_sys::Array>) {
        self.component
            .set_plugins(plugins.map(|list| Rc::new(list.iter().collect())));
    }

    pub fn set_class_name(&self, class_name: Option<String>) {
        self.container
            .set_class_name(class_name.as_deref().unwrap_or_default());
        self.component.set_class_name(class_name);
    }

    /// Set or clear the select callback. It receives the selection payload
    /// (`{ type, node }` or `null`); a payload the model cannot read is
    /// handed over exactly as the engine sent it.
    pub fn set_on_select(&mut self, callback: Option<js_sys::Function>) {
        let listener = match callback {
            None => {
                self.on_select = None;
                None
            }
            Some(function) => {
                let known = self
                    .on_select
                    .as_ref()
                    .filter(|(known, _)| js_sys::Object::is(known, &function))
                    .map(|(_, listener)| listener.clone());
                let listener = known.unwrap_or_else(|| wrap_callback(function.clone()));
                self.on_select = Some((function, listener.clone()));
                Some(listener)
            }
        };
        self.raw_targets.set(
            self.on_select
                .as_ref()
                .map(|(function, listener)| (listener.clone(), function.clone())),
        );
        self.component.set_on_select(listener);
    }

    /// Swap in a fresh `<canvas>`; the engine is rebuilt on it.
    pub fn replace_surface(&mut self) -> Result<(), JsValue> {
        let document = self
            .container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("container has no owner document"))?;
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        self.container.replace_child(&canvas, &self.canvas)?;
        self.canvas = canvas.clone();
        self.component.attach_surface(Some(WebSurface(canvas)));
        Ok(())
    }

    /// Tear down and remove the rendered nodes. The element is inert after.
    pub fn unmount(&mut self) {
        self.component.unmount();
        self.on_select = None;
        self.raw_targets.set(None);
        self.container.remove();
    }

    pub fn has_engine(&self) -> bool {
        self.component.has_engine()
    }

    /// Console log verbosity. Returns `false` for an unknown level name.
    pub fn set_log_level(level: &str) -> bool {
        match logger::parse_level(level) {
            Some(filter) => {
                log::set_max_level(filter);
                true
            }
            None => false,
        }
    }
}

fn wrap_callback(function: js_sys::Function) -> SelectListener {
    SelectListener::new(move |selection| {
        if let Err(e) = function.call1(&JsValue::NULL, &selection_to_js(selection)) {
            log::error!("select callback threw: {e:?}");
        }
    })
}
