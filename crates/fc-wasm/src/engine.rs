//! The `flame-chart-js` engine, imported from JavaScript.

use crate::codec::{selection_from_js, to_js};
use crate::dom::{WebContainer, WebSurface};
use fc_core::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "flame-chart-js")]
extern "C" {
    pub type FlameChart;

    #[wasm_bindgen(constructor)]
    fn new(options: &JsValue) -> FlameChart;

    #[wasm_bindgen(method)]
    fn resize(this: &FlameChart, width: f64, height: f64);

    #[wasm_bindgen(method, js_name = "setNodes")]
    fn set_nodes(this: &FlameChart, nodes: &JsValue);

    #[wasm_bindgen(method, js_name = "setMarks")]
    fn set_marks(this: &FlameChart, marks: &JsValue);

    #[wasm_bindgen(method, js_name = "setWaterfall")]
    fn set_waterfall(this: &FlameChart, waterfall: &JsValue);

    #[wasm_bindgen(method, js_name = "setTimeseries")]
    fn set_timeseries(this: &FlameChart, timeseries: &JsValue);

    #[wasm_bindgen(method, js_name = "setTimeframeTimeseries")]
    fn set_timeframe_timeseries(this: &FlameChart, timeseries: &JsValue);

    #[wasm_bindgen(method, js_name = "setSettings")]
    fn set_settings(this: &FlameChart, settings: &JsValue);

    #[wasm_bindgen(method)]
    fn render(this: &FlameChart);

    #[wasm_bindgen(method, js_name = "setFlameChartPosition")]
    fn set_flame_chart_position(this: &FlameChart, position: &JsValue);

    #[wasm_bindgen(method, js_name = "setZoom")]
    fn set_zoom(this: &FlameChart, start: f64, end: f64);

    #[wasm_bindgen(method)]
    fn on(this: &FlameChart, event: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method, js_name = "removeListener")]
    fn remove_listener(this: &FlameChart, event: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method, getter, js_name = "renderEngine")]
    fn render_engine(this: &FlameChart) -> RenderEngine;

    type RenderEngine;

    #[wasm_bindgen(method, js_name = "recalcChildrenLayout")]
    fn recalc_children_layout(this: &RenderEngine);
}

type SelectClosure = Closure<dyn FnMut(JsValue)>;

/// The JS function behind each select listener. A payload the model cannot
/// decode goes to that function as the engine sent it.
#[derive(Clone, Default)]
pub struct RawTargets(Rc<RefCell<Vec<(SelectListener, js_sys::Function)>>>);

impl RawTargets {
    pub fn set(&self, target: Option<(SelectListener, js_sys::Function)>) {
        let mut targets = self.0.borrow_mut();
        targets.clear();
        targets.extend(target);
    }

    fn forward(&self, listener: &SelectListener, payload: &JsValue) {
        let function = self
            .0
            .borrow()
            .iter()
            .find(|(known, _)| known.same(listener))
            .map(|(_, function)| function.clone());
        let Some(function) = function else {
            log::warn!("undecodable select payload dropped: no JS target");
            return;
        };
        if let Err(e) = function.call1(&JsValue::NULL, payload) {
            log::error!("select callback threw: {e:?}");
        }
    }
}

/// A live JS engine plus the JS functions handed to its `on`, paired with
/// the listener each one forwards to.
pub struct WebEngine {
    chart: FlameChart,
    listeners: Vec<(SelectListener, SelectClosure)>,
    raw: RawTargets,
}

impl Engine for WebEngine {
    fn resize(&mut self, width: f64, height: f64) {
        self.chart.resize(width, height);
    }

    fn set_nodes(&mut self, data: &FlameChartNodes) {
        self.chart.set_nodes(&to_js(data));
    }

    fn set_marks(&mut self, marks: &Marks) {
        self.chart.set_marks(&to_js(marks));
    }

    fn set_waterfall(&mut self, waterfall: &Waterfall) {
        self.chart.set_waterfall(&to_js(waterfall));
    }

    fn set_timeseries(&mut self, timeseries: &Timeseries) {
        self.chart.set_timeseries(&to_js(timeseries));
    }

    fn set_timeframe_timeseries(&mut self, timeseries: &Timeseries) {
        self.chart.set_timeframe_timeseries(&to_js(timeseries));
    }

    fn set_settings(&mut self, settings: &Settings) {
        self.chart.set_settings(&to_js(settings));
    }

    fn recalc_children_layout(&mut self) {
        self.chart.render_engine().recalc_children_layout();
    }

    fn render(&mut self) {
        self.chart.render();
    }

    fn set_flame_chart_position(&mut self, position: Position) {
        self.chart.set_flame_chart_position(&to_js(&position));
    }

    fn set_zoom(&mut self, start: f64, end: f64) {
        self.chart.set_zoom(start, end);
    }

    fn on(&mut self, event: EngineEvent, listener: SelectListener) {
        let target = listener.clone();
        let raw = self.raw.clone();
        let closure = Closure::wrap(Box::new(move |payload: JsValue| {
            match selection_from_js(&payload) {
                Ok(selection) => target.call(selection.as_ref()),
                Err(e) => {
                    log::warn!("select payload outside the model ({e}), passed through raw");
                    raw.forward(&target, &payload);
                }
            }
        }) as Box<dyn FnMut(JsValue)>);
        self.chart.on(event.as_str(), closure.as_ref().unchecked_ref());
        self.listeners.push((listener, closure));
    }

    fn remove_listener(&mut self, event: EngineEvent, listener: &SelectListener) {
        let Some(pos) = self.listeners.iter().position(|(l, _)| l.same(listener)) else {
            return;
        };
        let (_, closure) = self.listeners.remove(pos);
        self.chart
            .remove_listener(event.as_str(), closure.as_ref().unchecked_ref());
    }
}

/// Builds [`WebEngine`]s on DOM handles. Plugins are opaque JS objects.
#[derive(Default, Clone)]
pub struct WebBackend {
    raw: RawTargets,
}

impl WebBackend {
    /// Shared with every engine this backend builds.
    pub fn raw_targets(&self) -> RawTargets {
        self.raw.clone()
    }
}

impl Backend for WebBackend {
    type Container = WebContainer;
    type Surface = WebSurface;
    type Engine = WebEngine;
    type Plugin = JsValue;

    fn create_engine(&self, options: EngineOptions<'_, Self>) -> WebEngine {
        let js = js_sys::Object::new();
        set(&js, "canvas", &options.surface.0);
        if let Some(data) = options.data {
            set(&js, "data", &to_js(&**data));
        }
        if let Some(marks) = options.marks {
            set(&js, "marks", &to_js(&**marks));
        }
        if let Some(waterfall) = options.waterfall {
            set(&js, "waterfall", &to_js(&**waterfall));
        }
        if let Some(timeseries) = options.timeseries {
            set(&js, "timeseries", &to_js(&**timeseries));
        }
        if let Some(timeseries) = options.timeframe_timeseries {
            set(&js, "timeframeTimeseries", &to_js(&**timeseries));
        }
        if let Some(settings) = options.settings {
            set(&js, "settings", &to_js(&**settings));
        }
        if let Some(colors) = options.colors {
            set(&js, "colors", &to_js(&**colors));
        }
        if let Some(plugins) = options.plugins {
            let array: js_sys::Array = plugins.iter().collect();
            set(&js, "plugins", &array);
        }

        WebEngine {
            chart: FlameChart::new(&js),
            listeners: Vec::new(),
            raw: self.raw.clone(),
        }
    }
}

fn set(target: &js_sys::Object, key: &str, value: &JsValue) {
    if let Err(e) = js_sys::Reflect::set(target, &JsValue::from_str(key), value) {
        log::error!("could not set engine option `{key}`: {e:?}");
    }
}
