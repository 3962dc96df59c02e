//! DOM-backed resource handles: the container `<div>` and the `<canvas>`.

use fc_core::{BoxSize, Container, ResizeObservation, Surface};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlElement, ResizeObserver, ResizeObserverEntry};

type ResizeClosure = Closure<dyn FnMut(js_sys::Array, JsValue)>;

/// The layout container. Identity is JS object identity.
pub struct WebContainer(pub HtmlElement);

/// A `ResizeObserver` watching one container.
pub struct WebObservation {
    observer: Option<ResizeObserver>,
    /// Kept alive for as long as the observer may call it.
    _closure: ResizeClosure,
}

impl ResizeObservation for WebObservation {
    fn disconnect(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
    }
}

impl Drop for WebObservation {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl Container for WebContainer {
    type Observation = WebObservation;

    fn content_box(&self) -> BoxSize {
        let rect = self.0.get_bounding_client_rect();
        BoxSize::new(rect.width(), rect.height())
    }

    fn observe_resize(&self, mut on_resize: Box<dyn FnMut(BoxSize)>) -> WebObservation {
        let closure = Closure::wrap(Box::new(move |entries: js_sys::Array, _observer: JsValue| {
            // A burst may batch several entries; the last one is current.
            let Some(entry) = entries
                .iter()
                .last()
                .and_then(|e| e.dyn_into::<ResizeObserverEntry>().ok())
            else {
                return;
            };
            let rect = entry.content_rect();
            on_resize(BoxSize::new(rect.width(), rect.height()));
        }) as Box<dyn FnMut(js_sys::Array, JsValue)>);

        let observer = match ResizeObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(&self.0);
                Some(observer)
            }
            Err(e) => {
                log::warn!("ResizeObserver unavailable, container size is fixed: {e:?}");
                None
            }
        };
        WebObservation {
            observer,
            _closure: closure,
        }
    }

    fn same_handle(&self, other: &Self) -> bool {
        js_sys::Object::is(&self.0, &other.0)
    }
}

/// The drawing surface.
pub struct WebSurface(pub HtmlCanvasElement);

impl Surface for WebSurface {
    fn set_size(&self, size: BoxSize) {
        self.0.set_width(to_pixels(size.width));
        self.0.set_height(to_pixels(size.height));
    }

    fn same_handle(&self, other: &Self) -> bool {
        js_sys::Object::is(&self.0, &other.0)
    }
}

fn to_pixels(css: f64) -> u32 {
    css.max(0.0).round() as u32
}
