//! JSON codec between the `fc-core` model and JavaScript values.
//!
//! Model values cross the boundary as JSON text: Rust → `serde_json` →
//! `JSON.parse`, and back via `JSON.stringify` → `serde_json`. The string
//! halves are kept separate from the `JsValue` halves so they run natively.

use fc_core::Selection;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::rc::Rc;
use wasm_bindgen::JsValue;

/// Decode one input slot. `None` (JS `undefined`) is an absent value.
pub fn parse_slot<T: DeserializeOwned>(slot: &str, json: Option<&str>) -> Result<Option<Rc<T>>, String> {
    let Some(json) = json else {
        return Ok(None);
    };
    serde_json::from_str(json)
        .map(|value| Some(Rc::new(value)))
        .map_err(|e| format!("invalid `{slot}`: {e}"))
}

/// Decode a selection payload. `null` is a cleared selection; a payload
/// the model cannot read is an error, not an empty selection.
pub fn decode_selection(json: &str) -> Result<Option<Selection>, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            log::error!("failed to encode value for the engine: {e}");
            return JsValue::UNDEFINED;
        }
    };
    js_sys::JSON::parse(&json).unwrap_or(JsValue::UNDEFINED)
}

pub fn selection_from_js(payload: &JsValue) -> Result<Option<Selection>, String> {
    if payload.is_null() || payload.is_undefined() {
        return Ok(None);
    }
    let json = js_sys::JSON::stringify(payload).map_err(|e| format!("{e:?}"))?;
    decode_selection(&String::from(json)).map_err(|e| e.to_string())
}

pub fn selection_to_js(selection: Option<&Selection>) -> JsValue {
    match selection {
        Some(selection) => to_js(selection),
        None => JsValue::NULL,
    }
}
