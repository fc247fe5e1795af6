//! Conversions across the JavaScript boundary

use cascade_core::Song;
use serde::Serialize;
use std::sync::Arc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Serialize a value for JavaScript, `null` on failure
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

/// Parse an array of songs handed in from JavaScript
pub fn songs_from_js(value: JsValue) -> Result<Vec<Arc<Song>>, JsValue> {
    let songs: Vec<Song> = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse songs: {}", e)))?;
    Ok(songs.into_iter().map(Arc::new).collect())
}

/// Parse a single song handed in from JavaScript
pub fn song_from_js(value: JsValue) -> Result<Arc<Song>, JsValue> {
    serde_wasm_bindgen::from_value::<Song>(value)
        .map(Arc::new)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse song: {}", e)))
}

/// Readable text for a rejected promise or thrown value
pub fn describe_js_error(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
