// Web UI error types

use wasm_bindgen::JsValue;

/// Failures of browser APIs used by the UI
#[derive(Debug, Clone, PartialEq)]
pub enum UiError {
    /// A DOM call was rejected or an element was missing
    Dom(String),
    /// Reading a picked or dropped file failed
    FileRead(String),
}

impl UiError {
    pub fn dom(value: JsValue) -> Self {
        UiError::Dom(js_message(&value))
    }

    pub fn file_read(value: JsValue) -> Self {
        UiError::FileRead(js_message(&value))
    }
}

/// Best-effort text of a thrown JS value
pub fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

impl std::fmt::Display for UiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UiError::Dom(msg) => write!(f, "Browser error: {}", msg),
            UiError::FileRead(msg) => write!(f, "Could not read the file: {}", msg),
        }
    }
}

impl std::error::Error for UiError {}
