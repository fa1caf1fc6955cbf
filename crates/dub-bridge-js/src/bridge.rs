//! DubBridge - the installed bridge exposed to JavaScript.

use std::rc::Rc;

use dub_bridge_browser::{BridgeHandle, install};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::types::parse_options;

/// Field that `appendShortcut` edits.
const PATTERN_FIELD: &str = "pattern";

/// The bridge attached to the current document.
///
/// Listeners stay installed until `free()` is called.
#[wasm_bindgen(js_name = DubBridge)]
pub struct JsBridge {
    handle: Rc<BridgeHandle>,
}

#[wasm_bindgen(js_class = DubBridge)]
impl JsBridge {
    /// Install the bridge on the current document.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<JsBridge, JsError> {
        let config = parse_options(options)?.into_config();
        let handle = install(config).map_err(|e| {
            JsError::new(&format!(
                "Failed to install bridge: {}",
                e.as_string().unwrap_or_else(|| format!("{:?}", e))
            ))
        })?;
        Ok(Self {
            handle: Rc::new(handle),
        })
    }

    /// Pick a directory (native dialog, or a prompt outside the desktop
    /// shell) and scan it. Resolves to whether a scan was issued.
    #[wasm_bindgen(js_name = selectDirectory)]
    pub fn select_directory(&self) -> js_sys::Promise {
        let handle = Rc::clone(&self.handle);
        future_to_promise(async move {
            handle
                .select_directory()
                .await
                .map(JsValue::from_bool)
        })
    }

    /// Insert shortcut text into the pattern field at its selection.
    #[wasm_bindgen(js_name = appendShortcut)]
    pub fn append_shortcut(&self, shortcut: &str) -> Result<(), JsError> {
        self.insert_shortcut(PATTERN_FIELD, shortcut)
    }

    /// Insert shortcut text into any named field at its selection.
    #[wasm_bindgen(js_name = insertShortcut)]
    pub fn insert_shortcut(&self, field_name: &str, shortcut: &str) -> Result<(), JsError> {
        self.handle
            .insert_shortcut(field_name, shortcut)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Cycle system → light → dark, persist, apply. Returns the new theme.
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&self) -> Result<String, JsError> {
        self.handle
            .toggle_theme()
            .map(|theme| theme.as_str().to_string())
            .map_err(|e| JsError::new(&format!("Failed to apply theme: {:?}", e)))
    }

    /// The stored theme: "system", "light" or "dark".
    #[wasm_bindgen]
    pub fn theme(&self) -> String {
        self.handle.theme().as_str().to_string()
    }

    #[wasm_bindgen(js_name = isComposing)]
    pub fn is_composing(&self) -> bool {
        self.handle.is_composing()
    }
}
