//! Desktop runtime capabilities exposed on `window.runtime`.
//!
//! Outside the desktop shell the object is missing; every capability here
//! then reports itself unavailable and callers fall back.

use dub_bridge_core::{CapabilityError, DirectoryDialog, TextPrompt};
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

fn runtime() -> Option<Object> {
    let window = web_sys::window()?;
    Reflect::get(&window, &JsValue::from_str("runtime"))
        .ok()?
        .dyn_into::<Object>()
        .ok()
}

fn runtime_fn(name: &str) -> Option<(Object, Function)> {
    let runtime = runtime()?;
    let f = Reflect::get(&runtime, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    Some((runtime, f))
}

fn describe(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

/// `runtime.OpenDirectoryDialog`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuntimeDialog;

impl DirectoryDialog for RuntimeDialog {
    fn is_available(&self) -> bool {
        runtime_fn("OpenDirectoryDialog").is_some()
    }

    async fn open_directory(&self, title: &str) -> Result<Option<String>, CapabilityError> {
        let (runtime, open) =
            runtime_fn("OpenDirectoryDialog").ok_or(CapabilityError::Unavailable)?;

        let options = Object::new();
        Reflect::set(&options, &JsValue::from_str("title"), &JsValue::from_str(title))
            .map_err(|e| CapabilityError::Failed(describe(&e)))?;

        let pending = open
            .call1(&runtime, &options)
            .map_err(|e| CapabilityError::Failed(describe(&e)))?;
        let path = match pending.dyn_into::<Promise>() {
            Ok(promise) => JsFuture::from(promise)
                .await
                .map_err(|e| CapabilityError::Failed(describe(&e)))?,
            Err(value) => value,
        };
        Ok(path.as_string())
    }
}

/// `window.prompt`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowPrompt;

impl TextPrompt for WindowPrompt {
    fn prompt(&self, message: &str) -> Option<String> {
        let window = web_sys::window()?;
        match window.prompt_with_message(message) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::debug!(target: "dub::capability", "prompt failed: {:?}", e);
                None
            }
        }
    }
}

/// Registration of a `runtime.OnFileDrop` callback. Dropping it
/// unregisters the callback.
pub struct FileDropHook {
    _callback: Closure<dyn FnMut(f64, f64, JsValue)>,
}

impl Drop for FileDropHook {
    fn drop(&mut self) {
        if let Some((runtime, off)) = runtime_fn("OnFileDropOff") {
            if let Err(e) = off.call0(&runtime) {
                tracing::debug!(target: "dub::drop", "failed to unregister file drop: {:?}", e);
            }
        }
    }
}

/// Whether the runtime reports native file drops.
pub fn file_drop_available() -> bool {
    runtime_fn("OnFileDrop").is_some()
}

/// Register `on_drop(x, y, paths)` for native file drops. None when the
/// runtime does not provide file drops.
pub fn on_file_drop(
    mut on_drop: impl FnMut(f64, f64, Vec<String>) + 'static,
) -> Result<Option<FileDropHook>, JsValue> {
    let Some((runtime, register)) = runtime_fn("OnFileDrop") else {
        return Ok(None);
    };

    let callback = Closure::<dyn FnMut(f64, f64, JsValue)>::new(move |x, y, paths: JsValue| {
        let paths = match paths.dyn_into::<Array>() {
            Ok(array) => array.iter().filter_map(|p| p.as_string()).collect(),
            Err(_) => Vec::new(),
        };
        on_drop(x, y, paths);
    });
    // Second argument: do not restrict drops to CSS drop targets.
    register.call2(&runtime, callback.as_ref(), &JsValue::FALSE)?;

    Ok(Some(FileDropHook {
        _callback: callback,
    }))
}
