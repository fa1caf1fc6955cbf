//! htmx integration: swap event details and programmatic requests.

use dub_bridge_core::{BridgeConfig, BridgeRequest};
use js_sys::Reflect;
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event};

/// Fired before htmx replaces a target's content. `detail.shouldSwap` is
/// writable.
pub const BEFORE_SWAP: &str = "htmx:beforeSwap";

/// Fired once swapped content has settled.
pub const AFTER_SETTLE: &str = "htmx:afterSettle";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = htmx, js_name = ajax, catch)]
    fn htmx_ajax(method: &str, url: &str, context: &JsValue) -> Result<JsValue, JsValue>;
}

fn detail(event: &Event) -> Option<JsValue> {
    Reflect::get(event, &JsValue::from_str("detail"))
        .ok()
        .filter(|d| d.is_object())
}

/// The element whose content an htmx swap event replaces.
pub fn swap_target(event: &Event) -> Option<Element> {
    let detail = detail(event)?;
    Reflect::get(&detail, &JsValue::from_str("target"))
        .ok()?
        .dyn_into::<Element>()
        .ok()
}

/// Cancel the swap described by a `htmx:beforeSwap` event.
pub fn veto_swap(event: &Event) -> Result<(), JsValue> {
    let detail = detail(event).ok_or_else(|| JsValue::from_str("swap event has no detail"))?;
    Reflect::set(
        &detail,
        &JsValue::from_str("shouldSwap"),
        &JsValue::FALSE,
    )?;
    Ok(())
}

/// Whether the htmx global is loaded.
pub fn is_loaded() -> bool {
    Reflect::get(&js_sys::global(), &JsValue::from_str("htmx"))
        .map(|htmx| htmx.is_object())
        .unwrap_or(false)
}

#[derive(Serialize)]
struct PathValues<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct AjaxContext<'a> {
    values: PathValues<'a>,
    target: String,
}

/// Issue a request through `htmx.ajax`, swapping the response into the
/// managed content region.
pub fn submit(request: &BridgeRequest, config: &BridgeConfig) -> Result<(), JsValue> {
    if !is_loaded() {
        return Err(JsValue::from_str("htmx is not loaded"));
    }
    let context = serde_wasm_bindgen::to_value(&AjaxContext {
        values: PathValues {
            path: &request.path,
        },
        target: request.target_selector(config),
    })?;

    tracing::debug!(target: "dub::request", "{}", request.display(config));
    let pending = htmx_ajax(request.method(), request.endpoint(config), &context)?;

    if let Ok(promise) = pending.dyn_into::<js_sys::Promise>() {
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                tracing::warn!(target: "dub::request", "request failed: {:?}", e);
            }
        });
    }
    Ok(())
}
