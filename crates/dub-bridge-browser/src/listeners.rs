//! Wiring document events to the coordinator.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use dub_bridge_core::{
    Bridge, BridgeConfig, BridgeError, SwapDecision, Theme, load_theme, select_directory,
    toggle_theme,
};
use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget};

use crate::dom::WebDom;
use crate::htmx;
use crate::runtime::{self, FileDropHook, RuntimeDialog, WindowPrompt};
use crate::theme::{LocalStorageThemeStore, apply_theme};
use crate::timers::WebTimers;

pub type WebBridge = Bridge<WebDom, WebTimers>;

/// Installed bridge. Dropping it removes every listener and cancels every
/// pending commit.
pub struct BridgeHandle {
    bridge: Rc<RefCell<WebBridge>>,
    _listeners: Vec<EventListener>,
    _file_drop: Option<FileDropHook>,
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

/// Run `f` on the bridge if it is still alive and not already borrowed.
fn with_bridge<R>(
    weak: &Weak<RefCell<WebBridge>>,
    what: &'static str,
    f: impl FnOnce(&mut WebBridge) -> R,
) -> Option<R> {
    let bridge = weak.upgrade()?;
    let Ok(mut guard) = bridge.try_borrow_mut() else {
        tracing::warn!(target: "dub::bridge", what, "bridge busy, dropping event");
        return None;
    };
    Some(f(&mut guard))
}

fn listen(
    target: &EventTarget,
    event_type: &'static str,
    weak: &Weak<RefCell<WebBridge>>,
    handler: impl Fn(&mut WebBridge, &Event) + 'static,
) -> EventListener {
    let weak = weak.clone();
    EventListener::new(target, event_type, move |event| {
        with_bridge(&weak, event_type, |bridge| handler(bridge, event));
    })
}

/// Attach the bridge to the current document.
///
/// Listens for composition and input events, gates htmx swaps of the
/// managed content region, and registers the desktop runtime's file drop
/// hook when one exists. The stored theme is applied immediately.
pub fn install(config: BridgeConfig) -> Result<BridgeHandle, JsValue> {
    let dom = WebDom::new().ok_or_else(|| JsValue::from_str("no document"))?;
    let document: EventTarget = dom.document().clone().into();
    let timers = WebTimers::new();

    let bridge = Rc::new(RefCell::new(
        Bridge::new(dom, timers.clone(), config).map_err(to_js)?,
    ));
    let weak = Rc::downgrade(&bridge);

    {
        let weak = weak.clone();
        timers.connect(move |key, generation| {
            with_bridge(&weak, "timer", |bridge| bridge.on_timer_fired(&key, generation));
        });
    }

    let listeners = vec![
        listen(&document, "compositionstart", &weak, |bridge, _| {
            bridge.on_composition_start();
        }),
        listen(&document, "compositionend", &weak, |bridge, event| {
            bridge.on_composition_end(event_element(event).as_ref());
        }),
        listen(&document, "input", &weak, |bridge, event| {
            if let Some(target) = event_element(event) {
                bridge.on_input(&target);
            }
        }),
        listen(&document, htmx::BEFORE_SWAP, &weak, |bridge, event| {
            let target = htmx::swap_target(event);
            if bridge.before_swap(target.as_ref()) == SwapDecision::Veto {
                if let Err(e) = htmx::veto_swap(event) {
                    tracing::warn!(target: "dub::swap", "could not veto swap: {:?}", e);
                }
            }
        }),
        listen(&document, htmx::AFTER_SETTLE, &weak, |bridge, _| {
            bridge.after_settle();
        }),
    ];

    let file_drop = {
        let weak = weak.clone();
        runtime::on_file_drop(move |x, y, paths| {
            let classified = with_bridge(&weak, "drop", |bridge| {
                bridge
                    .classify_drop(x, y, &paths)
                    .map(|request| (request, bridge.config().clone()))
            });
            if let Some(Some((request, config))) = classified {
                if let Err(e) = htmx::submit(&request, &config) {
                    tracing::warn!(target: "dub::drop", "failed to submit drop: {:?}", e);
                }
            }
        })?
    };

    tracing::info!(
        target: "dub::bridge",
        file_drop = file_drop.is_some(),
        htmx = htmx::is_loaded(),
        "bridge installed"
    );
    let handle = BridgeHandle {
        bridge,
        _listeners: listeners,
        _file_drop: file_drop,
    };
    if let Err(e) = apply_theme(handle.theme()) {
        tracing::warn!(target: "dub::theme", "failed to apply stored theme: {e}");
    }
    Ok(handle)
}

impl BridgeHandle {
    pub fn bridge(&self) -> &Rc<RefCell<WebBridge>> {
        &self.bridge
    }

    pub fn config(&self) -> BridgeConfig {
        self.bridge.borrow().config().clone()
    }

    pub fn is_composing(&self) -> bool {
        self.bridge.borrow().is_composing()
    }

    /// Ask for a directory and scan it. Returns whether a scan was issued.
    pub async fn select_directory(&self) -> Result<bool, JsValue> {
        // Not borrowed across the await: events keep flowing meanwhile.
        let config = self.config();
        let Some(request) = select_directory(&RuntimeDialog, &WindowPrompt, &config).await else {
            return Ok(false);
        };
        htmx::submit(&request, &config)?;
        Ok(true)
    }

    pub fn insert_shortcut(&self, field_name: &str, shortcut: &str) -> Result<(), BridgeError> {
        let Ok(mut bridge) = self.bridge.try_borrow_mut() else {
            tracing::warn!(
                target: "dub::shortcut",
                field = field_name,
                "bridge busy, shortcut not inserted"
            );
            return Err(BridgeError::Busy);
        };
        bridge.insert_shortcut(field_name, shortcut)
    }

    pub fn theme(&self) -> Theme {
        load_theme(&LocalStorageThemeStore, &self.config().theme_storage_key)
    }

    /// Advance, persist and apply the theme.
    pub fn toggle_theme(&self) -> Result<Theme, JsValue> {
        let theme = toggle_theme(&LocalStorageThemeStore, &self.config().theme_storage_key);
        apply_theme(theme).map_err(to_js)?;
        Ok(theme)
    }
}
