//! Browser layer for the dub bridge.
//!
//! Implements the core platform traits on top of `web-sys` and installs the
//! document listeners that drive the coordinator. It assumes a
//! `wasm32-unknown-unknown` target environment with htmx on the page.
//!
//! # Architecture
//!
//! - `dom`: `DomPlatform` over the live document
//! - `timers`: `TimerPlatform` on `setTimeout`
//! - `htmx`: swap event details and `htmx.ajax` requests
//! - `runtime`: desktop runtime dialog, prompt fallback and file drops
//! - `theme`: LocalStorage theme store and root attribute
//! - `listeners`: event wiring and the installed handle
//!
//! # Re-exports
//!
//! This crate re-exports `dub-bridge-core` for convenience, so consumers
//! only need to depend on `dub-bridge-browser`.

pub use dub_bridge_core;
pub use dub_bridge_core::*;

pub mod dom;
pub mod htmx;
pub mod listeners;
pub mod runtime;
pub mod theme;
pub mod timers;

pub use dom::WebDom;
pub use listeners::{BridgeHandle, WebBridge, install};
pub use runtime::{RuntimeDialog, WindowPrompt, file_drop_available};
pub use theme::{LocalStorageThemeStore, apply_theme};
pub use timers::WebTimers;
