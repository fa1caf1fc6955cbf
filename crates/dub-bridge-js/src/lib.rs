//! WASM bindings for the dub htmx bridge.
//!
//! Load the module, then create one `DubBridge` per page:
//!
//! ```js
//! import init, { DubBridge } from "dub-bridge-js";
//! await init();
//! window.dub = new DubBridge({ legacyRules: true });
//! ```

mod bridge;
mod types;

pub use bridge::*;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    install_subscriber();
}

/// Route `tracing` output to the browser console. Returns false when a
/// subscriber was already installed, by the host or an earlier call.
fn install_subscriber() -> bool {
    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    match set_global_default(Registry::default().with(wasm_layer)) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(target: "dub::init", "keeping existing subscriber: {e}");
            false
        }
    }
}
