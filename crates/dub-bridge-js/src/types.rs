//! Types exposed to JavaScript via wasm-bindgen.

use dub_bridge_core::{BridgeConfig, DebounceRule};
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// Debounce rule for markup without debounce attributes.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsDebounceRule {
    /// Field `name` or container `id`.
    pub key: String,
    pub delay_ms: u32,
    pub event: String,
}

impl From<JsDebounceRule> for DebounceRule {
    fn from(rule: JsDebounceRule) -> Self {
        DebounceRule::new(rule.key, rule.delay_ms, rule.event)
    }
}

/// Options accepted by `new DubBridge(options)`. Every field is optional;
/// omitted fields keep their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase", default)]
pub struct JsBridgeOptions {
    #[tsify(optional)]
    pub content_region_id: Option<String>,
    #[tsify(optional)]
    pub field_delay_ms: Option<u32>,
    #[tsify(optional)]
    pub field_event: Option<String>,
    #[tsify(optional)]
    pub form_delay_ms: Option<u32>,
    #[tsify(optional)]
    pub form_event: Option<String>,
    #[tsify(optional)]
    pub scan_endpoint: Option<String>,
    #[tsify(optional)]
    pub import_names_endpoint: Option<String>,
    #[tsify(optional)]
    pub import_extensions: Option<Vec<String>>,
    #[tsify(optional)]
    pub dialog_title: Option<String>,
    #[tsify(optional)]
    pub prompt_message: Option<String>,
    #[tsify(optional)]
    pub theme_storage_key: Option<String>,
    /// Install the `pattern` / `manual-names-form` rules for older markup.
    pub legacy_rules: bool,
    pub field_rules: Vec<JsDebounceRule>,
    pub form_rules: Vec<JsDebounceRule>,
}

impl JsBridgeOptions {
    pub fn into_config(self) -> BridgeConfig {
        let defaults = BridgeConfig::default();
        let mut config = BridgeConfig {
            content_region_id: self.content_region_id.unwrap_or(defaults.content_region_id),
            field_delay_ms: self.field_delay_ms.unwrap_or(defaults.field_delay_ms),
            field_event: self.field_event.unwrap_or(defaults.field_event),
            form_delay_ms: self.form_delay_ms.unwrap_or(defaults.form_delay_ms),
            form_event: self.form_event.unwrap_or(defaults.form_event),
            scan_endpoint: self.scan_endpoint.unwrap_or(defaults.scan_endpoint),
            import_names_endpoint: self
                .import_names_endpoint
                .unwrap_or(defaults.import_names_endpoint),
            import_extensions: self
                .import_extensions
                .unwrap_or(defaults.import_extensions),
            dialog_title: self.dialog_title.unwrap_or(defaults.dialog_title),
            prompt_message: self.prompt_message.unwrap_or(defaults.prompt_message),
            theme_storage_key: self.theme_storage_key.unwrap_or(defaults.theme_storage_key),
            field_rules: self.field_rules.into_iter().map(Into::into).collect(),
            form_rules: self.form_rules.into_iter().map(Into::into).collect(),
        };
        if self.legacy_rules {
            config = config.with_legacy_rules();
        }
        config
    }
}

/// Parse a JsValue into bridge options. `undefined` and `null` give the
/// defaults.
pub fn parse_options(value: JsValue) -> Result<JsBridgeOptions, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(JsBridgeOptions::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid bridge options: {}", e)))
}
