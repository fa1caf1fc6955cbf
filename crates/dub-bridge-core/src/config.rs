//! Bridge configuration and declarative attribute names.
//!
//! Per-element behavior comes from markup attributes (see [`attrs`]). The
//! page-wide defaults and the fallback rules live in [`BridgeConfig`], which
//! JavaScript can pass as a partial options object.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Attribute names recognized on page markup.
pub mod attrs {
    /// Single-element debounce delay in milliseconds.
    pub const DEBOUNCE_MS: &str = "data-debounce-ms";
    /// Single-element notification event name.
    pub const DEBOUNCE_EVENT: &str = "data-debounce-event";
    /// Opt-in flag marking a container as auto-saving.
    pub const AUTOSAVE: &str = "data-autosave";
    /// Form-level debounce delay in milliseconds.
    pub const AUTOSAVE_MS: &str = "data-autosave-ms";
    /// Form-level notification event name.
    pub const AUTOSAVE_EVENT: &str = "data-autosave-event";
    /// Drop region classification, e.g. `data-drop-zone="names"`.
    pub const DROP_ZONE: &str = "data-drop-zone";
    /// Value of [`DROP_ZONE`] marking the names-upload region.
    pub const DROP_ZONE_NAMES: &str = "names";
}

/// Debounce rule keyed by a field name or a container id, for markup that
/// does not carry the debounce attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebounceRule {
    /// Field `name` (field rules) or container `id` (form rules).
    pub key: String,
    pub delay_ms: u32,
    pub event: String,
}

impl DebounceRule {
    pub fn new(key: impl Into<String>, delay_ms: u32, event: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            delay_ms,
            event: event.into(),
        }
    }
}

/// Page-wide bridge configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Id of the managed content region whose swaps are gated.
    pub content_region_id: String,
    pub field_delay_ms: u32,
    pub field_event: String,
    pub form_delay_ms: u32,
    pub form_event: String,
    pub scan_endpoint: String,
    pub import_names_endpoint: String,
    /// Extensions (without dot, any case) that make a dropped file a names list.
    pub import_extensions: Vec<String>,
    pub dialog_title: String,
    pub prompt_message: String,
    pub theme_storage_key: String,
    pub field_rules: Vec<DebounceRule>,
    pub form_rules: Vec<DebounceRule>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            content_region_id: "main-content".to_string(),
            field_delay_ms: 400,
            field_event: "debounced".to_string(),
            form_delay_ms: 600,
            form_event: "auto-save".to_string(),
            scan_endpoint: "/api/scan".to_string(),
            import_names_endpoint: "/api/names/load".to_string(),
            import_extensions: vec!["txt".to_string(), "csv".to_string()],
            dialog_title: "Select Directory".to_string(),
            prompt_message: "Enter directory path:".to_string(),
            theme_storage_key: "theme".to_string(),
            field_rules: Vec::new(),
            form_rules: Vec::new(),
        }
    }
}

impl BridgeConfig {
    /// Add the rules for pages rendered before the debounce attributes
    /// existed: the `pattern` field and the `manual-names-form` container.
    pub fn with_legacy_rules(mut self) -> Self {
        self.field_rules
            .push(DebounceRule::new("pattern", 400, "pattern-changed"));
        self.form_rules
            .push(DebounceRule::new("manual-names-form", 600, "auto-save"));
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content_region_id.trim().is_empty() {
            return Err(ConfigError::EmptyContentRegion);
        }
        if self.field_event.is_empty() {
            return Err(ConfigError::EmptyEventName("fields"));
        }
        if self.form_event.is_empty() {
            return Err(ConfigError::EmptyEventName("forms"));
        }
        if self
            .field_rules
            .iter()
            .chain(&self.form_rules)
            .any(|rule| rule.event.is_empty())
        {
            return Err(ConfigError::EmptyEventName("rules"));
        }
        if self.scan_endpoint.is_empty() {
            return Err(ConfigError::EmptyEndpoint("scan"));
        }
        if self.import_names_endpoint.is_empty() {
            return Err(ConfigError::EmptyEndpoint("import names"));
        }
        if self.import_extensions.is_empty() {
            return Err(ConfigError::NoImportExtensions);
        }
        Ok(())
    }

    /// Field rule for a field `name`, if any.
    pub fn field_rule(&self, name: &str) -> Option<&DebounceRule> {
        self.field_rules.iter().find(|rule| rule.key == name)
    }

    /// Form rule for a container `id`, if any.
    pub fn form_rule(&self, id: &str) -> Option<&DebounceRule> {
        self.form_rules.iter().find(|rule| rule.key == id)
    }

    /// Whether a path's extension marks it as an importable names list.
    pub fn is_import_path(&self, path: &str) -> bool {
        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        let Some((stem, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        !stem.is_empty()
            && self
                .import_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }

    /// CSS selector of the managed content region.
    pub fn content_region_selector(&self) -> String {
        format!("#{}", self.content_region_id)
    }
}

/// Parse a millisecond attribute, falling back to `default` when absent or
/// malformed.
pub fn parse_delay_attr(attr: &str, raw: Option<&str>, default: u32) -> u32 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<u32>() {
        Ok(ms) => ms,
        Err(_) => {
            tracing::warn!(
                target: "dub::config",
                attribute = attr,
                value = raw,
                default,
                "unparsable delay attribute, using default"
            );
            default
        }
    }
}

/// Read an event-name attribute, treating an empty value as absent.
pub fn event_attr(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Whether a boolean attribute value enables a flag. Presence alone enables
/// it, except for an explicit `"false"`.
pub fn flag_attr(raw: Option<&str>) -> bool {
    match raw {
        Some(value) => !value.trim().eq_ignore_ascii_case("false"),
        None => false,
    }
}
