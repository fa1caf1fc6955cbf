//! Theme persistence in LocalStorage and application to the page.

use dub_bridge_core::{PlatformError, Theme, ThemeStore};
use gloo_storage::{LocalStorage, Storage};

/// Root attribute read by the stylesheet.
pub const THEME_ATTR: &str = "data-theme";

/// LocalStorage-backed theme preference.
///
/// Values are stored as bare strings rather than JSON so an inline script
/// in the page head can apply the theme before the module loads.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageThemeStore;

impl ThemeStore for LocalStorageThemeStore {
    fn load(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PlatformError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| PlatformError(format!("LocalStorage error: {:?}", e)))
    }
}

/// Reflect a theme on the root element. `System` removes the attribute so
/// the stylesheet follows `prefers-color-scheme`.
pub fn apply_theme(theme: Theme) -> Result<(), PlatformError> {
    let root = gloo_utils::document_element();
    let result = match theme {
        Theme::System => root.remove_attribute(THEME_ATTR),
        other => root.set_attribute(THEME_ATTR, other.as_str()),
    };
    result.map_err(crate::dom::js_error)?;
    tracing::debug!(target: "dub::theme", %theme, "applied theme");
    Ok(())
}
