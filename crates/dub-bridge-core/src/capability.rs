//! Optional desktop-runtime capabilities.
//!
//! The native directory dialog and the file-drop hook exist only inside the
//! desktop shell. Each capability reports whether it is available; when the
//! dialog is missing, directory selection falls back to a plain text prompt.

use std::future::Future;

use crate::config::BridgeConfig;
use crate::error::CapabilityError;
use crate::request::BridgeRequest;

/// Native directory picker.
pub trait DirectoryDialog {
    fn is_available(&self) -> bool;

    /// Open the picker. `Ok(None)` or an empty path means the user cancelled.
    fn open_directory(
        &self,
        title: &str,
    ) -> impl Future<Output = Result<Option<String>, CapabilityError>>;
}

/// Synchronous text prompt used when no native dialog exists.
pub trait TextPrompt {
    fn prompt(&self, message: &str) -> Option<String>;
}

/// Ask the user for a directory and build the scan request for it.
///
/// Cancellation and failures yield None without any other effect.
pub async fn select_directory<D, P>(
    dialog: &D,
    prompt: &P,
    config: &BridgeConfig,
) -> Option<BridgeRequest>
where
    D: DirectoryDialog,
    P: TextPrompt,
{
    let path = if dialog.is_available() {
        match dialog.open_directory(&config.dialog_title).await {
            Ok(path) => path,
            Err(CapabilityError::Cancelled) => None,
            Err(e) => {
                tracing::error!(target: "dub::capability", "failed to open directory dialog: {e}");
                None
            }
        }
    } else {
        tracing::debug!(target: "dub::capability", "no directory dialog, prompting for path");
        prompt.prompt(&config.prompt_message)
    };

    let path = path?;
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    Some(BridgeRequest::scan(path))
}
