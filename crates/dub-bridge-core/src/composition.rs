//! IME composition tracking.

/// Whether an IME composition session is in progress.
///
/// Every other component reads this before acting: no commit fires and no
/// swap applies while it is active.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompositionTracker {
    active: bool,
}

impl CompositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new session always overrides any residual state.
    pub fn start(&mut self) {
        if self.active {
            tracing::debug!(target: "dub::composition", "compositionstart while already composing");
        }
        self.active = true;
    }

    /// Mark the session finished. The caller is responsible for re-running
    /// debounce evaluation for the element that ended composition.
    pub fn end(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
