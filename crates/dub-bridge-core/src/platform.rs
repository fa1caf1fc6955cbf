//! Platform abstraction traits for bridge operations.
//!
//! These traits define the interface between the synchronization logic and
//! the host environment (browser DOM, test doubles). The coordinator never
//! touches the DOM or the event loop directly.

use std::fmt;
use std::time::Duration;

use crate::error::PlatformError;
use crate::types::SelectionRange;

/// Read/write access to the live document.
///
/// All selection offsets are in UTF-16 code units, matching
/// `selectionStart`/`selectionEnd` on DOM text controls.
pub trait DomPlatform {
    /// Handle to a DOM element. Equality must be element identity.
    type Element: Clone + PartialEq + fmt::Debug;

    // === Traversal ===

    /// The currently focused element, if any.
    fn active_element(&self) -> Option<Self::Element>;

    /// Parent element, or None at the document root.
    fn parent_element(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Whether the element is still attached to the document.
    fn is_connected(&self, element: &Self::Element) -> bool;

    /// Look up an attached element by id.
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Find the first attached `input` or `textarea` with the given `name`.
    fn find_named_field(&self, name: &str) -> Option<Self::Element>;

    /// Topmost element at viewport coordinates.
    fn element_at_point(&self, x: f64, y: f64) -> Option<Self::Element>;

    // === Reads ===

    /// Tag name as reported by the platform (case is not normalized).
    fn tag_name(&self, element: &Self::Element) -> String;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Current value of a form control. None for non-controls.
    fn value(&self, element: &Self::Element) -> Option<String>;

    /// Current selection of a text control. None when the control kind does
    /// not support the selection API.
    fn selection_range(&self, element: &Self::Element) -> Option<SelectionRange>;

    // === Writes ===

    fn set_value(&self, element: &Self::Element, value: &str) -> Result<(), PlatformError>;

    fn focus(&self, element: &Self::Element) -> Result<(), PlatformError>;

    fn set_selection_range(
        &self,
        element: &Self::Element,
        range: SelectionRange,
    ) -> Result<(), PlatformError>;

    /// Dispatch a bubbling notification event with the given name.
    fn dispatch_event(&self, element: &Self::Element, name: &str) -> Result<(), PlatformError>;
}

/// Deferred single-shot callbacks on the host event loop.
///
/// Dropping a returned handle must cancel the pending callback. When a timer
/// matures the host calls `Bridge::on_timer_fired(key, generation)`.
pub trait TimerPlatform<K> {
    type Handle;

    fn schedule(&self, key: &K, generation: u64, delay: Duration) -> Self::Handle;
}
