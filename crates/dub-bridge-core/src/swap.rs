//! Swap gate and state restoration.
//!
//! A swap destroys the focused field and whatever the user typed after the
//! request was sent. The gate runs synchronously just before the swap:
//! during IME composition it vetoes the swap outright, otherwise it snapshots
//! the focused text field. The restorer reapplies that snapshot to the
//! same-named field in the new markup once the swap has settled.
//!
//! The [`CaptureSlot`] is the only hand-off between the two: the gate is its
//! sole writer and the restorer its sole reader, and it never holds more than
//! one snapshot.

use smol_str::SmolStr;

use crate::platform::DomPlatform;
use crate::text_helpers::utf16_len;
use crate::types::{CapturedInput, ControlKind, SelectionRange, SwapDecision};

/// Single pending snapshot, written by the gate and consumed by the restorer.
#[derive(Debug, Default)]
pub struct CaptureSlot {
    captured: Option<CapturedInput>,
}

impl CaptureSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.captured.is_none()
    }

    pub fn peek(&self) -> Option<&CapturedInput> {
        self.captured.as_ref()
    }

    fn replace(&mut self, captured: Option<CapturedInput>) {
        if let (Some(stale), None) = (&self.captured, &captured) {
            tracing::trace!(target: "dub::swap", name = %stale.target_name, "clearing stale capture");
        }
        self.captured = captured;
    }

    fn take(&mut self) -> Option<CapturedInput> {
        self.captured.take()
    }
}

/// Snapshot the focused element if it is a named text-entry control.
pub fn capture_focused_input<P: DomPlatform>(dom: &P) -> Option<CapturedInput> {
    let element = dom.active_element()?;

    let kind = ControlKind::classify(
        &dom.tag_name(&element),
        dom.attribute(&element, "type").as_deref(),
    );
    if !kind.is_text_entry() {
        return None;
    }

    let name = dom.attribute(&element, "name").filter(|n| !n.is_empty())?;
    let value = dom.value(&element)?;
    // Kinds without a selection API keep the caret at the end.
    let selection = dom
        .selection_range(&element)
        .unwrap_or_else(|| SelectionRange::caret(utf16_len(&value)));

    Some(CapturedInput {
        target_name: SmolStr::new(name),
        value,
        selection,
    })
}

/// Veto/capture checkpoint for swaps of the managed content region.
#[derive(Clone, Debug)]
pub struct SwapGate {
    region_id: SmolStr,
}

impl SwapGate {
    pub fn new(region_id: impl Into<SmolStr>) -> Self {
        Self {
            region_id: region_id.into(),
        }
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    /// Whether a swap into `target` is governed by this gate.
    pub fn governs<P: DomPlatform>(&self, dom: &P, target: Option<&P::Element>) -> bool {
        target
            .and_then(|t| dom.attribute(t, "id"))
            .is_some_and(|id| id == self.region_id.as_str())
    }

    /// Decide a pending replacement of `target`.
    ///
    /// Swaps elsewhere on the page pass through untouched. A governed swap
    /// is vetoed while composing; otherwise the focused field is captured
    /// (or the slot cleared) and the swap proceeds.
    pub fn before_replace<P: DomPlatform>(
        &self,
        dom: &P,
        composing: bool,
        target: Option<&P::Element>,
        slot: &mut CaptureSlot,
    ) -> SwapDecision {
        if !self.governs(dom, target) {
            return SwapDecision::Proceed;
        }

        if composing {
            tracing::debug!(target: "dub::swap", "composition active, vetoing swap");
            // No settle follows a vetoed swap.
            slot.replace(None);
            return SwapDecision::Veto;
        }

        let captured = capture_focused_input(dom);
        if let Some(c) = &captured {
            tracing::debug!(
                target: "dub::swap",
                name = %c.target_name,
                selection = ?c.selection,
                "captured focused input before swap"
            );
        }
        slot.replace(captured);
        SwapDecision::Proceed
    }
}

/// Reapplies a captured snapshot after a swap has settled.
#[derive(Clone, Copy, Debug, Default)]
pub struct StateRestorer;

impl StateRestorer {
    /// Consume the pending snapshot, if any, and restore it onto the
    /// same-named field in the live document.
    ///
    /// The user's value wins over the server-rendered one. The selection is
    /// clamped to the value actually held by the field after the write.
    /// Every failure is swallowed; the slot is empty afterwards regardless.
    /// Returns whether the value was restored.
    pub fn after_replace<P: DomPlatform>(&self, dom: &P, slot: &mut CaptureSlot) -> bool {
        let Some(captured) = slot.take() else {
            return false;
        };

        let Some(field) = dom.find_named_field(&captured.target_name) else {
            tracing::debug!(
                target: "dub::swap",
                name = %captured.target_name,
                "no matching field after swap, discarding capture"
            );
            return false;
        };

        let kind = ControlKind::classify(
            &dom.tag_name(&field),
            dom.attribute(&field, "type").as_deref(),
        );
        if !kind.is_text_entry() {
            tracing::debug!(
                target: "dub::swap",
                name = %captured.target_name,
                "matching field is not text entry, discarding capture"
            );
            return false;
        }

        if let Err(e) = dom.set_value(&field, &captured.value) {
            tracing::debug!(target: "dub::swap", "restoring value failed: {e}");
            return false;
        }
        if let Err(e) = dom.focus(&field) {
            tracing::debug!(target: "dub::swap", "restoring focus failed: {e}");
        }

        let live_len = dom
            .value(&field)
            .map(|v| utf16_len(&v))
            .unwrap_or_else(|| utf16_len(&captured.value));
        let selection = captured.selection.clamped(live_len);
        if let Err(e) = dom.set_selection_range(&field, selection) {
            tracing::debug!(target: "dub::swap", "restoring selection failed: {e}");
        }

        tracing::debug!(
            target: "dub::swap",
            name = %captured.target_name,
            selection = ?selection,
            "restored input after swap"
        );
        true
    }
}
