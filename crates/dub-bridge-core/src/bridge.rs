//! The coordinator that owns all shared bridge state.
//!
//! Composition state, the debounce registry and the capture slot live in one
//! `Bridge` value. Host event handlers call into it synchronously; since the
//! host is a single-threaded event loop, every read-then-act sequence inside
//! one method is atomic with respect to other events.

use crate::composition::CompositionTracker;
use crate::config::{BridgeConfig, attrs};
use crate::debounce::{self, DebounceScheduler, TimerKey};
use crate::error::{BridgeError, ConfigError};
use crate::platform::{DomPlatform, TimerPlatform};
use crate::request::BridgeRequest;
use crate::swap::{CaptureSlot, StateRestorer, SwapGate};
use crate::text_helpers::{splice_utf16, utf16_len};
use crate::types::{SelectionRange, SwapDecision};

pub struct Bridge<P, T>
where
    P: DomPlatform,
    T: TimerPlatform<TimerKey<P::Element>>,
{
    dom: P,
    timers: T,
    config: BridgeConfig,
    composition: CompositionTracker,
    scheduler: DebounceScheduler<P::Element, T::Handle>,
    gate: SwapGate,
    restorer: StateRestorer,
    capture: CaptureSlot,
}

impl<P, T> Bridge<P, T>
where
    P: DomPlatform,
    T: TimerPlatform<TimerKey<P::Element>>,
{
    pub fn new(dom: P, timers: T, config: BridgeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let gate = SwapGate::new(config.content_region_id.as_str());
        Ok(Self {
            dom,
            timers,
            config,
            composition: CompositionTracker::new(),
            scheduler: DebounceScheduler::new(),
            gate,
            restorer: StateRestorer,
            capture: CaptureSlot::new(),
        })
    }

    pub fn dom(&self) -> &P {
        &self.dom
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn is_composing(&self) -> bool {
        self.composition.is_active()
    }

    pub fn capture(&self) -> &CaptureSlot {
        &self.capture
    }

    pub fn pending_commits(&self) -> usize {
        self.scheduler.pending_count()
    }

    // === Composition ===

    pub fn on_composition_start(&mut self) {
        tracing::debug!(target: "dub::composition", "compositionstart");
        self.composition.start();
    }

    /// End the session and immediately re-evaluate debounce for the element
    /// that ended composition, now that its text is final.
    pub fn on_composition_end(&mut self, target: Option<&P::Element>) {
        tracing::debug!(target: "dub::composition", "compositionend");
        self.composition.end();
        if let Some(target) = target {
            self.on_input(target);
        }
    }

    // === Debounce ===

    /// Raw input-change notification. Returns whether a commit was scheduled.
    pub fn on_input(&mut self, target: &P::Element) -> bool {
        self.scheduler.handle_change(
            &self.dom,
            &self.timers,
            &self.config,
            self.composition.is_active(),
            target,
        )
    }

    /// A debounce timer matured. Returns whether a notification was emitted.
    pub fn on_timer_fired(&mut self, key: &TimerKey<P::Element>, generation: u64) -> bool {
        self.scheduler
            .fire(&self.dom, self.composition.is_active(), key, generation)
    }

    // === Swap ===

    /// Called synchronously before a subtree replacement of `target`.
    pub fn before_swap(&mut self, target: Option<&P::Element>) -> SwapDecision {
        self.gate.before_replace(
            &self.dom,
            self.composition.is_active(),
            target,
            &mut self.capture,
        )
    }

    /// Called once the replacement has settled. Returns whether captured
    /// input was restored.
    pub fn after_settle(&mut self) -> bool {
        self.restorer.after_replace(&self.dom, &mut self.capture)
    }

    // === User actions ===

    /// Insert shortcut text at the selection of the named field and notify
    /// immediately, superseding any pending debounce for it.
    pub fn insert_shortcut(&mut self, field_name: &str, shortcut: &str) -> Result<(), BridgeError> {
        let field = self
            .dom
            .find_named_field(field_name)
            .ok_or_else(|| BridgeError::FieldNotFound(field_name.into()))?;

        let value = self.dom.value(&field).unwrap_or_default();
        let selection = self
            .dom
            .selection_range(&field)
            .unwrap_or_else(|| SelectionRange::caret(utf16_len(&value)));
        let (new_value, caret) = splice_utf16(&value, selection, shortcut);

        self.dom.set_value(&field, &new_value)?;
        self.dom.focus(&field)?;
        if let Err(e) = self
            .dom
            .set_selection_range(&field, SelectionRange::caret(caret))
        {
            tracing::debug!(target: "dub::shortcut", "could not place caret: {e}");
        }

        let Some(resolution) = debounce::resolve(&self.dom, &self.config, &field) else {
            tracing::debug!(
                target: "dub::shortcut",
                field = field_name,
                "field has no debounce configuration, nothing to notify"
            );
            return Ok(());
        };
        self.scheduler.cancel_resolution(&self.dom, &resolution);
        self.dom
            .dispatch_event(&resolution.trigger, &resolution.spec.event_name)?;
        Ok(())
    }

    /// Decide what a file drop at viewport point (`x`, `y`) should request.
    ///
    /// A text/CSV file dropped on the names-upload region imports names;
    /// anything else scans the first dropped path.
    pub fn classify_drop(&self, x: f64, y: f64, paths: &[String]) -> Option<BridgeRequest> {
        let path = paths.first().map(|p| p.trim()).filter(|p| !p.is_empty())?;

        let in_names_zone = self
            .dom
            .element_at_point(x, y)
            .is_some_and(|hit| self.in_names_zone(hit));

        let request = if in_names_zone && self.config.is_import_path(path) {
            BridgeRequest::import_names(path)
        } else {
            BridgeRequest::scan(path)
        };
        tracing::debug!(
            target: "dub::drop",
            files = paths.len(),
            in_names_zone,
            request = %request.display(&self.config),
            "classified drop"
        );
        Some(request)
    }

    fn in_names_zone(&self, hit: P::Element) -> bool {
        let mut current = Some(hit);
        while let Some(element) = current {
            if self.dom.attribute(&element, attrs::DROP_ZONE).as_deref()
                == Some(attrs::DROP_ZONE_NAMES)
            {
                return true;
            }
            current = self.dom.parent_element(&element);
        }
        false
    }
}
