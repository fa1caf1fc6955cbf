//! Attribute-driven debounce scheduling.
//!
//! Raw input notifications are coalesced per timer key: N edits inside the
//! delay window produce exactly one commit, emitted after the last edit plus
//! the delay. Fields inside one auto-saving container share that
//! container's key; independent fields do not interfere with each other.

use std::fmt;

use smol_str::SmolStr;

use crate::config::{BridgeConfig, attrs, event_attr, flag_attr, parse_delay_attr};
use crate::platform::{DomPlatform, TimerPlatform};
use crate::types::{DebounceScope, DebounceSpec};

/// Identity of the element that owns a pending commit.
///
/// Each field in single-element mode is its own key, so two fields sharing a
/// `name` never coalesce. Identified containers are keyed by id.
#[derive(Clone, Debug, PartialEq)]
pub enum TimerKey<E> {
    /// Single-element field, or a container without an id, keyed by identity.
    Element(E),
    /// Form mode, keyed by the container's `id`.
    Form(SmolStr),
}

impl<E> TimerKey<E> {
    fn for_form(id: Option<&str>, element: &E) -> Self
    where
        E: Clone,
    {
        match id.filter(|id| !id.is_empty()) {
            Some(id) => TimerKey::Form(SmolStr::new(id)),
            None => TimerKey::Element(element.clone()),
        }
    }
}

/// The debounce configuration that applies to one change notification.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution<E> {
    pub spec: DebounceSpec,
    /// Element that receives the notification event.
    pub trigger: E,
    pub key: TimerKey<E>,
    /// `name` of a single-element field. A replacement field with this name
    /// takes over the commit once the trigger leaves the document.
    pub field_name: Option<SmolStr>,
}

/// Resolve the debounce configuration for a changed element.
///
/// The element's own attributes (or a field rule for its name) select
/// single-element mode. Otherwise the nearest auto-saving ancestor (or one
/// matching a form rule) selects form mode. None when neither applies.
pub fn resolve<P: DomPlatform>(
    dom: &P,
    config: &BridgeConfig,
    target: &P::Element,
) -> Option<Resolution<P::Element>> {
    if let Some(resolution) = resolve_single(dom, config, target) {
        return Some(resolution);
    }

    let mut current = Some(target.clone());
    while let Some(element) = current {
        if let Some(resolution) = resolve_form(dom, config, &element) {
            return Some(resolution);
        }
        current = dom.parent_element(&element);
    }
    None
}

fn resolve_single<P: DomPlatform>(
    dom: &P,
    config: &BridgeConfig,
    target: &P::Element,
) -> Option<Resolution<P::Element>> {
    let delay_raw = dom.attribute(target, attrs::DEBOUNCE_MS);
    let event_raw = dom.attribute(target, attrs::DEBOUNCE_EVENT);
    let name = dom.attribute(target, "name");

    let spec = if delay_raw.is_some() || event_raw.is_some() {
        let delay_ms = parse_delay_attr(
            attrs::DEBOUNCE_MS,
            delay_raw.as_deref(),
            config.field_delay_ms,
        );
        let event = event_attr(event_raw).unwrap_or_else(|| config.field_event.clone());
        DebounceSpec::new(delay_ms, event, DebounceScope::Element)
    } else {
        let rule = config.field_rule(name.as_deref()?)?;
        DebounceSpec::new(rule.delay_ms, rule.event.as_str(), DebounceScope::Element)
    };

    Some(Resolution {
        spec,
        trigger: target.clone(),
        key: TimerKey::Element(target.clone()),
        field_name: name.filter(|n| !n.is_empty()).map(SmolStr::from),
    })
}

fn resolve_form<P: DomPlatform>(
    dom: &P,
    config: &BridgeConfig,
    container: &P::Element,
) -> Option<Resolution<P::Element>> {
    let id = dom.attribute(container, "id");

    let spec = if flag_attr(dom.attribute(container, attrs::AUTOSAVE).as_deref()) {
        let delay_ms = parse_delay_attr(
            attrs::AUTOSAVE_MS,
            dom.attribute(container, attrs::AUTOSAVE_MS).as_deref(),
            config.form_delay_ms,
        );
        let event = event_attr(dom.attribute(container, attrs::AUTOSAVE_EVENT))
            .unwrap_or_else(|| config.form_event.clone());
        DebounceSpec::new(delay_ms, event, DebounceScope::AncestorForm)
    } else {
        let rule = config.form_rule(id.as_deref()?)?;
        DebounceSpec::new(
            rule.delay_ms,
            rule.event.as_str(),
            DebounceScope::AncestorForm,
        )
    };

    Some(Resolution {
        spec,
        trigger: container.clone(),
        key: TimerKey::for_form(id.as_deref(), container),
        field_name: None,
    })
}

struct PendingCommit<E, H> {
    key: TimerKey<E>,
    generation: u64,
    trigger: E,
    field_name: Option<SmolStr>,
    event_name: SmolStr,
    // Dropping the handle cancels the timer.
    _handle: H,
}

/// Keyed registry of pending commits, at most one per key.
pub struct DebounceScheduler<E, H> {
    pending: Vec<PendingCommit<E, H>>,
    next_generation: u64,
}

impl<E, H> Default for DebounceScheduler<E, H> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_generation: 0,
        }
    }
}

impl<E, H> fmt::Debug for DebounceScheduler<E, H>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebounceScheduler")
            .field(
                "pending",
                &self.pending.iter().map(|p| &p.key).collect::<Vec<_>>(),
            )
            .field("next_generation", &self.next_generation)
            .finish()
    }
}

impl<E, H> DebounceScheduler<E, H>
where
    E: Clone + PartialEq + fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one raw change notification for `target`.
    ///
    /// Does nothing while composing or when no debounce configuration
    /// applies. Returns whether a commit was (re)scheduled.
    pub fn handle_change<P, T>(
        &mut self,
        dom: &P,
        timers: &T,
        config: &BridgeConfig,
        composing: bool,
        target: &E,
    ) -> bool
    where
        P: DomPlatform<Element = E>,
        T: TimerPlatform<TimerKey<E>, Handle = H>,
    {
        if composing {
            return false;
        }
        let Some(resolution) = resolve(dom, config, target) else {
            return false;
        };
        self.schedule(dom, timers, resolution);
        true
    }

    /// Cancel any pending commit for the key and schedule a new one, as a
    /// single step on the registry.
    ///
    /// A field also replaces the commit of a same-named field that has left
    /// the document, so a keystroke on a swapped-in field supersedes the
    /// timer started on its predecessor.
    pub fn schedule<P, T>(&mut self, dom: &P, timers: &T, resolution: Resolution<E>)
    where
        P: DomPlatform<Element = E>,
        T: TimerPlatform<TimerKey<E>, Handle = H>,
    {
        let slot = self.position_for(dom, &resolution);
        let Resolution {
            spec,
            trigger,
            key,
            field_name,
        } = resolution;

        self.next_generation += 1;
        let generation = self.next_generation;
        let handle = timers.schedule(&key, generation, spec.delay());

        tracing::trace!(
            target: "dub::debounce",
            key = ?key,
            generation,
            delay_ms = spec.delay_ms,
            event = %spec.event_name,
            "scheduling commit"
        );

        let commit = PendingCommit {
            key,
            generation,
            trigger,
            field_name,
            event_name: spec.event_name,
            _handle: handle,
        };

        // Replacing the entry drops the previous handle, cancelling it.
        match slot {
            Some(index) => self.pending[index] = commit,
            None => self.pending.push(commit),
        }
    }

    /// Cancel the pending commit for a key. Returns whether one existed.
    pub fn cancel(&mut self, key: &TimerKey<E>) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| &p.key != key);
        before != self.pending.len()
    }

    /// Cancel the commit a new schedule for `resolution` would replace.
    /// Returns whether one existed.
    pub fn cancel_resolution<P>(&mut self, dom: &P, resolution: &Resolution<E>) -> bool
    where
        P: DomPlatform<Element = E>,
    {
        match self.position_for(dom, resolution) {
            Some(index) => {
                self.pending.swap_remove(index);
                true
            }
            None => false,
        }
    }

    fn position_for<P>(&self, dom: &P, resolution: &Resolution<E>) -> Option<usize>
    where
        P: DomPlatform<Element = E>,
    {
        if let Some(index) = self.pending.iter().position(|p| p.key == resolution.key) {
            return Some(index);
        }
        let name = resolution.field_name.as_ref()?;
        self.pending.iter().position(|p| {
            p.field_name.as_ref() == Some(name) && !dom.is_connected(&p.trigger)
        })
    }

    pub fn is_pending(&self, key: &TimerKey<E>) -> bool {
        self.pending.iter().any(|p| &p.key == key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// A timer matured. Emits the notification unless composing.
    ///
    /// Stale generations (a timer that was replaced but fired anyway) are
    /// ignored. Either way a matching entry is removed, so a commit vetoed
    /// by composition leaves the key without a live timer until the next
    /// edit. Returns whether an event was dispatched.
    pub fn fire<P>(
        &mut self,
        dom: &P,
        composing: bool,
        key: &TimerKey<E>,
        generation: u64,
    ) -> bool
    where
        P: DomPlatform<Element = E>,
    {
        let Some(index) = self
            .pending
            .iter()
            .position(|p| &p.key == key && p.generation == generation)
        else {
            tracing::trace!(target: "dub::debounce", key = ?key, generation, "stale timer ignored");
            return false;
        };
        let commit = self.pending.swap_remove(index);

        if composing {
            tracing::debug!(
                target: "dub::debounce",
                key = ?commit.key,
                "composition active at fire time, dropping commit"
            );
            return false;
        }

        let Some(trigger) = retarget(dom, &commit) else {
            tracing::debug!(
                target: "dub::debounce",
                key = ?commit.key,
                "commit target no longer in document"
            );
            return false;
        };

        match dom.dispatch_event(&trigger, &commit.event_name) {
            Ok(()) => {
                tracing::debug!(
                    target: "dub::debounce",
                    key = ?commit.key,
                    event = %commit.event_name,
                    "commit emitted"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    target: "dub::debounce",
                    event = %commit.event_name,
                    "failed to dispatch commit: {e}"
                );
                false
            }
        }
    }
}

/// The element to notify at fire time. A swap may have replaced the element
/// captured at schedule time, in which case the live one is found again by
/// field name or container id.
fn retarget<P: DomPlatform, H>(
    dom: &P,
    commit: &PendingCommit<P::Element, H>,
) -> Option<P::Element> {
    if dom.is_connected(&commit.trigger) {
        return Some(commit.trigger.clone());
    }
    match (&commit.key, &commit.field_name) {
        (TimerKey::Form(id), _) => dom.element_by_id(id),
        (TimerKey::Element(_), Some(name)) => dom.find_named_field(name),
        (TimerKey::Element(_), None) => None,
    }
}
