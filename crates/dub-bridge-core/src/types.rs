//! Core bridge types: control classification, selection, debounce specs and
//! captured input state.

use std::time::Duration;

use smol_str::SmolStr;

/// Kind of an `<input>` element, from its `type` attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Search,
    Url,
    Tel,
    Email,
    Password,
    /// Any non-textual kind (checkbox, file, range, ...).
    Other(SmolStr),
}

impl InputKind {
    /// Parse an input `type` attribute. A missing attribute means `text`.
    pub fn from_type_attr(attr: Option<&str>) -> Self {
        let Some(attr) = attr else {
            return InputKind::Text;
        };
        match attr.trim().to_ascii_lowercase().as_str() {
            "" | "text" => InputKind::Text,
            "search" => InputKind::Search,
            "url" => InputKind::Url,
            "tel" => InputKind::Tel,
            "email" => InputKind::Email,
            "password" => InputKind::Password,
            other => InputKind::Other(SmolStr::new(other)),
        }
    }

    /// Whether this kind holds free text with a caret.
    pub fn is_textual(&self) -> bool {
        !matches!(self, InputKind::Other(_))
    }
}

/// Classification of a DOM element as a form control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlKind {
    Input(InputKind),
    TextArea,
    /// Not a text-entry control at all.
    Other,
}

impl ControlKind {
    /// Classify from a tag name (any case) and the element's `type` attribute.
    pub fn classify(tag_name: &str, type_attr: Option<&str>) -> Self {
        if tag_name.eq_ignore_ascii_case("input") {
            ControlKind::Input(InputKind::from_type_attr(type_attr))
        } else if tag_name.eq_ignore_ascii_case("textarea") {
            ControlKind::TextArea
        } else {
            ControlKind::Other
        }
    }

    /// Single-line or multi-line text entry whose state is worth preserving
    /// across a swap.
    pub fn is_text_entry(&self) -> bool {
        match self {
            ControlKind::Input(kind) => kind.is_textual(),
            ControlKind::TextArea => true,
            ControlKind::Other => false,
        }
    }
}

/// Selection bounds inside a text control, in UTF-16 code units as the DOM
/// reports them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Collapsed range (caret).
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Clamp both bounds into `[0, len]`.
    pub fn clamped(self, len: usize) -> Self {
        Self {
            start: self.start.min(len),
            end: self.end.min(len),
        }
    }
}

/// Whether a debounce commit belongs to a single field or to its form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebounceScope {
    /// The field itself owns the timer and receives the event.
    Element,
    /// The nearest auto-saving ancestor owns the timer and receives the event.
    AncestorForm,
}

/// Resolved debounce configuration for one change notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebounceSpec {
    pub delay_ms: u32,
    pub event_name: SmolStr,
    pub scope: DebounceScope,
}

impl DebounceSpec {
    pub fn new(delay_ms: u32, event_name: impl Into<SmolStr>, scope: DebounceScope) -> Self {
        Self {
            delay_ms,
            event_name: event_name.into(),
            scope,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.delay_ms))
    }
}

/// Snapshot of the focused text field taken immediately before a swap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedInput {
    pub target_name: SmolStr,
    pub value: String,
    pub selection: SelectionRange,
}

/// Outcome of the swap gate for one replacement request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapDecision {
    /// Apply the replacement.
    Proceed,
    /// Discard the replacement and leave the live DOM untouched.
    Veto,
}

impl SwapDecision {
    pub fn should_swap(self) -> bool {
        matches!(self, SwapDecision::Proceed)
    }
}
