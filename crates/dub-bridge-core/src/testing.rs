//! In-memory platform doubles for unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::bridge::Bridge;
use crate::capability::{DirectoryDialog, TextPrompt};
use crate::debounce::TimerKey;
use crate::error::{CapabilityError, PlatformError};
use crate::platform::{DomPlatform, TimerPlatform};
use crate::text_helpers::utf16_len;
use crate::theme::ThemeStore;
use crate::types::{ControlKind, InputKind, SelectionRange};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    tag: String,
    attrs: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attached: bool,
    value: String,
    selection: SelectionRange,
    selection_supported: bool,
    rect: Option<(f64, f64, f64, f64)>,
}

/// A tiny DOM: a tree of nodes with attributes, focus, values and
/// selections. Every change notification dispatched is recorded.
#[derive(Debug)]
pub struct FakeDom {
    nodes: RefCell<Vec<Node>>,
    active: Cell<Option<NodeId>>,
    dispatched: RefCell<Vec<(NodeId, String)>>,
    fail_dispatch: Cell<bool>,
}

impl FakeDom {
    pub fn new() -> Self {
        let root = Node {
            tag: "BODY".to_string(),
            attrs: Vec::new(),
            parent: None,
            children: Vec::new(),
            attached: true,
            value: String::new(),
            selection: SelectionRange::default(),
            selection_supported: false,
            rect: None,
        };
        Self {
            nodes: RefCell::new(vec![root]),
            active: Cell::new(None),
            dispatched: RefCell::new(Vec::new()),
            fail_dispatch: Cell::new(false),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a new child element. Tag names are stored uppercase, as the
    /// browser reports them.
    pub fn append(&self, parent: NodeId, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        let attached = nodes[parent.0].attached;
        nodes.push(Node {
            tag: tag.to_ascii_uppercase(),
            attrs: Vec::new(),
            parent: Some(parent),
            children: Vec::new(),
            attached,
            value: String::new(),
            selection: SelectionRange::default(),
            selection_supported: true,
            rect: None,
        });
        nodes[parent.0].children.push(id);
        id
    }

    pub fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let attrs = &mut nodes[node.0].attrs;
        match attrs.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    /// Simulate typing: set the value and put the caret at `caret`.
    pub fn type_into(&self, node: NodeId, value: &str, caret: usize) {
        let mut nodes = self.nodes.borrow_mut();
        nodes[node.0].value = value.to_string();
        nodes[node.0].selection = SelectionRange::caret(caret);
    }

    pub fn select(&self, node: NodeId, range: SelectionRange) {
        self.nodes.borrow_mut()[node.0].selection = range;
    }

    pub fn disable_selection_api(&self, node: NodeId) {
        self.nodes.borrow_mut()[node.0].selection_supported = false;
    }

    pub fn focus_node(&self, node: NodeId) {
        self.active.set(Some(node));
    }

    pub fn blur(&self) {
        self.active.set(None);
    }

    /// Give a node a hit-test rectangle. Later rectangles are on top.
    pub fn place(&self, node: NodeId, x: f64, y: f64, w: f64, h: f64) {
        self.nodes.borrow_mut()[node.0].rect = Some((x, y, w, h));
    }

    /// Remove a node and its subtree from the document.
    pub fn detach(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|c| *c != node);
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            nodes[current.0].attached = false;
            stack.extend(nodes[current.0].children.iter().copied());
        }
        drop(nodes);
        if let Some(active) = self.active.get() {
            if !self.is_connected(&active) {
                self.active.set(None);
            }
        }
    }

    /// Replace all children of a region, as a swap does.
    pub fn clear_children(&self, region: NodeId) {
        let children = self.nodes.borrow()[region.0].children.clone();
        for child in children {
            self.detach(child);
        }
    }

    /// Serialize a subtree for before/after comparisons.
    pub fn snapshot(&self, node: NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        let mut stack = vec![(node, 0usize)];
        while let Some((current, depth)) = stack.pop() {
            let n = &nodes[current.0];
            out.push_str(&format!(
                "{}{} {:?} value={:?} sel={:?}\n",
                "  ".repeat(depth),
                n.tag,
                n.attrs,
                n.value,
                n.selection
            ));
            for child in n.children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        out
    }

    pub fn value_of(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].value.clone()
    }

    pub fn selection_of(&self, node: NodeId) -> SelectionRange {
        self.nodes.borrow()[node.0].selection
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.active.get()
    }

    pub fn dispatched(&self) -> Vec<(NodeId, String)> {
        self.dispatched.borrow().clone()
    }

    pub fn fail_dispatches(&self, fail: bool) {
        self.fail_dispatch.set(fail);
    }

    fn is_control(&self, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let tag = &nodes[node.0].tag;
        tag == "INPUT" || tag == "TEXTAREA"
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0]
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }
}

impl DomPlatform for FakeDom {
    type Element = NodeId;

    fn active_element(&self) -> Option<NodeId> {
        self.active.get()
    }

    fn parent_element(&self, element: &NodeId) -> Option<NodeId> {
        self.nodes.borrow()[element.0].parent
    }

    fn is_connected(&self, element: &NodeId) -> bool {
        self.nodes.borrow()[element.0].attached
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let count = self.nodes.borrow().len();
        (0..count)
            .map(NodeId)
            .find(|n| self.is_connected(n) && self.attr(*n, "id").as_deref() == Some(id))
    }

    fn find_named_field(&self, name: &str) -> Option<NodeId> {
        let count = self.nodes.borrow().len();
        (0..count).map(NodeId).find(|n| {
            self.is_connected(n) && self.is_control(*n) && self.attr(*n, "name").as_deref() == Some(name)
        })
    }

    fn element_at_point(&self, x: f64, y: f64) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, n)| {
                n.attached
                    && n.rect
                        .is_some_and(|(rx, ry, w, h)| x >= rx && x < rx + w && y >= ry && y < ry + h)
            })
            .map(|(i, _)| NodeId(i))
    }

    fn tag_name(&self, element: &NodeId) -> String {
        self.nodes.borrow()[element.0].tag.clone()
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.attr(*element, name)
    }

    fn value(&self, element: &NodeId) -> Option<String> {
        self.is_control(*element)
            .then(|| self.nodes.borrow()[element.0].value.clone())
    }

    fn selection_range(&self, element: &NodeId) -> Option<SelectionRange> {
        let nodes = self.nodes.borrow();
        let node = &nodes[element.0];
        node.selection_supported.then_some(node.selection)
    }

    fn set_value(&self, element: &NodeId, value: &str) -> Result<(), PlatformError> {
        if !self.is_control(*element) {
            return Err("not a form control".into());
        }
        let kind = ControlKind::classify(&self.tag_name(element), self.attr(*element, "type").as_deref());
        // Browsers strip surrounding whitespace from email values.
        let value = match kind {
            ControlKind::Input(InputKind::Email) => value.trim(),
            _ => value,
        };
        let mut nodes = self.nodes.borrow_mut();
        nodes[element.0].value = value.to_string();
        nodes[element.0].selection = SelectionRange::caret(utf16_len(value));
        Ok(())
    }

    fn focus(&self, element: &NodeId) -> Result<(), PlatformError> {
        if !self.is_connected(element) {
            return Err("element is detached".into());
        }
        self.active.set(Some(*element));
        Ok(())
    }

    fn set_selection_range(
        &self,
        element: &NodeId,
        range: SelectionRange,
    ) -> Result<(), PlatformError> {
        let mut nodes = self.nodes.borrow_mut();
        let node = &mut nodes[element.0];
        if !node.selection_supported {
            return Err("selection API not supported".into());
        }
        node.selection = range.clamped(utf16_len(&node.value));
        Ok(())
    }

    fn dispatch_event(&self, element: &NodeId, name: &str) -> Result<(), PlatformError> {
        if self.fail_dispatch.get() {
            return Err("dispatch failed".into());
        }
        self.dispatched
            .borrow_mut()
            .push((*element, name.to_string()));
        Ok(())
    }
}

#[derive(Debug)]
struct Scheduled {
    key: TimerKey<NodeId>,
    generation: u64,
    due: u64,
    cancelled: Rc<Cell<bool>>,
}

/// Handle for a fake timer; dropping it cancels the timer.
#[derive(Debug)]
pub struct FakeTimer {
    cancelled: Rc<Cell<bool>>,
}

impl Drop for FakeTimer {
    fn drop(&mut self) {
        self.cancelled.set(true);
    }
}

/// Manual clock. Nothing fires until a test calls [`advance`].
#[derive(Debug, Default)]
pub struct FakeTimers {
    now: Cell<u64>,
    scheduled: RefCell<Vec<Scheduled>>,
    total: Cell<usize>,
}

impl FakeTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Timers neither cancelled nor fired.
    pub fn live_count(&self) -> usize {
        self.scheduled
            .borrow()
            .iter()
            .filter(|s| !s.cancelled.get())
            .count()
    }

    /// Total number of `schedule` calls.
    pub fn scheduled_total(&self) -> usize {
        self.total.get()
    }

    /// Remove and return the earliest live timer due at or before `until`.
    fn take_due(&self, until: u64) -> Option<(TimerKey<NodeId>, u64, u64)> {
        let mut scheduled = self.scheduled.borrow_mut();
        scheduled.retain(|s| !s.cancelled.get());
        let index = scheduled
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= until)
            .min_by_key(|(_, s)| s.due)
            .map(|(i, _)| i)?;
        let s = scheduled.remove(index);
        Some((s.key, s.generation, s.due))
    }
}

impl TimerPlatform<TimerKey<NodeId>> for FakeTimers {
    type Handle = FakeTimer;

    fn schedule(&self, key: &TimerKey<NodeId>, generation: u64, delay: Duration) -> FakeTimer {
        let cancelled = Rc::new(Cell::new(false));
        self.total.set(self.total.get() + 1);
        self.scheduled.borrow_mut().push(Scheduled {
            key: key.clone(),
            generation,
            due: self.now.get() + delay.as_millis() as u64,
            cancelled: cancelled.clone(),
        });
        FakeTimer { cancelled }
    }
}

pub type TestBridge = Bridge<FakeDom, FakeTimers>;

/// Advance the manual clock by `ms`, firing matured timers in due order.
pub fn advance(bridge: &mut TestBridge, ms: u64) {
    let until = bridge.timers().now() + ms;
    while let Some((key, generation, due)) = bridge.timers().take_due(until) {
        bridge.timers().now.set(due);
        bridge.on_timer_fired(&key, generation);
    }
    bridge.timers().now.set(until);
}

/// Scripted directory dialog.
#[derive(Debug)]
pub struct FakeDialog {
    pub available: bool,
    pub result: Result<Option<String>, CapabilityError>,
    pub titles: RefCell<Vec<String>>,
}

impl FakeDialog {
    pub fn returning(result: Result<Option<String>, CapabilityError>) -> Self {
        Self {
            available: true,
            result,
            titles: RefCell::new(Vec::new()),
        }
    }

    pub fn absent() -> Self {
        Self {
            available: false,
            result: Err(CapabilityError::Unavailable),
            titles: RefCell::new(Vec::new()),
        }
    }
}

impl DirectoryDialog for FakeDialog {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn open_directory(&self, title: &str) -> Result<Option<String>, CapabilityError> {
        self.titles.borrow_mut().push(title.to_string());
        self.result.clone()
    }
}

/// Scripted text prompt.
#[derive(Debug, Default)]
pub struct FakePrompt {
    pub answer: Option<String>,
    pub asked: RefCell<Vec<String>>,
}

impl TextPrompt for FakePrompt {
    fn prompt(&self, message: &str) -> Option<String> {
        self.asked.borrow_mut().push(message.to_string());
        self.answer.clone()
    }
}

/// Map-backed theme store.
#[derive(Debug, Default)]
pub struct MemoryThemeStore {
    pub values: RefCell<Vec<(String, String)>>,
    pub fail_writes: bool,
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PlatformError> {
        if self.fail_writes {
            return Err("storage full".into());
        }
        let mut values = self.values.borrow_mut();
        match values.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => values.push((key.to_string(), value.to_string())),
        }
        Ok(())
    }
}
