//! `DomPlatform` over the live browser document.

use dub_bridge_core::{DomPlatform, PlatformError, SelectionRange};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CustomEvent, CustomEventInit, Document, Element, HtmlElement, HtmlInputElement,
    HtmlTextAreaElement,
};

/// Convert a thrown JS value into a platform error.
pub(crate) fn js_error(e: JsValue) -> PlatformError {
    match e.as_string() {
        Some(message) => PlatformError(message),
        None => PlatformError(format!("{:?}", e)),
    }
}

/// Text-bearing form control, the only kinds with a value and a selection.
enum Control<'a> {
    Input(&'a HtmlInputElement),
    TextArea(&'a HtmlTextAreaElement),
}

impl<'a> Control<'a> {
    fn of(element: &'a Element) -> Option<Self> {
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            return Some(Control::Input(input));
        }
        element.dyn_ref::<HtmlTextAreaElement>().map(Control::TextArea)
    }
}

/// The browser document.
#[derive(Clone, Debug)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    /// The current window's document, if running in a window context.
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }

    pub fn from_document(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl DomPlatform for WebDom {
    type Element = Element;

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn parent_element(&self, element: &Element) -> Option<Element> {
        element.parent_element()
    }

    fn is_connected(&self, element: &Element) -> bool {
        element.is_connected()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn find_named_field(&self, name: &str) -> Option<Element> {
        let nodes = self.document.get_elements_by_name(name);
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .find(|element| Control::of(element).is_some())
    }

    fn element_at_point(&self, x: f64, y: f64) -> Option<Element> {
        self.document.element_from_point(x as f32, y as f32)
    }

    fn tag_name(&self, element: &Element) -> String {
        element.tag_name()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn value(&self, element: &Element) -> Option<String> {
        match Control::of(element)? {
            Control::Input(input) => Some(input.value()),
            Control::TextArea(area) => Some(area.value()),
        }
    }

    fn selection_range(&self, element: &Element) -> Option<SelectionRange> {
        // Inputs like type=email throw on selection access.
        let (start, end) = match Control::of(element)? {
            Control::Input(input) => (
                input.selection_start().ok()??,
                input.selection_end().ok()??,
            ),
            Control::TextArea(area) => (
                area.selection_start().ok()??,
                area.selection_end().ok()??,
            ),
        };
        Some(SelectionRange::new(start as usize, end as usize))
    }

    fn set_value(&self, element: &Element, value: &str) -> Result<(), PlatformError> {
        match Control::of(element) {
            Some(Control::Input(input)) => input.set_value(value),
            Some(Control::TextArea(area)) => area.set_value(value),
            None => return Err("not a text control".into()),
        }
        Ok(())
    }

    fn focus(&self, element: &Element) -> Result<(), PlatformError> {
        element
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| PlatformError::from("element is not focusable"))?
            .focus()
            .map_err(js_error)
    }

    fn set_selection_range(
        &self,
        element: &Element,
        range: SelectionRange,
    ) -> Result<(), PlatformError> {
        let start = u32::try_from(range.start).unwrap_or(u32::MAX);
        let end = u32::try_from(range.end).unwrap_or(u32::MAX);
        let result = match Control::of(element) {
            Some(Control::Input(input)) => input.set_selection_range(start, end),
            Some(Control::TextArea(area)) => area.set_selection_range(start, end),
            None => return Err("not a text control".into()),
        };
        result.map_err(js_error)
    }

    fn dispatch_event(&self, element: &Element, name: &str) -> Result<(), PlatformError> {
        let init = CustomEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        let event = CustomEvent::new_with_event_init_dict(name, &init).map_err(js_error)?;
        element.dispatch_event(&event).map_err(js_error)?;
        Ok(())
    }
}
