use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, EventTarget, HtmlElement};

use crate::state::DragKind;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

/// True when the event fired on `node` itself, not on a descendant.
/// Double-clicks inside a text box must not spawn new elements.
pub fn is_event_target(event: &Event, node: &HtmlElement) -> bool {
    let node: &EventTarget = node.as_ref();
    event.target().is_some_and(|target| &target == node)
}

pub fn set_position(node: &HtmlElement, x: f64, y: f64) {
    let style = node.style();
    let _ = style.set_property("left", &format!("{x}px"));
    let _ = style.set_property("top", &format!("{y}px"));
}

pub fn set_size(node: &HtmlElement, width: f64, height: f64) {
    let style = node.style();
    let _ = style.set_property("width", &format!("{width}px"));
    let _ = style.set_property("height", &format!("{height}px"));
}

pub fn set_drag_cursor(canvas: &HtmlElement, drag: Option<DragKind>) {
    let cursor = match drag {
        Some(DragKind::Move) => "grabbing",
        Some(DragKind::Resize) => "nwse-resize",
        None => "default",
    };
    let _ = canvas.style().set_property("cursor", cursor);
}

/// Walks up from the event target to the closest node matching `selector`.
pub fn closest_from_event(event: &Event, selector: &str) -> Option<web_sys::Element> {
    let target = event.target()?.dyn_into::<web_sys::Element>().ok()?;
    target.closest(selector).ok().flatten()
}

/// The element id carried by the wrapper node around the event target.
pub fn element_id_from_event(event: &Event) -> Option<String> {
    closest_from_event(event, ".element")?.get_attribute("data-id")
}
