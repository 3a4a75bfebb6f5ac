use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlTextAreaElement};

use tackpad_core::{Element, Note};

use crate::dom::{set_position, set_size};

/// Shown in place of an empty title; the stored value stays empty.
pub const UNTITLED_LABEL: &str = "Untitled";

pub fn render_title(title_el: &HtmlElement, note: &Note) {
    if note.title().is_empty() {
        title_el.set_text_content(Some(UNTITLED_LABEL));
        let _ = title_el.set_attribute("data-placeholder", "true");
    } else {
        title_el.set_text_content(Some(note.title()));
        let _ = title_el.remove_attribute("data-placeholder");
    }
}

/// Full re-render of the note canvas: clears the container and rebuilds
/// one wrapper node per element, in the note's iteration order.
pub fn render_note(document: &Document, canvas: &HtmlElement, note: &Note) -> Result<(), JsValue> {
    canvas.set_inner_html("");
    for element in note.elements() {
        let node = render_element(document, element)?;
        canvas.append_child(&node)?;
    }
    Ok(())
}

fn render_element(document: &Document, element: &Element) -> Result<web_sys::Element, JsValue> {
    let wrapper = document.create_element("div")?;
    wrapper.set_class_name("element");
    wrapper.set_attribute("data-id", element.id())?;
    let wrapper_node: HtmlElement = wrapper.clone().dyn_into()?;
    set_position(&wrapper_node, element.x(), element.y());

    let controls = document.create_element("div")?;
    controls.set_class_name("element-controls");

    let pin = document.create_element("button")?;
    pin.set_class_name("pin");
    pin.set_attribute("type", "button")?;
    pin.set_attribute("title", "Move")?;
    pin.set_text_content(Some("\u{1f4cc}"));
    controls.append_child(&pin)?;

    let delete = document.create_element("button")?;
    delete.set_class_name("delete");
    delete.set_attribute("type", "button")?;
    delete.set_attribute("title", "Delete")?;
    delete.set_text_content(Some("\u{1f5d1}"));
    controls.append_child(&delete)?;

    wrapper.append_child(&controls)?;

    match element {
        Element::TextBox { .. } => {
            let textarea: HtmlTextAreaElement = document.create_element("textarea")?.dyn_into()?;
            textarea.set_class_name("element-text");
            textarea.set_attribute("data-id", element.id())?;
            textarea.set_value(element.text());
            set_size(&textarea, element.width(), element.height());
            wrapper.append_child(&textarea)?;
        }
    }

    let handle = document.create_element("div")?;
    handle.set_class_name("resize-handle");
    wrapper.append_child(&handle)?;

    Ok(wrapper)
}

/// In-place position/size refresh for the node of one element, used while
/// a drag is in flight so the textarea keeps focus and selection.
pub fn update_element_node(document: &Document, element: &Element) {
    let wrapper_selector = format!(".element[data-id=\"{}\"]", element.id());
    if let Ok(Some(node)) = document.query_selector(&wrapper_selector) {
        if let Ok(node) = node.dyn_into::<HtmlElement>() {
            set_position(&node, element.x(), element.y());
        }
    }
    let body_selector = format!("textarea[data-id=\"{}\"]", element.id());
    if let Ok(Some(node)) = document.query_selector(&body_selector) {
        if let Ok(node) = node.dyn_into::<HtmlElement>() {
            set_size(&node, element.width(), element.height());
        }
    }
}

pub fn focus_element_body(document: &Document, id: &str) {
    let selector = format!("textarea[data-id=\"{id}\"]");
    if let Ok(Some(node)) = document.query_selector(&selector) {
        if let Ok(node) = node.dyn_into::<HtmlElement>() {
            let _ = node.focus();
        }
    }
}
