use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, HtmlTextAreaElement, MouseEvent, PointerEvent, Window};

use tackpad_core::{Delta, DragTracker, Element, NoteStore, StorageError};

use crate::dom::{
    closest_from_event, element_id_from_event, get_element, is_event_target, set_drag_cursor,
};
use crate::persistence::LocalStorage;
use crate::render::{focus_element_body, render_note, render_title, update_element_node};
use crate::state::{ActiveDrag, App, DragKind};
use crate::util::make_id;

fn log_storage_error(error: &StorageError) {
    web_sys::console::error_1(&format!("Failed to persist note: {error}").into());
}

fn document_ready_state(document: &Document) -> Option<String> {
    js_sys::Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    if document_ready_state(&document).as_deref() != Some("loading") {
        return start_app(&window, &document);
    }

    let onready = Closure::<dyn FnMut(Event)>::new(move |_| {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        if let Err(error) = start_app(&window, &document) {
            web_sys::console::error_1(&error);
        }
    });
    document
        .add_event_listener_with_callback("DOMContentLoaded", onready.as_ref().unchecked_ref())?;
    onready.forget();
    Ok(())
}

fn start_app(window: &Window, document: &Document) -> Result<(), JsValue> {
    let canvas: HtmlElement = get_element(document, "note-canvas")?;
    let title_el: HtmlElement = get_element(document, "note-title")?;

    let storage =
        LocalStorage::from_window(window).map_err(|error| JsValue::from_str(&error.to_string()))?;
    let mut store = NoteStore::load_or_create_with_id(Box::new(storage), make_id());
    if store.recovered_from_invalid() {
        web_sys::console::warn_1(&"Stored note was unreadable, starting fresh".into());
    }

    // The title label tracks every mutation through the store's
    // subscriber list; element nodes are re-rendered explicitly.
    let title_for_updates = title_el.clone();
    store.subscribe(move |note| render_title(&title_for_updates, note));

    render_title(&title_el, store.note());
    render_note(document, &canvas, store.note())?;

    let app = Rc::new(RefCell::new(App::new(store)));

    wire_canvas_dblclick(&app, document, &canvas)?;
    wire_title_rename(&app, window, &title_el)?;
    wire_drag_start(&app, document, &canvas)?;
    wire_drag_motion(&app, window, document, &canvas)?;
    wire_delete(&app, document, &canvas)?;
    wire_text_input(&app, &canvas)?;

    Ok(())
}

/// Double-click on the bare canvas places a new text box at the pointer,
/// in canvas coordinates. Double-clicks inside an element are ignored.
fn wire_canvas_dblclick(
    app: &Rc<RefCell<App>>,
    document: &Document,
    canvas: &HtmlElement,
) -> Result<(), JsValue> {
    let handler = {
        let app = app.clone();
        let document = document.clone();
        let canvas = canvas.clone();
        Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            if !is_event_target(event.as_ref(), &canvas) {
                return;
            }
            let rect = canvas.get_bounding_client_rect();
            let x = f64::from(event.client_x()) - rect.left();
            let y = f64::from(event.client_y()) - rect.top();
            let Ok(element) = Element::text_box(make_id(), x, y) else {
                return;
            };
            let id = element.id().to_string();
            {
                let mut app = app.borrow_mut();
                if let Err(error) = app.store.add_element(element) {
                    log_storage_error(&error);
                }
                let _ = render_note(&document, &canvas, app.store.note());
            }
            focus_element_body(&document, &id);
        })
    };
    canvas.add_event_listener_with_callback("dblclick", handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}

/// Double-click on the title opens a rename prompt. The subscriber
/// refreshes the label, including the placeholder for an empty title.
fn wire_title_rename(
    app: &Rc<RefCell<App>>,
    window: &Window,
    title_el: &HtmlElement,
) -> Result<(), JsValue> {
    let handler = {
        let app = app.clone();
        let window = window.clone();
        Closure::<dyn FnMut(MouseEvent)>::new(move |_| {
            let current = app.borrow().store.note().title().to_string();
            let Ok(Some(title)) = window.prompt_with_message_and_default("Note title", &current)
            else {
                return;
            };
            if let Err(error) = app.borrow_mut().store.set_title(title) {
                log_storage_error(&error);
            }
        })
    };
    title_el.add_event_listener_with_callback("dblclick", handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}

/// Pointer-down on a pin starts a move gesture, on a resize handle a
/// resize gesture. The tracker feeds incremental deltas back into the
/// store; the dragged node is repositioned in place.
fn wire_drag_start(
    app: &Rc<RefCell<App>>,
    document: &Document,
    canvas: &HtmlElement,
) -> Result<(), JsValue> {
    let handler = {
        let app = app.clone();
        let document = document.clone();
        let canvas = canvas.clone();
        Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let kind = if closest_from_event(event.as_ref(), ".pin").is_some() {
                DragKind::Move
            } else if closest_from_event(event.as_ref(), ".resize-handle").is_some() {
                DragKind::Resize
            } else {
                return;
            };
            let Some(id) = element_id_from_event(event.as_ref()) else {
                return;
            };
            if app.borrow().drag.is_some() {
                return;
            }
            event.prevent_default();

            let callback = {
                let app = app.clone();
                let document = document.clone();
                let id = id.clone();
                move |delta: Delta| {
                    let mut app = app.borrow_mut();
                    let result = match kind {
                        DragKind::Move => {
                            let Some(element) = app.store.note().element(&id) else {
                                return;
                            };
                            let (x, y) = (element.x() + delta.dx, element.y() + delta.dy);
                            app.store.move_element(&id, x, y)
                        }
                        DragKind::Resize => app.store.resize_element(&id, delta.dx, delta.dy),
                    };
                    if let Err(error) = result {
                        log_storage_error(&error);
                    }
                    if let Some(element) = app.store.note().element(&id) {
                        update_element_node(&document, element);
                    }
                }
            };
            let mut tracker = DragTracker::new(callback);
            tracker.pointer_down(f64::from(event.client_x()), f64::from(event.client_y()));
            app.borrow_mut().drag = Some(ActiveDrag {
                element_id: id,
                tracker,
            });
            set_drag_cursor(&canvas, Some(kind));
        })
    };
    canvas.add_event_listener_with_callback("pointerdown", handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}

/// Document-level motion and termination events for the active gesture.
/// Pointer-up, window blur, and the pointer leaving the page all end the
/// drag the same way; whichever arrives first wins.
fn wire_drag_motion(
    app: &Rc<RefCell<App>>,
    window: &Window,
    document: &Document,
    canvas: &HtmlElement,
) -> Result<(), JsValue> {
    let on_move = {
        let app = app.clone();
        let canvas = canvas.clone();
        Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            // Taken out of the app so the tracker callback can borrow it.
            let Some(mut drag) = app.borrow_mut().drag.take() else {
                return;
            };
            if app.borrow().store.note().element(&drag.element_id).is_none() {
                // Deleted mid-gesture; nothing left to drag.
                drag.tracker.finish();
                set_drag_cursor(&canvas, None);
                return;
            }
            drag.tracker
                .pointer_move(f64::from(event.client_x()), f64::from(event.client_y()));
            app.borrow_mut().drag = Some(drag);
        })
    };
    document.add_event_listener_with_callback("pointermove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();

    let on_end = {
        let app = app.clone();
        let canvas = canvas.clone();
        Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut app = app.borrow_mut();
            if let Some(drag) = app.drag.as_mut() {
                drag.tracker.finish();
            }
            app.drag = None;
            set_drag_cursor(&canvas, None);
        })
    };
    document.add_event_listener_with_callback("pointerup", on_end.as_ref().unchecked_ref())?;
    document.add_event_listener_with_callback("mouseleave", on_end.as_ref().unchecked_ref())?;
    window.add_event_listener_with_callback("blur", on_end.as_ref().unchecked_ref())?;
    on_end.forget();
    Ok(())
}

fn wire_delete(
    app: &Rc<RefCell<App>>,
    document: &Document,
    canvas: &HtmlElement,
) -> Result<(), JsValue> {
    let handler = {
        let app = app.clone();
        let document = document.clone();
        let canvas = canvas.clone();
        Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            if closest_from_event(event.as_ref(), ".delete").is_none() {
                return;
            }
            let Some(id) = element_id_from_event(event.as_ref()) else {
                return;
            };
            let mut app = app.borrow_mut();
            if let Err(error) = app.store.remove_element(&id) {
                log_storage_error(&error);
            }
            let _ = render_note(&document, &canvas, app.store.note());
        })
    };
    canvas.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}

/// Text edits flow straight into the store without a re-render, so the
/// textarea keeps focus and caret position.
fn wire_text_input(app: &Rc<RefCell<App>>, canvas: &HtmlElement) -> Result<(), JsValue> {
    let handler = {
        let app = app.clone();
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(textarea) = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlTextAreaElement>().ok())
            else {
                return;
            };
            let Some(id) = textarea.get_attribute("data-id") else {
                return;
            };
            if let Err(error) = app.borrow_mut().store.set_element_text(&id, textarea.value()) {
                log_storage_error(&error);
            }
        })
    };
    canvas.add_event_listener_with_callback("input", handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}
