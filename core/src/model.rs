use serde::{Deserialize, Serialize};

use crate::ids::generate_id;

pub const DEFAULT_TEXT_BOX_WIDTH: f64 = 200.0;
pub const DEFAULT_TEXT_BOX_HEIGHT: f64 = 60.0;

/// Smallest size an element can be resized down to. Negative or zero
/// dimensions are nonsensical for rendering, so deltas clamp here.
pub const MIN_ELEMENT_WIDTH: f64 = 20.0;
pub const MIN_ELEMENT_HEIGHT: f64 = 20.0;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ModelError {
    #[error("element position must be finite, got ({x}, {y})")]
    NonFinitePosition { x: f64, y: f64 },
}

/// A placeable item on the note canvas, tagged by variant so the view
/// layer can dispatch on `kind()` and the codec on the `type` field.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum Element {
    TextBox {
        id: String,
        x: f64,
        y: f64,
        #[serde(default = "default_text_box_width")]
        width: f64,
        #[serde(default = "default_text_box_height")]
        height: f64,
        #[serde(default)]
        text: String,
    },
}

fn default_text_box_width() -> f64 {
    DEFAULT_TEXT_BOX_WIDTH
}

fn default_text_box_height() -> f64 {
    DEFAULT_TEXT_BOX_HEIGHT
}

impl Element {
    /// Constructs a text box at the given position with default size and
    /// empty text. Positions must be finite.
    pub fn text_box(id: impl Into<String>, x: f64, y: f64) -> Result<Self, ModelError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ModelError::NonFinitePosition { x, y });
        }
        Ok(Element::TextBox {
            id: id.into(),
            x,
            y,
            width: DEFAULT_TEXT_BOX_WIDTH,
            height: DEFAULT_TEXT_BOX_HEIGHT,
            text: String::new(),
        })
    }

    /// Constructs a text box with a freshly generated id.
    pub fn new_text_box(x: f64, y: f64) -> Result<Self, ModelError> {
        Self::text_box(generate_id(), x, y)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Element::TextBox { .. } => "TextBox",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Element::TextBox { id, .. } => id,
        }
    }

    pub fn x(&self) -> f64 {
        match self {
            Element::TextBox { x, .. } => *x,
        }
    }

    pub fn y(&self) -> f64 {
        match self {
            Element::TextBox { y, .. } => *y,
        }
    }

    pub fn width(&self) -> f64 {
        match self {
            Element::TextBox { width, .. } => *width,
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            Element::TextBox { height, .. } => *height,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Element::TextBox { text, .. } => text,
        }
    }

    /// Overwrites the position unconditionally. Elements may be moved
    /// off-canvas; there is no bounds check.
    pub fn move_to(&mut self, new_x: f64, new_y: f64) {
        match self {
            Element::TextBox { x, y, .. } => {
                *x = new_x;
                *y = new_y;
            }
        }
    }

    /// Adds the deltas to the size, clamped to the minimum element size.
    pub fn resize_by(&mut self, dx: f64, dy: f64) {
        match self {
            Element::TextBox { width, height, .. } => {
                *width = (*width + dx).max(MIN_ELEMENT_WIDTH);
                *height = (*height + dy).max(MIN_ELEMENT_HEIGHT);
            }
        }
    }

    pub fn set_text(&mut self, new_text: impl Into<String>) {
        match self {
            Element::TextBox { text, .. } => *text = new_text.into(),
        }
    }
}

/// The top-level document: a title plus the elements placed on it.
/// Elements are keyed by id; insertion order is preserved.
#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    id: String,
    title: String,
    elements: Vec<Element>,
}

impl Note {
    pub fn new() -> Self {
        Self::with_parts(generate_id(), String::new())
    }

    pub fn with_parts(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            elements: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Overwrites the title unconditionally. Empty is allowed; the view
    /// substitutes a placeholder label without changing the stored value.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|element| element.id() == id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|element| element.id() == id)
    }

    /// Inserts by id with upsert semantics: an existing element with the
    /// same id is replaced in place, keeping its slot in iteration order.
    pub fn add_element(&mut self, element: Element) {
        if let Some(index) = self
            .elements
            .iter()
            .position(|existing| existing.id() == element.id())
        {
            self.elements[index] = element;
        } else {
            self.elements.push(element);
        }
    }

    /// Removes by id. Removing an id that is not present is a no-op.
    pub fn remove_element(&mut self, id: &str) -> bool {
        if let Some(index) = self.elements.iter().position(|element| element.id() == id) {
            self.elements.remove(index);
            true
        } else {
            false
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new()
    }
}
