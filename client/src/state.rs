use tackpad_core::{DragTracker, NoteStore};

#[derive(Clone, Copy, PartialEq)]
pub enum DragKind {
    Move,
    Resize,
}

/// The one in-flight gesture. Dropping it (or calling `finish` on the
/// tracker) ends the gesture; there is never more than one.
pub struct ActiveDrag {
    pub element_id: String,
    pub tracker: DragTracker,
}

pub struct App {
    pub store: NoteStore,
    pub drag: Option<ActiveDrag>,
}

impl App {
    pub fn new(store: NoteStore) -> Self {
        Self { store, drag: None }
    }
}
