use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Element, Note};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed note document: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("failed to render note document: {0}")]
    Render(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct NoteDocRef<'a> {
    id: &'a str,
    title: &'a str,
    elements: &'a [Element],
}

#[derive(Deserialize)]
struct NoteDoc {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    elements: Vec<Value>,
}

/// Renders a note as the persisted JSON document:
/// `{ id, title, elements: [{ id, type, x, y, width, height, ... }] }`.
pub fn serialize_note(note: &Note) -> Result<String, EncodeError> {
    Ok(serde_json::to_string(&NoteDocRef {
        id: note.id(),
        title: note.title(),
        elements: note.elements(),
    })?)
}

/// Parses a persisted document back into a note. Malformed JSON is fatal
/// to the caller; element records that fail to decode, including records
/// with an unknown `type`, are dropped without error.
pub fn deserialize_note(data: &str) -> Result<Note, DecodeError> {
    let doc: NoteDoc = serde_json::from_str(data)?;
    let mut note = Note::with_parts(doc.id, doc.title);
    for record in doc.elements {
        if let Ok(element) = serde_json::from_value::<Element>(record) {
            note.add_element(element);
        }
    }
    Ok(note)
}
