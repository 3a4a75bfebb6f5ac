mod codec;
mod gesture;
mod ids;
mod model;
mod storage;
mod store;

pub use codec::{deserialize_note, serialize_note, DecodeError, EncodeError};
pub use gesture::{Delta, DragTracker};
pub use ids::generate_id;
pub use model::{
    Element, ModelError, Note, DEFAULT_TEXT_BOX_HEIGHT, DEFAULT_TEXT_BOX_WIDTH,
    MIN_ELEMENT_HEIGHT, MIN_ELEMENT_WIDTH,
};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{NoteStore, SubscriptionId};
