use crate::codec::{deserialize_note, serialize_note};
use crate::ids::generate_id;
use crate::model::{Element, Note};
use crate::storage::{Storage, StorageError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&Note)>;

/// Owns the note, a subscriber list, and the storage port. Every mutation
/// marks the note dirty, notifies subscribers, and then writes the
/// serialized document back through the port, so a subscriber always sees
/// a mutation before the persistence write that follows it.
pub struct NoteStore {
    note: Note,
    dirty: bool,
    recovered_from_invalid: bool,
    storage: Box<dyn Storage>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl NoteStore {
    /// Loads the persisted note, or starts a fresh empty one when nothing
    /// is stored or the stored document cannot be read back.
    pub fn load_or_create(storage: Box<dyn Storage>) -> Self {
        Self::load_or_create_with_id(storage, generate_id())
    }

    /// `load_or_create` with the caller minting the id a fresh note would
    /// take. Browser callers must pass their own id: the core generator
    /// reads a system clock the wasm sandbox does not provide.
    pub fn load_or_create_with_id(storage: Box<dyn Storage>, fresh_id: impl Into<String>) -> Self {
        let mut recovered_from_invalid = false;
        let loaded = match storage.load() {
            Ok(Some(data)) => match deserialize_note(&data) {
                Ok(note) => Some(note),
                Err(_) => {
                    recovered_from_invalid = true;
                    None
                }
            },
            Ok(None) => None,
            Err(_) => {
                recovered_from_invalid = true;
                None
            }
        };
        let note = loaded.unwrap_or_else(|| Note::with_parts(fresh_id, String::new()));
        Self {
            note,
            dirty: false,
            recovered_from_invalid,
            storage,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    /// True while a mutation has not yet been persisted successfully.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True when the persisted document existed but could not be decoded
    /// and the store fell back to a fresh note.
    pub fn recovered_from_invalid(&self) -> bool {
        self.recovered_from_invalid
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&Note) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers
            .retain(|(subscription, _)| *subscription != id);
    }

    pub fn add_element(&mut self, element: Element) -> Result<(), StorageError> {
        self.note.add_element(element);
        self.commit()
    }

    /// Removing an id that is not present is a no-op and does not persist.
    pub fn remove_element(&mut self, id: &str) -> Result<(), StorageError> {
        if self.note.remove_element(id) {
            self.commit()
        } else {
            Ok(())
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), StorageError> {
        self.note.set_title(title);
        self.commit()
    }

    pub fn move_element(&mut self, id: &str, x: f64, y: f64) -> Result<(), StorageError> {
        let Some(element) = self.note.element_mut(id) else {
            return Ok(());
        };
        element.move_to(x, y);
        self.commit()
    }

    pub fn resize_element(&mut self, id: &str, dx: f64, dy: f64) -> Result<(), StorageError> {
        let Some(element) = self.note.element_mut(id) else {
            return Ok(());
        };
        element.resize_by(dx, dy);
        self.commit()
    }

    pub fn set_element_text(
        &mut self,
        id: &str,
        text: impl Into<String>,
    ) -> Result<(), StorageError> {
        let Some(element) = self.note.element_mut(id) else {
            return Ok(());
        };
        element.set_text(text);
        self.commit()
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        self.dirty = true;
        self.notify();
        let data = serialize_note(&self.note)
            .map_err(|error| StorageError::Save(error.to_string()))?;
        self.storage.save(&data)?;
        self.dirty = false;
        Ok(())
    }

    fn notify(&mut self) {
        // Swapped out so a callback may subscribe without aliasing the list.
        let mut subscribers = std::mem::take(&mut self.subscribers);
        for (_, callback) in subscribers.iter_mut() {
            callback(&self.note);
        }
        let added = std::mem::replace(&mut self.subscribers, subscribers);
        self.subscribers.extend(added);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DEFAULT_TEXT_BOX_HEIGHT, DEFAULT_TEXT_BOX_WIDTH};
    use crate::storage::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingStorage {
        events: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Storage for RecordingStorage {
        fn load(&self) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn save(&self, _data: &str) -> Result<(), StorageError> {
            self.events.borrow_mut().push("save");
            Ok(())
        }
    }

    #[test]
    fn subscribers_run_before_the_persistence_write() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut store = NoteStore::load_or_create(Box::new(RecordingStorage {
            events: events.clone(),
        }));
        let notify_events = events.clone();
        store.subscribe(move |_| notify_events.borrow_mut().push("notify"));

        store.set_title("shopping").unwrap();
        assert_eq!(*events.borrow(), vec!["notify", "save"]);
    }

    #[test]
    fn every_mutation_saves() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut store = NoteStore::load_or_create(Box::new(RecordingStorage {
            events: events.clone(),
        }));

        let element = Element::text_box("a", 1.0, 1.0).unwrap();
        store.add_element(element).unwrap();
        store.move_element("a", 2.0, 2.0).unwrap();
        store.resize_element("a", 5.0, 5.0).unwrap();
        store.set_element_text("a", "hi").unwrap();
        store.remove_element("a").unwrap();
        assert_eq!(events.borrow().len(), 5);
        assert!(!store.is_dirty());
    }

    #[test]
    fn missing_id_mutations_do_not_save_or_notify() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut store = NoteStore::load_or_create(Box::new(RecordingStorage {
            events: events.clone(),
        }));
        let notify_events = events.clone();
        store.subscribe(move |_| notify_events.borrow_mut().push("notify"));

        store.move_element("ghost", 1.0, 1.0).unwrap();
        store.resize_element("ghost", 1.0, 1.0).unwrap();
        store.set_element_text("ghost", "boo").unwrap();
        store.remove_element("ghost").unwrap();
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = NoteStore::load_or_create(Box::new(MemoryStorage::new()));
        let count = Rc::new(RefCell::new(0));
        let observed = count.clone();
        let subscription = store.subscribe(move |_| *observed.borrow_mut() += 1);

        store.set_title("a").unwrap();
        store.unsubscribe(subscription);
        store.set_title("b").unwrap();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn corrupt_persisted_data_falls_back_to_a_fresh_note() {
        let storage = MemoryStorage::with_contents("this is not json");
        let store = NoteStore::load_or_create(Box::new(storage));
        assert!(store.recovered_from_invalid());
        assert!(store.note().is_empty());
        assert_eq!(store.note().title(), "");
    }

    #[test]
    fn first_run_starts_fresh_without_recovery() {
        let store = NoteStore::load_or_create(Box::new(MemoryStorage::new()));
        assert!(!store.recovered_from_invalid());
        assert!(store.note().is_empty());
    }

    #[test]
    fn a_fresh_note_takes_the_caller_minted_id() {
        let store =
            NoteStore::load_or_create_with_id(Box::new(MemoryStorage::new()), "minted-1");
        assert_eq!(store.note().id(), "minted-1");

        let corrupt = MemoryStorage::with_contents("not json");
        let store = NoteStore::load_or_create_with_id(Box::new(corrupt), "minted-2");
        assert!(store.recovered_from_invalid());
        assert_eq!(store.note().id(), "minted-2");
    }

    #[test]
    fn a_loaded_note_keeps_its_stored_id() {
        let storage = Rc::new(MemoryStorage::new());
        let mut store = NoteStore::load_or_create_with_id(Box::new(storage.clone()), "minted-1");
        store.set_title("kept").unwrap();

        let reloaded = NoteStore::load_or_create_with_id(Box::new(storage), "minted-2");
        assert_eq!(reloaded.note().id(), "minted-1");
        assert_eq!(reloaded.note().title(), "kept");
    }

    #[test]
    fn edit_session_survives_a_reload() {
        let storage = Rc::new(MemoryStorage::new());
        let mut store = NoteStore::load_or_create(Box::new(storage.clone()));

        let element = Element::text_box("el-1", 50.0, 50.0).unwrap();
        store.add_element(element).unwrap();
        store.set_element_text("el-1", "hello").unwrap();
        store.move_element("el-1", 70.0, 90.0).unwrap();

        let reloaded = NoteStore::load_or_create(Box::new(storage));
        assert!(!reloaded.recovered_from_invalid());
        assert_eq!(reloaded.note().elements().len(), 1);
        let element = reloaded.note().element("el-1").unwrap();
        assert_eq!((element.x(), element.y()), (70.0, 90.0));
        assert_eq!(
            (element.width(), element.height()),
            (DEFAULT_TEXT_BOX_WIDTH, DEFAULT_TEXT_BOX_HEIGHT)
        );
        assert_eq!(element.text(), "hello");
    }
}
