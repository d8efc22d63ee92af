//! Change listeners shared by the contribution manager and the contributor
//! directory.

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};

/// Handle returned by `subscribe`, used to stop notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(u64);

type Listener<T> = Box<dyn Fn(&[T])>;

pub(crate) struct Listeners<T> {
    entries: RefCell<Vec<(ListenerId, Listener<T>)>>,
    next: Cell<u64>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next: Cell::new(0),
        }
    }
}

impl<T> Listeners<T> {
    pub(crate) fn add(&self, listener: impl Fn(&[T]) + 'static) -> ListenerId {
        let id = ListenerId(self.next.get());
        self.next.set(id.0 + 1);
        self.entries.borrow_mut().push((id, Box::new(listener)));
        id
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry, _)| *entry != id);
        entries.len() != before
    }

    /// Listeners must not subscribe or unsubscribe from inside the callback.
    pub(crate) fn notify(&self, items: &[T]) {
        for (_, listener) in self.entries.borrow().iter() {
            listener(items);
        }
    }
}
