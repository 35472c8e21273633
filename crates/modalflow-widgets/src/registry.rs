#![forbid(unsafe_code)]

//! Registry of modals that are currently open (displayed or hidden).

use std::cell::RefCell;
use std::collections::BTreeMap;

use modalflow_core::ModalId;

use crate::modal::Modal;

/// Open modals keyed by id, iterated in creation order.
#[derive(Debug, Default)]
pub struct OpenRegistry {
    open: RefCell<BTreeMap<ModalId, Modal>>,
}

impl OpenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, modal: &Modal) -> bool {
        self.open
            .borrow_mut()
            .insert(modal.id(), modal.clone())
            .is_none()
    }

    pub fn remove(&self, id: ModalId) -> Option<Modal> {
        self.open.borrow_mut().remove(&id)
    }

    #[must_use]
    pub fn contains(&self, id: ModalId) -> bool {
        self.open.borrow().contains_key(&id)
    }

    pub fn get(&self, id: ModalId) -> Option<Modal> {
        self.open.borrow().get(&id).cloned()
    }

    /// Handles to every open modal, oldest first.
    pub fn snapshot(&self) -> Vec<Modal> {
        self.open.borrow().values().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.open.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.open.borrow().is_empty()
    }

    /// Forget every entry without closing anything.
    pub fn clear(&self) {
        // Handles are released after the borrow ends.
        let drained = std::mem::take(&mut *self.open.borrow_mut());
        drop(drained);
    }
}
