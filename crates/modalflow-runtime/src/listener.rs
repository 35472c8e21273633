#![forbid(unsafe_code)]

//! Ordered listener storage keyed by callback identity.
//!
//! Two registrations are "the same listener" iff they share one `Rc`
//! allocation. Cloning a listener handle keeps its identity; wrapping the same
//! closure body in a second `Rc::new` does not.
//!
//! # Invariants
//!
//! 1. Each key appears at most once; inserting a present key is a no-op.
//! 2. Iteration and [`ListenerSet::snapshot`] follow insertion order.
//! 3. `len()` equals the number of distinct keys held.

use std::rc::Rc;

use ahash::AHashSet;

/// Identity of a listener: the address of its shared allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerKey(usize);

impl ListenerKey {
    /// Key for the allocation behind `rc`.
    pub fn of<T: ?Sized>(rc: &Rc<T>) -> Self {
        Self(Rc::as_ptr(rc).cast::<()>() as usize)
    }
}

/// Anything that can be stored in a [`ListenerSet`].
pub trait Identity {
    fn key(&self) -> ListenerKey;
}

#[derive(Debug, Clone)]
struct Entry<L> {
    key: ListenerKey,
    listener: L,
    once: bool,
}

/// Insertion-ordered set of listeners.
#[derive(Debug, Clone)]
pub struct ListenerSet<L> {
    entries: Vec<Entry<L>>,
    keys: AHashSet<ListenerKey>,
}

impl<L> Default for ListenerSet<L> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            keys: AHashSet::new(),
        }
    }
}

impl<L: Identity + Clone> ListenerSet<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `listener`. Returns `false` if it was already present.
    pub fn insert(&mut self, listener: L, once: bool) -> bool {
        let key = listener.key();
        if !self.keys.insert(key) {
            return false;
        }
        self.entries.push(Entry {
            key,
            listener,
            once,
        });
        true
    }

    /// Remove the listener with `key`. Returns `true` if it was present.
    pub fn remove(&mut self, key: ListenerKey) -> bool {
        if !self.keys.remove(&key) {
            return false;
        }
        self.entries.retain(|e| e.key != key);
        true
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, key: ListenerKey) -> bool {
        self.keys.contains(&key)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.keys.clear();
    }

    /// Copy of `(key, listener, once)` in insertion order.
    pub fn snapshot(&self) -> Vec<(ListenerKey, L, bool)> {
        self.entries
            .iter()
            .map(|e| (e.key, e.listener.clone(), e.once))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &L> {
        self.entries.iter().map(|e| &e.listener)
    }
}
