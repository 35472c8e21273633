#![forbid(unsafe_code)]

//! Named lifecycle events.
//!
//! An [`EventBus`] maps event names (`"display"`, `"move"`, ...) to listener
//! sets. Listener functions receive the subject the bus belongs to and the
//! event name, and return `false` to veto when the trigger asked for it.
//!
//! # Invariants
//!
//! 1. Re-registering a listener on the same name is a no-op.
//! 2. Listeners run once per trigger, in registration order.
//! 3. A once-listener is removed before it runs, so re-entrant triggers never
//!    see it again.
//! 4. A listener removed during dispatch is skipped if it has not yet run.
//!
//! # Failure Modes
//!
//! - Listener panic: propagates out of [`EventBus::trigger`]; listeners later
//!   in the same dispatch do not run.
//! - Veto under `halt_on_false`: names triggered before the vetoing one stay
//!   triggered (no rollback).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use crate::listener::{Identity, ListenerKey, ListenerSet};

type EventFn<S> = dyn Fn(&S, &str) -> bool;

/// Shared handle to an event callback.
pub struct EventListener<S: ?Sized>(Rc<EventFn<S>>);

impl<S: ?Sized> Clone for EventListener<S> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<S: ?Sized> fmt::Debug for EventListener<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventListener").field(&self.key()).finish()
    }
}

impl<S: ?Sized> Identity for EventListener<S> {
    fn key(&self) -> ListenerKey {
        ListenerKey::of(&self.0)
    }
}

impl<S: ?Sized + 'static> EventListener<S> {
    /// Listener whose return value participates in vetoes.
    pub fn new(f: impl Fn(&S, &str) -> bool + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Listener that never vetoes.
    pub fn observer(f: impl Fn(&S, &str) + 'static) -> Self {
        Self(Rc::new(move |s: &S, name: &str| {
            f(s, name);
            true
        }))
    }

    #[inline]
    pub fn call(&self, subject: &S, name: &str) -> bool {
        (self.0)(subject, name)
    }
}

/// Per-subject event registry.
pub struct EventBus<S: ?Sized> {
    sets: RefCell<AHashMap<String, ListenerSet<EventListener<S>>>>,
}

impl<S: ?Sized> Default for EventBus<S> {
    fn default() -> Self {
        Self {
            sets: RefCell::new(AHashMap::new()),
        }
    }
}

impl<S: ?Sized> fmt::Debug for EventBus<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sets = self.sets.borrow();
        let mut names: Vec<(&String, usize)> = sets.iter().map(|(k, v)| (k, v.len())).collect();
        names.sort();
        f.debug_struct("EventBus").field("listeners", &names).finish()
    }
}

impl<S: ?Sized + 'static> EventBus<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` under every whitespace-separated name in `names`.
    ///
    /// Returns how many names gained the listener.
    pub fn on(&self, names: &str, listener: &EventListener<S>) -> usize {
        self.register(names, listener, false)
    }

    /// Like [`on`](Self::on), but the listener is dropped after its first call.
    pub fn once(&self, names: &str, listener: &EventListener<S>) -> usize {
        self.register(names, listener, true)
    }

    fn register(&self, names: &str, listener: &EventListener<S>, once: bool) -> usize {
        let mut sets = self.sets.borrow_mut();
        names
            .split_whitespace()
            .filter(|name| {
                sets.entry((*name).to_owned())
                    .or_default()
                    .insert(listener.clone(), once)
            })
            .count()
    }

    /// Remove `listener` from every name in `names`.
    pub fn off(&self, names: &str, listener: &EventListener<S>) -> usize {
        let key = listener.key();
        let mut sets = self.sets.borrow_mut();
        names
            .split_whitespace()
            .filter(|name| sets.get_mut(*name).is_some_and(|set| set.remove(key)))
            .count()
    }

    #[must_use]
    pub fn listener_count(&self, name: &str) -> usize {
        self.sets.borrow().get(name).map_or(0, ListenerSet::len)
    }

    pub fn clear(&self) {
        self.sets.borrow_mut().clear();
    }

    /// Fire every name in `names` in order.
    ///
    /// With `halt_on_false`, the first listener returning `false` stops the
    /// whole call and `false` is returned. Without it the result is always
    /// `true`.
    pub fn trigger(&self, subject: &S, names: &str, halt_on_false: bool) -> bool {
        for name in names.split_whitespace() {
            if !self.dispatch(subject, name, halt_on_false) {
                return false;
            }
        }
        true
    }

    fn dispatch(&self, subject: &S, name: &str, halt_on_false: bool) -> bool {
        let snapshot = match self.sets.borrow().get(name) {
            Some(set) if !set.is_empty() => set.snapshot(),
            _ => return true,
        };
        tracing::trace!(event = name, listeners = snapshot.len(), "dispatch");

        for (key, listener, once) in snapshot {
            let live = {
                let mut sets = self.sets.borrow_mut();
                match sets.get_mut(name) {
                    Some(set) if once => set.remove(key),
                    Some(set) => set.contains(key),
                    None => false,
                }
            };
            if !live {
                continue;
            }
            if !listener.call(subject, name) && halt_on_false {
                return false;
            }
        }
        true
    }
}
