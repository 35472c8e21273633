#![forbid(unsafe_code)]

//! Close channels with exactly-once delivery.
//!
//! A [`CloseBus`] holds one listener set per [`CloseChannel`]. Closing through
//! a channel delivers to the union of the `all` listeners and that channel's
//! listeners, each distinct listener exactly once, and then exhausts the bus.
//!
//! # Invariants
//!
//! 1. [`CloseBus::trigger_close`] delivers at most once per bus lifetime.
//! 2. A listener registered on both `all` and the firing channel runs once.
//! 3. `all` listeners run before the channel's own listeners.
//! 4. After exhaustion every channel is empty and further registrations are
//!    ignored.
//!
//! # Failure Modes
//!
//! - Listener panic: aborts the remaining listeners of that dispatch. The bus
//!   is already exhausted at that point, so nothing is ever redelivered.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use ahash::AHashSet;

use crate::listener::{Identity, ListenerKey, ListenerSet};

/// Why a dialog is being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum CloseChannel {
    /// Backwards navigation through a flow.
    Back,
    /// A close control inside the dialog.
    Button,
    /// A programmatic close call.
    #[default]
    Method,
    /// Fires on every close, whatever the channel.
    All,
}

impl CloseChannel {
    pub const ALL_CHANNELS: [Self; 4] = [Self::Back, Self::Button, Self::Method, Self::All];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Back => "back",
            Self::Button => "button",
            Self::Method => "method",
            Self::All => "all",
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Back => 0,
            Self::Button => 1,
            Self::Method => 2,
            Self::All => 3,
        }
    }

    /// Parse a whitespace-separated channel list such as `"back button"`.
    pub fn parse_list(list: &str) -> Result<Vec<Self>, UnknownChannel> {
        list.split_whitespace().map(str::parse).collect()
    }
}

impl fmt::Display for CloseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloseChannel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "back" => Ok(Self::Back),
            "button" => Ok(Self::Button),
            "method" => Ok(Self::Method),
            "all" => Ok(Self::All),
            other => Err(UnknownChannel(other.to_owned())),
        }
    }
}

/// A channel name outside `back|button|method|all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChannel(pub String);

impl fmt::Display for UnknownChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown close channel: {}", self.0)
    }
}

impl std::error::Error for UnknownChannel {}

/// Shared handle to a close callback.
pub struct CloseListener<S: ?Sized>(Rc<dyn Fn(&S)>);

impl<S: ?Sized> Clone for CloseListener<S> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<S: ?Sized> fmt::Debug for CloseListener<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CloseListener").field(&self.key()).finish()
    }
}

impl<S: ?Sized> Identity for CloseListener<S> {
    fn key(&self) -> ListenerKey {
        ListenerKey::of(&self.0)
    }
}

impl<S: ?Sized + 'static> CloseListener<S> {
    pub fn new(f: impl Fn(&S) + 'static) -> Self {
        Self(Rc::new(f))
    }

    #[inline]
    pub fn call(&self, subject: &S) {
        (self.0)(subject);
    }
}

/// Four close channels plus the exhaustion latch.
pub struct CloseBus<S: ?Sized> {
    channels: RefCell<[ListenerSet<CloseListener<S>>; 4]>,
    exhausted: Cell<bool>,
}

impl<S: ?Sized> Default for CloseBus<S> {
    fn default() -> Self {
        Self {
            channels: RefCell::new(std::array::from_fn(|_| ListenerSet::default())),
            exhausted: Cell::new(false),
        }
    }
}

impl<S: ?Sized> fmt::Debug for CloseBus<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channels = self.channels.borrow();
        let mut d = f.debug_struct("CloseBus");
        for ch in CloseChannel::ALL_CHANNELS {
            d.field(ch.as_str(), &channels[ch.slot()].len());
        }
        d.field("exhausted", &self.exhausted.get()).finish()
    }
}

impl<S: ?Sized + 'static> CloseBus<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register on one channel. Returns `false` for duplicates and after
    /// exhaustion.
    pub fn on(&self, channel: CloseChannel, listener: &CloseListener<S>) -> bool {
        if self.exhausted.get() {
            return false;
        }
        self.channels.borrow_mut()[channel.slot()].insert(listener.clone(), false)
    }

    /// Register on several channels at once.
    pub fn on_many(&self, channels: &[CloseChannel], listener: &CloseListener<S>) -> usize {
        channels.iter().filter(|ch| self.on(**ch, listener)).count()
    }

    pub fn off(&self, channel: CloseChannel, listener: &CloseListener<S>) -> bool {
        self.channels.borrow_mut()[channel.slot()].remove(listener.key())
    }

    #[must_use]
    pub fn contains(&self, channel: CloseChannel, listener: &CloseListener<S>) -> bool {
        self.channels.borrow()[channel.slot()].contains(listener.key())
    }

    #[must_use]
    pub fn listener_count(&self, channel: CloseChannel) -> usize {
        self.channels.borrow()[channel.slot()].len()
    }

    #[inline]
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted.get()
    }

    /// Deliver the close to `all` plus `channel` listeners.
    ///
    /// Returns the number of listeners called; `0` once exhausted.
    pub fn trigger_close(&self, subject: &S, channel: CloseChannel) -> usize {
        if self.exhausted.replace(true) {
            return 0;
        }

        let batch = {
            let mut channels = self.channels.borrow_mut();
            let mut seen = AHashSet::new();
            let mut batch = Vec::new();
            for ch in [CloseChannel::All, channel] {
                for (key, listener, _) in channels[ch.slot()].snapshot() {
                    if seen.insert(key) {
                        batch.push(listener);
                    }
                }
            }
            for set in channels.iter_mut() {
                set.clear();
            }
            batch
        };

        tracing::trace!(channel = channel.as_str(), listeners = batch.len(), "close dispatch");
        for listener in &batch {
            listener.call(subject);
        }
        batch.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Subject;

    fn counter() -> (Rc<Cell<u32>>, CloseListener<Subject>) {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        (hits, CloseListener::new(move |_| h.set(h.get() + 1)))
    }

    #[test]
    fn channel_names_round_trip() {
        for ch in CloseChannel::ALL_CHANNELS {
            assert_eq!(ch.as_str().parse::<CloseChannel>(), Ok(ch));
        }
        assert_eq!(
            CloseChannel::parse_list("back all").unwrap(),
            vec![CloseChannel::Back, CloseChannel::All]
        );
        assert!("escape".parse::<CloseChannel>().is_err());
        assert_eq!(CloseChannel::default(), CloseChannel::Method);
    }

    #[test]
    fn shared_listener_fires_exactly_once() {
        let bus = CloseBus::<Subject>::new();
        let (hits, l) = counter();
        bus.on(CloseChannel::All, &l);
        bus.on(CloseChannel::Button, &l);
        assert_eq!(bus.trigger_close(&Subject, CloseChannel::Button), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn other_channels_do_not_fire() {
        let bus = CloseBus::<Subject>::new();
        let (back_hits, back) = counter();
        let (all_hits, all) = counter();
        bus.on(CloseChannel::Back, &back);
        bus.on(CloseChannel::All, &all);
        bus.trigger_close(&Subject, CloseChannel::Method);
        assert_eq!(back_hits.get(), 0);
        assert_eq!(all_hits.get(), 1);
    }

    #[test]
    fn all_listeners_run_first() {
        let bus = CloseBus::<Subject>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (Rc::clone(&log), Rc::clone(&log));
        bus.on(CloseChannel::Back, &CloseListener::new(move |_| a.borrow_mut().push("back")));
        bus.on(CloseChannel::All, &CloseListener::new(move |_| b.borrow_mut().push("all")));
        bus.trigger_close(&Subject, CloseChannel::Back);
        assert_eq!(*log.borrow(), vec!["all", "back"]);
    }

    #[test]
    fn second_trigger_is_a_no_op() {
        let bus = CloseBus::<Subject>::new();
        let (hits, l) = counter();
        bus.on_many(&[CloseChannel::All, CloseChannel::Method], &l);
        bus.trigger_close(&Subject, CloseChannel::Method);
        assert_eq!(bus.trigger_close(&Subject, CloseChannel::All), 0);
        assert_eq!(hits.get(), 1);
        assert!(bus.is_exhausted());
        assert!(!bus.on(CloseChannel::All, &l));
        assert_eq!(bus.listener_count(CloseChannel::All), 0);
    }

    #[test]
    fn reentrant_close_from_listener_is_ignored() {
        let bus = Rc::new(CloseBus::<Subject>::new());
        let (hits, counted) = counter();
        let weak = Rc::downgrade(&bus);
        bus.on(
            CloseChannel::All,
            &CloseListener::new(move |s| {
                if let Some(bus) = weak.upgrade() {
                    assert_eq!(bus.trigger_close(s, CloseChannel::Back), 0);
                }
            }),
        );
        bus.on(CloseChannel::Back, &counted);
        bus.trigger_close(&Subject, CloseChannel::Back);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn off_unregisters() {
        let bus = CloseBus::<Subject>::new();
        let (hits, l) = counter();
        bus.on(CloseChannel::All, &l);
        assert!(bus.contains(CloseChannel::All, &l));
        assert!(bus.off(CloseChannel::All, &l));
        bus.trigger_close(&Subject, CloseChannel::Method);
        assert_eq!(hits.get(), 0);
    }
}
