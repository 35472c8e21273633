#![forbid(unsafe_code)]

//! Navigation flows: ordered stacks of dialogs opened from a common root.
//!
//! Index 0 is the root. Every member carries one "unlink" listener on its
//! `all` close channel, so a member closed by any path (its own button, a
//! "close all", another flow operation) drops out of the flow.
//!
//! # Invariants
//!
//! 1. Each member has exactly one unlink listener from this flow registered
//!    on its `all` channel while it is a member.
//! 2. Removing a member by any means unregisters that listener first.
//! 3. Ranged removal (`go_to`, `splice`, `close_all`) runs from the highest
//!    index down.
//! 4. No internal borrow is held while a member is asked to close.
//!
//! # Failure Modes
//!
//! - Selector miss: [`ModalFlow::index_of`] returns `None`; [`ModalFlow::go_to`]
//!   treats that as "before the start".
//! - Index past the end: `get`/`go_to` return `None` after closing whatever
//!   lies beyond, mirroring the caller-bounds-checks contract.
//! - A dialog that is already closed refuses the unlink listener; `push`
//!   returns `false` and `splice` skips it, so it is never stored.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use modalflow_runtime::{CloseChannel, CloseListener};

use crate::dialog::Dialog;

/// Resolves to a position in a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowSelector {
    /// Absolute index; negative values count from the end.
    Index(isize),
    /// The root, but only when there is something after it.
    Start,
    /// Second-to-last member.
    Previous,
    /// First member whose name matches.
    Name(String),
}

impl From<&str> for FlowSelector {
    fn from(value: &str) -> Self {
        match value.trim() {
            "start" | "first" => Self::Start,
            "prev" | "previous" | "back" => Self::Previous,
            other => other
                .parse::<isize>()
                .map_or_else(|_| Self::Name(other.to_owned()), Self::Index),
        }
    }
}

impl From<String> for FlowSelector {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<isize> for FlowSelector {
    fn from(value: isize) -> Self {
        Self::Index(value)
    }
}

impl From<i32> for FlowSelector {
    fn from(value: i32) -> Self {
        Self::Index(value as isize)
    }
}

impl From<usize> for FlowSelector {
    fn from(value: usize) -> Self {
        Self::Index(isize::try_from(value).unwrap_or(isize::MAX))
    }
}

struct FlowEntry<D: Dialog> {
    dialog: D,
    unlink: CloseListener<D>,
}

struct FlowInner<D: Dialog> {
    entries: Vec<FlowEntry<D>>,
    close_on_back: bool,
}

/// Shared handle to one navigation stack.
pub struct ModalFlow<D: Dialog> {
    inner: Rc<RefCell<FlowInner<D>>>,
}

impl<D: Dialog> Clone for ModalFlow<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<D: Dialog> Default for ModalFlow<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Dialog> fmt::Debug for ModalFlow<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        let names: Vec<&str> = inner.entries.iter().map(|e| e.dialog.name()).collect();
        f.debug_struct("ModalFlow")
            .field("members", &names)
            .field("close_on_back", &inner.close_on_back)
            .finish()
    }
}

impl<D: Dialog> ModalFlow<D> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(FlowInner {
                entries: Vec::new(),
                close_on_back: true,
            })),
        }
    }

    fn from_weak(weak: &Weak<RefCell<FlowInner<D>>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Whether both handles refer to the same flow.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // --- Queries ---

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    #[must_use]
    pub fn close_on_back(&self) -> bool {
        self.inner.borrow().close_on_back
    }

    /// When set (the default), going back past the root closes the root.
    pub fn set_close_on_back(&self, close: bool) {
        self.inner.borrow_mut().close_on_back = close;
    }

    /// Members in order, root first.
    pub fn dialogs(&self) -> Vec<D> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|e| e.dialog.clone())
            .collect()
    }

    pub fn position(&self, dialog: &D) -> Option<usize> {
        self.inner
            .borrow()
            .entries
            .iter()
            .position(|e| e.dialog.same_dialog(dialog))
    }

    pub fn contains(&self, dialog: &D) -> bool {
        self.position(dialog).is_some()
    }

    pub fn last(&self) -> Option<D> {
        self.inner.borrow().entries.last().map(|e| e.dialog.clone())
    }

    /// Resolve `selector` to an index.
    ///
    /// Non-negative indices are returned as given and may lie past the end.
    pub fn index_of(&self, selector: impl Into<FlowSelector>) -> Option<usize> {
        let inner = self.inner.borrow();
        let len = inner.entries.len();
        match selector.into() {
            FlowSelector::Start => (len >= 2).then_some(0),
            FlowSelector::Previous => len.checked_sub(2),
            FlowSelector::Name(name) => inner.entries.iter().position(|e| e.dialog.name() == name),
            FlowSelector::Index(n) if n < 0 => len.checked_sub(n.unsigned_abs()),
            FlowSelector::Index(n) => Some(n.unsigned_abs()),
        }
    }

    pub fn get(&self, selector: impl Into<FlowSelector>) -> Option<D> {
        let index = self.index_of(selector)?;
        self.at(index)
    }

    fn at(&self, index: usize) -> Option<D> {
        self.inner
            .borrow()
            .entries
            .get(index)
            .map(|e| e.dialog.clone())
    }

    // --- Stack Operations ---

    /// Append `dialog` and link it to this flow.
    ///
    /// Returns `false` without storing anything when `dialog` is already
    /// closed.
    pub fn push(&self, dialog: D) -> bool {
        let len = self.len();
        self.attach_at(len, dialog)
    }

    /// Remove and return the last member.
    pub fn pop(&self) -> Option<D> {
        let len = self.len();
        let last = len.checked_sub(1)?;
        Some(self.detach_at(last))
    }

    /// Remove `dialog` without closing it.
    pub fn remove(&self, dialog: &D) -> Option<D> {
        let index = self.position(dialog)?;
        Some(self.detach_at(index))
    }

    /// Remove `count` members starting at `index`, then insert `insert` there.
    ///
    /// Removed members are unlinked but not closed. Returns them in flow order.
    /// Closed dialogs in `insert` are skipped.
    pub fn splice(&self, index: usize, count: usize, insert: impl IntoIterator<Item = D>) -> Vec<D> {
        let len = self.len();
        let start = index.min(len);
        let end = start.saturating_add(count).min(len);

        let mut removed: Vec<D> = (start..end).rev().map(|i| self.detach_at(i)).collect();
        removed.reverse();

        let mut at = start;
        for dialog in insert {
            if self.attach_at(at, dialog) {
                at += 1;
            }
        }
        removed
    }

    // --- Navigation ---

    /// Close everything after `selector` and return the member it names.
    ///
    /// A selector that resolves before the start closes the root instead
    /// when [`close_on_back`](Self::close_on_back) is set, and returns it.
    pub fn go_to(&self, selector: impl Into<FlowSelector>, channel: CloseChannel) -> Option<D> {
        let index = match self.index_of(selector) {
            Some(index) => index,
            None if self.close_on_back() => {
                let root = self.at(0)?;
                tracing::debug!(dialog = root.name(), channel = channel.as_str(), "flow closes root");
                root.trigger_close(channel);
                self.remove(&root);
                return Some(root);
            }
            None => 0,
        };

        while self.len() > index + 1 {
            let Some(last) = self.last() else { break };
            last.trigger_close(channel);
            self.remove(&last);
        }
        self.at(index)
    }

    /// Step back one member, closing the current one through `back`.
    pub fn back(&self) -> Option<D> {
        self.go_to(FlowSelector::Previous, CloseChannel::Back)
    }

    /// Close every member, last first. Returns how many were closed.
    pub fn close_all(&self, channel: CloseChannel) -> usize {
        let mut closed = 0;
        while let Some(last) = self.last() {
            if last.trigger_close(channel) {
                closed += 1;
            }
            self.remove(&last);
        }
        closed
    }

    // --- Linking ---

    fn attach_at(&self, index: usize, dialog: D) -> bool {
        let weak = Rc::downgrade(&self.inner);
        let unlink = CloseListener::new(move |closing: &D| {
            if let Some(flow) = Self::from_weak(&weak) {
                flow.remove(closing);
            }
        });
        if !dialog.on_close(CloseChannel::All, &unlink) {
            tracing::debug!(dialog = dialog.name(), "closed dialog not linked into flow");
            return false;
        }

        let mut inner = self.inner.borrow_mut();
        let at = index.min(inner.entries.len());
        inner.entries.insert(at, FlowEntry { dialog, unlink });
        true
    }

    fn detach_at(&self, index: usize) -> D {
        let entry = self.inner.borrow_mut().entries.remove(index);
        entry.dialog.off_close(CloseChannel::All, &entry.unlink);
        entry.dialog
    }
}
