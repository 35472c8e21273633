#![forbid(unsafe_code)]

//! The capability a value needs to live in a [`ModalFlow`](crate::flow::ModalFlow).
//!
//! A flow only ever talks to its members through this trait: it identifies
//! them, attaches and detaches its unlink listener on their close channels,
//! and asks them to close. [`Modal`](crate::modal::Modal) is the production
//! implementor; tests use lightweight stand-ins.

use modalflow_runtime::{CloseChannel, CloseListener};

/// A closable dialog handle.
///
/// Handles are cheap clones of one shared dialog; [`same_dialog`] compares
/// identity, not contents.
///
/// [`same_dialog`]: Dialog::same_dialog
pub trait Dialog: Clone + 'static {
    /// Template or display name, used by name selectors.
    fn name(&self) -> &str;

    /// Whether `self` and `other` are handles to the same dialog.
    fn same_dialog(&self, other: &Self) -> bool;

    /// Register `listener` on `channel`. Returns `false` for duplicates and
    /// for dialogs that already closed.
    fn on_close(&self, channel: CloseChannel, listener: &CloseListener<Self>) -> bool;

    fn off_close(&self, channel: CloseChannel, listener: &CloseListener<Self>) -> bool;

    fn close_listener_count(&self, channel: CloseChannel) -> usize;

    /// Close through `channel`. Returns `false` if the dialog was already
    /// closed.
    fn trigger_close(&self, channel: CloseChannel) -> bool;
}
