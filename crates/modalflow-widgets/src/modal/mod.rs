#![forbid(unsafe_code)]

//! Modal instances and their lifecycle.
//!
//! A [`Modal`] is a cheap, clonable handle to one dialog. It is created by a
//! [`ModalBuilder`] (usually via [`ModalContext::modal`]), displayed, hidden
//! and shown any number of times, and finally closed through one of the
//! close channels.
//!
//! # Display sequence
//!
//! 1. `display()` moves `Created` to `Loading` and obtains the template: the
//!    modal's own copy, a cache hit, or the content source.
//! 2. With content in hand the modal fires `beforeDisplay`; a listener
//!    returning `false` vetoes and the modal returns to `Created` without
//!    touching the surface or the overlay.
//! 3. The behavior's `init_view` runs. Returning `false` (or setting
//!    `manually_display_after_init`) holds the display until
//!    [`Modal::finish_display`].
//! 4. Content initializers run, the modal is mounted at its layer, placed,
//!    its parent is hidden, the overlay is requested, the modal is registered
//!    as open, and `display visible` fires.
//!
//! # Close sequence
//!
//! Unmount, leave the flow, dispatch close listeners, release the overlay,
//! leave the registry, drop event listeners. A second close is a no-op.
//!
//! [`ModalContext::modal`]: crate::context::ModalContext::modal

mod builder;
mod instance;
mod state;

pub use builder::{ModalBehavior, ModalBuilder, PlainModal};
pub use instance::{Modal, WeakModal};
pub use state::{CloseScope, ModalState, UnknownScope, event};
