#![forbid(unsafe_code)]

//! Listener plumbing for modal lifecycles.
//!
//! - [`listener`]: ordered, identity-deduplicated listener storage.
//! - [`events`]: named lifecycle events with once-listeners and veto.
//! - [`close`]: the four close channels and their exactly-once dispatch.
//!
//! Everything here is single-threaded (`Rc`, `RefCell`) and re-entrant:
//! listeners may register, remove, or trigger on the same bus while it is
//! dispatching. Dispatch always works on a snapshot and no borrow is held
//! across a listener call.

pub mod close;
pub mod events;
pub mod listener;

pub use close::{CloseBus, CloseChannel, CloseListener, UnknownChannel};
pub use events::{EventBus, EventListener};
pub use listener::{Identity, ListenerKey, ListenerSet};
