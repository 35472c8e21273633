#![forbid(unsafe_code)]

//! modalflow: modal dialog lifecycle, navigation flows, layered stacking, and
//! shared-overlay coordination for a host-provided surface.
//!
//! Most users want the [`prelude`]. The member crates are re-exported for
//! lower-level access:
//!
//! - [`primitives`]: geometry, ids, the z-index sequence.
//! - [`layout`]: the placement engine.
//! - [`runtime`]: event and close-listener buses.
//! - [`widgets`]: modals, flows, the overlay coordinator, the context.

pub use modalflow_core as primitives;
pub use modalflow_layout as layout;
pub use modalflow_runtime as runtime;
pub use modalflow_widgets as widgets;

pub use modalflow_core::{ElementRef, ModalId, Point, Rect, Size, ZIndexAllocator};
pub use modalflow_layout::{AnchorTag, Strategy};
pub use modalflow_runtime::{CloseChannel, CloseListener, EventListener};
pub use modalflow_widgets::{
    CloseScope, Content, ContentSource, Dialog, FlowSelector, Modal, ModalBehavior, ModalBuilder,
    ModalContext, ModalError, ModalFlow, ModalOptions, ModalOverrides, ModalState, OverlayClose,
    OverlaySetting, Surface,
};

pub mod prelude {
    pub use crate::{
        AnchorTag, CloseChannel, CloseListener, CloseScope, ContentSource, Dialog, ElementRef,
        EventListener, FlowSelector, Modal, ModalBehavior, ModalContext, ModalError, ModalFlow,
        ModalOverrides, ModalState, OverlayClose, OverlaySetting, Point, Rect, Size, Strategy,
        Surface,
    };
    pub use modalflow_widgets::event;
}
