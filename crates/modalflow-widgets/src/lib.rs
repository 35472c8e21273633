#![forbid(unsafe_code)]

//! Modal lifecycle, navigation flows, and shared-overlay coordination.

pub mod content;
pub mod context;
pub mod dialog;
pub mod error;
pub mod flow;
pub mod modal;
pub mod options;
pub mod overlay;
pub mod registry;
pub mod surface;

pub use content::{
    Content, ContentCache, ContentInitializer, ContentRequest, ContentSource, ContentTicket,
    DataRecord, Fetch,
};
pub use context::ModalContext;
pub use dialog::Dialog;
pub use error::{ConfigError, ModalError, RetrievalError};
pub use flow::{FlowSelector, ModalFlow};
pub use modal::{
    CloseScope, Modal, ModalBehavior, ModalBuilder, ModalState, PlainModal, UnknownScope,
    WeakModal, event,
};
pub use options::{
    AnchorOption, BufferOverrides, ModalOptions, ModalOverrides, OverlayClose, OverlaySetting,
    PositionOptions, PositionOverrides, TemplateOptions, TemplateOverrides,
};
pub use overlay::{OverlayCoordinator, OverlayGrant};
pub use registry::OpenRegistry;
pub use surface::{LayoutMode, MountSpec, OverlaySpec, Surface};
