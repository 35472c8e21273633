#![forbid(unsafe_code)]

//! Placement engine for modal dialogs.
//!
//! Given a widget's current box, a configured priority list of strategies, and
//! the reference frames those strategies measure against, [`place`] computes
//! the widget's next box. The engine is a pure function: it reads no surface
//! state and has no side effects.
//!
//! # Strategies
//!
//! | Strategy    | Reference frame | Effect                                      |
//! |-------------|-----------------|---------------------------------------------|
//! | `center`    | viewport        | centers the widget in the visible region    |
//! | `anchor`    | anchor element  | docks the widget to a compass side          |
//! | `container` | bounding box    | pulls overflowing edges back inside         |
//! | `viewport`  | viewport        | clamps horizontally, optionally scrolls     |
//!
//! Strategies run in priority order and each sees the box left by the ones
//! before it.

pub mod anchor;
pub mod placement;
pub mod strategy;

pub use anchor::{AnchorTag, HorizontalAnchor, VerticalAnchor};
pub use placement::{Placement, PositionBuffers, PositionConfig, ReferenceFrames, place};
pub use strategy::{DEFAULT_PRIORITY, ParseError, Strategies, Strategy};
