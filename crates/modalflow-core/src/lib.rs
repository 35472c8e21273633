#![forbid(unsafe_code)]

//! Core primitives shared by every modalflow crate.
//!
//! - [`geometry`]: surface-space points, sizes, and rectangles.
//! - [`id`]: process-unique modal identifiers and reference-element handles.
//! - [`layer`]: the monotonically increasing z-index sequence.

pub mod geometry;
pub mod id;
pub mod layer;

pub use geometry::{Point, Rect, Size};
pub use id::{ElementRef, ModalId};
pub use layer::{DEFAULT_Z_INTERVAL, DEFAULT_Z_START, ZIndexAllocator};
