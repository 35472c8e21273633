#![forbid(unsafe_code)]

//! The presentation surface a modal context draws onto.
//!
//! The engine never renders anything itself. It tells a [`Surface`] what to
//! mount, where to move it, and when to show or hide it, and asks it to
//! measure reference elements for placement.

use modalflow_core::{ElementRef, ModalId, Point, Rect};

use crate::content::Content;

/// How a mounted modal is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Absolutely positioned; moved by the placement engine.
    #[default]
    Positioned,
    /// Inside a fixed scroll container; never repositioned.
    Scrollable,
}

/// Everything the surface needs to mount one modal.
#[derive(Debug, Clone, Copy)]
pub struct MountSpec<'a> {
    pub modal: ModalId,
    pub name: &'a str,
    pub content: &'a Content,
    pub z_index: i64,
    pub layout: LayoutMode,
    pub classes: &'a [String],
}

/// Everything the surface needs to mount one overlay.
#[derive(Debug, Clone, Copy)]
pub struct OverlaySpec<'a> {
    /// Modal that owns the overlay.
    pub modal: ModalId,
    pub z_index: i64,
    /// Caller-provided backdrop element; `None` means the default backdrop.
    pub element: Option<&'a ElementRef>,
}

/// Host-side rendering and measurement.
///
/// All methods take `&self`; implementations keep their own interior
/// mutability. Implementations must not call back into the modal context.
pub trait Surface {
    /// Visible region; the origin is the current scroll offset.
    fn viewport(&self) -> Rect;

    /// Box of a reference element, if it exists.
    fn measure(&self, element: &ElementRef) -> Option<Rect>;

    fn mount(&self, spec: &MountSpec<'_>);

    fn unmount(&self, modal: ModalId);

    /// Current box of a mounted modal.
    fn modal_rect(&self, modal: ModalId) -> Option<Rect>;

    fn move_modal(&self, modal: ModalId, origin: Point);

    fn set_visible(&self, modal: ModalId, visible: bool);

    fn mount_overlay(&self, spec: &OverlaySpec<'_>);

    fn unmount_overlay(&self, modal: ModalId);

    /// Scroll the surface vertically to `y`.
    fn scroll_to(&self, y: f64);
}
