#![forbid(unsafe_code)]

//! In-memory [`Surface`] that records every call.

use std::cell::RefCell;
use std::collections::BTreeMap;

use modalflow_core::{ElementRef, ModalId, Point, Rect, Size};
use modalflow_widgets::{LayoutMode, MountSpec, OverlaySpec, Surface};

/// Default viewport used by [`HeadlessSurface::default`].
pub const DEFAULT_VIEWPORT: Rect = Rect::new(0.0, 0.0, 1024.0, 768.0);

/// Default box given to newly mounted modals.
pub const DEFAULT_MODAL_SIZE: Size = Size::new(400.0, 300.0);

/// A modal as the surface currently holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct MountedModal {
    pub name: String,
    pub rect: Rect,
    pub z_index: i64,
    pub visible: bool,
    pub layout: LayoutMode,
    pub markup: String,
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MountedOverlay {
    pub z_index: i64,
    pub element: Option<ElementRef>,
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Mount(ModalId),
    Unmount(ModalId),
    Move(ModalId, Point),
    Show(ModalId),
    Hide(ModalId),
    MountOverlay(ModalId),
    UnmountOverlay(ModalId),
    Scroll(f64),
}

#[derive(Debug)]
struct SurfaceState {
    viewport: Rect,
    modal_size: Size,
    sizes: BTreeMap<String, Size>,
    elements: BTreeMap<ElementRef, Rect>,
    modals: BTreeMap<ModalId, MountedModal>,
    overlays: BTreeMap<ModalId, MountedOverlay>,
    ops: Vec<SurfaceOp>,
}

/// Headless surface for tests.
///
/// Modals mount at the origin with a fixed size (per template name if
/// configured). Scrolling moves the viewport origin.
#[derive(Debug)]
pub struct HeadlessSurface {
    state: RefCell<SurfaceState>,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT)
    }
}

impl HeadlessSurface {
    pub fn new(viewport: Rect) -> Self {
        Self {
            state: RefCell::new(SurfaceState {
                viewport,
                modal_size: DEFAULT_MODAL_SIZE,
                sizes: BTreeMap::new(),
                elements: BTreeMap::new(),
                modals: BTreeMap::new(),
                overlays: BTreeMap::new(),
                ops: Vec::new(),
            }),
        }
    }

    #[must_use]
    pub fn with_modal_size(self, size: Size) -> Self {
        self.state.borrow_mut().modal_size = size;
        self
    }

    /// Size used when a modal named `name` mounts.
    #[must_use]
    pub fn with_size_for(self, name: impl Into<String>, size: Size) -> Self {
        self.state.borrow_mut().sizes.insert(name.into(), size);
        self
    }

    #[must_use]
    pub fn with_element(self, element: impl Into<ElementRef>, rect: Rect) -> Self {
        self.set_element(element, rect);
        self
    }

    // --- Scripting ---

    pub fn set_viewport(&self, viewport: Rect) {
        self.state.borrow_mut().viewport = viewport;
    }

    pub fn set_element(&self, element: impl Into<ElementRef>, rect: Rect) {
        self.state.borrow_mut().elements.insert(element.into(), rect);
    }

    pub fn remove_element(&self, element: &ElementRef) {
        self.state.borrow_mut().elements.remove(element);
    }

    /// Resize a mounted modal in place.
    pub fn resize_modal(&self, modal: ModalId, size: Size) {
        if let Some(m) = self.state.borrow_mut().modals.get_mut(&modal) {
            m.rect = Rect::from_parts(m.rect.origin(), size);
        }
    }

    // --- Inspection ---

    pub fn modal(&self, modal: ModalId) -> Option<MountedModal> {
        self.state.borrow().modals.get(&modal).cloned()
    }

    pub fn is_mounted(&self, modal: ModalId) -> bool {
        self.state.borrow().modals.contains_key(&modal)
    }

    pub fn is_visible(&self, modal: ModalId) -> bool {
        self.state
            .borrow()
            .modals
            .get(&modal)
            .is_some_and(|m| m.visible)
    }

    pub fn mounted_count(&self) -> usize {
        self.state.borrow().modals.len()
    }

    pub fn overlay(&self, modal: ModalId) -> Option<MountedOverlay> {
        self.state.borrow().overlays.get(&modal).cloned()
    }

    pub fn overlay_count(&self) -> usize {
        self.state.borrow().overlays.len()
    }

    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.state.borrow().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state.borrow_mut().ops.clear();
    }

    /// Target of the most recent `scroll_to`, if any.
    pub fn last_scroll(&self) -> Option<f64> {
        self.state.borrow().ops.iter().rev().find_map(|op| match op {
            SurfaceOp::Scroll(y) => Some(*y),
            _ => None,
        })
    }
}

impl Surface for HeadlessSurface {
    fn viewport(&self) -> Rect {
        self.state.borrow().viewport
    }

    fn measure(&self, element: &ElementRef) -> Option<Rect> {
        self.state.borrow().elements.get(element).copied()
    }

    fn mount(&self, spec: &MountSpec<'_>) {
        let mut state = self.state.borrow_mut();
        let size = state
            .sizes
            .get(spec.name)
            .copied()
            .unwrap_or(state.modal_size);
        state.modals.insert(
            spec.modal,
            MountedModal {
                name: spec.name.to_owned(),
                rect: Rect::from_parts(Point::new(0.0, 0.0), size),
                z_index: spec.z_index,
                visible: true,
                layout: spec.layout,
                markup: spec.content.markup().to_owned(),
                classes: spec.classes.to_vec(),
            },
        );
        state.ops.push(SurfaceOp::Mount(spec.modal));
        tracing::trace!(modal = %spec.modal, z = spec.z_index, "headless mount");
    }

    fn unmount(&self, modal: ModalId) {
        let mut state = self.state.borrow_mut();
        state.modals.remove(&modal);
        state.ops.push(SurfaceOp::Unmount(modal));
    }

    fn modal_rect(&self, modal: ModalId) -> Option<Rect> {
        self.state.borrow().modals.get(&modal).map(|m| m.rect)
    }

    fn move_modal(&self, modal: ModalId, origin: Point) {
        let mut state = self.state.borrow_mut();
        if let Some(m) = state.modals.get_mut(&modal) {
            m.rect = m.rect.with_origin(origin);
        }
        state.ops.push(SurfaceOp::Move(modal, origin));
    }

    fn set_visible(&self, modal: ModalId, visible: bool) {
        let mut state = self.state.borrow_mut();
        if let Some(m) = state.modals.get_mut(&modal) {
            m.visible = visible;
        }
        state.ops.push(if visible {
            SurfaceOp::Show(modal)
        } else {
            SurfaceOp::Hide(modal)
        });
    }

    fn mount_overlay(&self, spec: &OverlaySpec<'_>) {
        let mut state = self.state.borrow_mut();
        state.overlays.insert(
            spec.modal,
            MountedOverlay {
                z_index: spec.z_index,
                element: spec.element.cloned(),
            },
        );
        state.ops.push(SurfaceOp::MountOverlay(spec.modal));
    }

    fn unmount_overlay(&self, modal: ModalId) {
        let mut state = self.state.borrow_mut();
        state.overlays.remove(&modal);
        state.ops.push(SurfaceOp::UnmountOverlay(modal));
    }

    fn scroll_to(&self, y: f64) {
        let mut state = self.state.borrow_mut();
        state.viewport = state.viewport.with_y(y);
        state.ops.push(SurfaceOp::Scroll(y));
    }
}
