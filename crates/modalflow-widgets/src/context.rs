#![forbid(unsafe_code)]

//! Shared state of one modal environment.
//!
//! A [`ModalContext`] owns everything that is process-wide in a classic
//! single-page setup: the layer allocator, the overlay coordinator, the
//! open-modal registry, the template cache, and the global option defaults.
//! Contexts are independent, so tests build a fresh one per case.
//!
//! # Invariants
//!
//! 1. A modal is in the registry exactly while it is displayed or hidden.
//! 2. `close_all` re-checks registry membership before each close, so modals
//!    closed as a side effect of an earlier close are not closed twice.
//! 3. `reset` forgets state without closing or notifying anyone.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use modalflow_core::{ModalId, ZIndexAllocator};
use modalflow_runtime::CloseChannel;

use crate::content::{ContentCache, ContentInitializer, ContentSource, DataRecord};
use crate::error::ModalError;
use crate::modal::{Modal, ModalBehavior, ModalBuilder};
use crate::options::{ModalOptions, ModalOverrides};
use crate::overlay::OverlayCoordinator;
use crate::registry::OpenRegistry;
use crate::surface::Surface;

struct ContextInner {
    surface: Rc<dyn Surface>,
    source: Rc<dyn ContentSource>,
    layers: ZIndexAllocator,
    overlay: OverlayCoordinator,
    registry: OpenRegistry,
    cache: ContentCache,
    defaults: RefCell<ModalOptions>,
    initializers: RefCell<Vec<Rc<dyn ContentInitializer>>>,
}

/// Handle to a modal environment. Clones share state.
#[derive(Clone)]
pub struct ModalContext {
    inner: Rc<ContextInner>,
}

impl fmt::Debug for ModalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalContext")
            .field("layers", &self.inner.layers)
            .field("open", &self.inner.registry.len())
            .field("cached", &self.inner.cache.len())
            .field("initializers", &self.inner.initializers.borrow().len())
            .finish_non_exhaustive()
    }
}

impl ModalContext {
    /// Context with the default layer sequence (30000, step 1000).
    pub fn new(surface: Rc<dyn Surface>, source: Rc<dyn ContentSource>) -> Self {
        Self::with_layers(surface, source, ZIndexAllocator::default())
    }

    pub fn with_layers(
        surface: Rc<dyn Surface>,
        source: Rc<dyn ContentSource>,
        layers: ZIndexAllocator,
    ) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                surface,
                source,
                layers,
                overlay: OverlayCoordinator::new(),
                registry: OpenRegistry::new(),
                cache: ContentCache::new(),
                defaults: RefCell::new(ModalOptions::default()),
                initializers: RefCell::new(Vec::new()),
            }),
        }
    }

    // --- Collaborators ---

    #[inline]
    pub fn surface(&self) -> &dyn Surface {
        self.inner.surface.as_ref()
    }

    #[inline]
    pub fn source(&self) -> &dyn ContentSource {
        self.inner.source.as_ref()
    }

    #[inline]
    pub fn layers(&self) -> &ZIndexAllocator {
        &self.inner.layers
    }

    #[inline]
    pub fn overlay(&self) -> &OverlayCoordinator {
        &self.inner.overlay
    }

    #[inline]
    pub fn registry(&self) -> &OpenRegistry {
        &self.inner.registry
    }

    #[inline]
    pub fn cache(&self) -> &ContentCache {
        &self.inner.cache
    }

    // --- Defaults ---

    /// Snapshot of the global defaults.
    pub fn defaults(&self) -> ModalOptions {
        self.inner.defaults.borrow().clone()
    }

    /// Replace the global defaults. Existing modals keep their options.
    pub fn set_defaults(&self, defaults: ModalOptions) {
        *self.inner.defaults.borrow_mut() = defaults;
    }

    /// Merge `overrides` into the global defaults.
    pub fn update_defaults(&self, overrides: &ModalOverrides) {
        self.inner.defaults.borrow_mut().apply(overrides);
    }

    pub fn add_initializer(&self, initializer: impl ContentInitializer + 'static) {
        self.inner
            .initializers
            .borrow_mut()
            .push(Rc::new(initializer));
    }

    pub(crate) fn initializers(&self) -> Vec<Rc<dyn ContentInitializer>> {
        self.inner.initializers.borrow().clone()
    }

    // --- Construction ---

    pub fn builder(&self) -> ModalBuilder {
        ModalBuilder::new(self)
    }

    /// Builder for a modal using template `name`.
    pub fn modal(&self, name: impl Into<String>) -> ModalBuilder {
        ModalBuilder::new(self).name(name)
    }

    /// One-call open: build and display unless told otherwise.
    pub fn open(
        &self,
        behavior: impl ModalBehavior + 'static,
        name: Option<&str>,
        data: DataRecord,
        overrides: ModalOverrides,
        parent: Option<&Modal>,
    ) -> Result<Modal, ModalError> {
        let mut builder = self
            .builder()
            .behavior(behavior)
            .data(data)
            .overrides(overrides);
        if let Some(name) = name {
            builder = builder.name(name);
        }
        if let Some(parent) = parent {
            builder = builder.parent(parent);
        }
        builder.open()
    }

    // --- Open Modals ---

    pub fn get(&self, id: ModalId) -> Option<Modal> {
        self.inner.registry.get(id)
    }

    #[must_use]
    pub fn is_open(&self, id: ModalId) -> bool {
        self.inner.registry.contains(id)
    }

    /// Every open modal, oldest first.
    pub fn open_modals(&self) -> Vec<Modal> {
        self.inner.registry.snapshot()
    }

    /// Close every open modal through `channel`. Returns how many closed.
    pub fn close_all(&self, channel: CloseChannel) -> usize {
        let mut closed = 0;
        for modal in self.inner.registry.snapshot() {
            if self.is_open(modal.id()) && modal.trigger_close(channel) {
                closed += 1;
            }
        }
        tracing::debug!(channel = channel.as_str(), closed, "closed all modals");
        closed
    }

    /// Re-place every open, visible modal; call after the viewport resizes.
    pub fn refresh_positions(&self) -> usize {
        self.inner
            .registry
            .snapshot()
            .iter()
            .filter_map(|modal| modal.refresh_position(false))
            .count()
    }

    /// Forget all shared state: layers, overlay owner, registry, cache.
    pub fn reset(&self) {
        self.inner.layers.reset();
        self.inner.overlay.reset();
        self.inner.registry.clear();
        self.inner.cache.clear();
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
