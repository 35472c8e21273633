#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use modalflow_core::ModalId;
use modalflow_layout::{Placement, PositionConfig, ReferenceFrames, place};
use modalflow_runtime::{CloseBus, CloseChannel, CloseListener, EventBus, EventListener};

use super::builder::ModalBehavior;
use super::state::{CloseScope, ModalState, event};
use crate::content::{Content, ContentRequest, ContentTicket, DataRecord, Fetch, settle};
use crate::context::ModalContext;
use crate::dialog::Dialog;
use crate::error::ModalError;
use crate::flow::{FlowSelector, ModalFlow};
use crate::options::{ModalOptions, OverlayClose};
use crate::overlay::OverlayGrant;
use crate::surface::{LayoutMode, MountSpec};

pub(crate) struct ModalInner {
    id: ModalId,
    name: String,
    ctx: ModalContext,
    behavior: Rc<dyn ModalBehavior>,
    options: ModalOptions,
    position: PositionConfig,
    data: DataRecord,
    parent: Option<WeakModal>,

    state: Cell<ModalState>,
    initializing: Cell<bool>,
    mounted: Cell<bool>,
    overlay_owned: Cell<bool>,
    z_index: Cell<Option<i64>>,
    flow: RefCell<Option<ModalFlow<Modal>>>,
    template: RefCell<Option<Content>>,
    container: RefCell<Option<Content>>,

    events: EventBus<Modal>,
    close: CloseBus<Modal>,
}

/// Handle to one dialog instance.
///
/// Clones share the instance; equality is identity.
#[derive(Clone)]
pub struct Modal(Rc<ModalInner>);

/// Non-owning handle; does not keep the modal alive.
#[derive(Debug, Clone)]
pub struct WeakModal(Weak<ModalInner>);

impl WeakModal {
    pub fn upgrade(&self) -> Option<Modal> {
        self.0.upgrade().map(Modal)
    }
}

impl fmt::Debug for Modal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modal")
            .field("id", &self.0.id)
            .field("name", &self.0.name)
            .field("state", &self.0.state.get())
            .field("z_index", &self.0.z_index.get())
            .field("overlay_owned", &self.0.overlay_owned.get())
            .finish()
    }
}

impl PartialEq for Modal {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Modal {}

impl Modal {
    pub(crate) fn create(
        ctx: ModalContext,
        name: String,
        behavior: Rc<dyn ModalBehavior>,
        data: DataRecord,
        options: ModalOptions,
        parent: Option<WeakModal>,
    ) -> Self {
        let position = options.position_config();
        let modal = Self(Rc::new(ModalInner {
            id: ModalId::next(),
            name,
            ctx,
            behavior,
            options,
            position,
            data,
            parent,
            state: Cell::new(ModalState::Created),
            initializing: Cell::new(false),
            mounted: Cell::new(false),
            overlay_owned: Cell::new(false),
            z_index: Cell::new(None),
            flow: RefCell::new(None),
            template: RefCell::new(None),
            container: RefCell::new(None),
            events: EventBus::new(),
            close: CloseBus::new(),
        }));
        tracing::debug!(modal = %modal.id(), name = %modal.name(), "modal created");
        modal
    }

    // --- Accessors ---

    #[inline]
    #[must_use]
    pub fn id(&self) -> ModalId {
        self.0.id
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> ModalState {
        self.0.state.get()
    }

    #[inline]
    pub fn options(&self) -> &ModalOptions {
        &self.0.options
    }

    #[inline]
    pub fn data(&self) -> &DataRecord {
        &self.0.data
    }

    #[inline]
    pub fn context(&self) -> &ModalContext {
        &self.0.ctx
    }

    pub fn parent(&self) -> Option<Modal> {
        self.0.parent.as_ref().and_then(WeakModal::upgrade)
    }

    /// Registered as open in its context (displayed or hidden).
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.0.ctx.registry().contains(self.0.id)
    }

    /// Not currently visible on the surface.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.state() != ModalState::Displayed
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state().is_terminal()
    }

    #[must_use]
    pub fn overlay_owned(&self) -> bool {
        self.0.overlay_owned.get()
    }

    pub(crate) fn set_overlay_owned(&self, owned: bool) {
        self.0.overlay_owned.set(owned);
    }

    /// The unmodified template, once loaded.
    pub fn template(&self) -> Option<Content> {
        self.0.template.borrow().clone()
    }

    /// The initialized per-instance content, once built.
    pub fn content(&self) -> Option<Content> {
        self.0.container.borrow().clone()
    }

    pub fn downgrade(&self) -> WeakModal {
        WeakModal(Rc::downgrade(&self.0))
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Layer index, allocated on first use unless pinned by options.
    pub fn z_index(&self) -> i64 {
        if let Some(z) = self.0.z_index.get() {
            return z;
        }
        let z = match self.0.options.z_index {
            Some(z) => z,
            None => {
                let z = self.0.ctx.layers().allocate();
                tracing::trace!(modal = %self.id(), z, "z-index allocated");
                z
            }
        };
        self.0.z_index.set(Some(z));
        z
    }

    /// The flow this modal belongs to, created on first use.
    ///
    /// `None` once closed.
    pub fn flow(&self) -> Option<ModalFlow<Modal>> {
        if self.is_closed() {
            return None;
        }
        if let Some(flow) = self.0.flow.borrow().as_ref() {
            return Some(flow.clone());
        }
        let flow = ModalFlow::new();
        *self.0.flow.borrow_mut() = Some(flow.clone());
        flow.push(self.clone());
        Some(flow)
    }

    pub(crate) fn join_flow(&self, flow: &ModalFlow<Modal>) {
        *self.0.flow.borrow_mut() = Some(flow.clone());
        flow.push(self.clone());
    }

    // --- Events ---

    pub fn on(&self, names: &str, listener: &EventListener<Modal>) -> usize {
        self.0.events.on(names, listener)
    }

    pub fn once(&self, names: &str, listener: &EventListener<Modal>) -> usize {
        self.0.events.once(names, listener)
    }

    pub fn off(&self, names: &str, listener: &EventListener<Modal>) -> usize {
        self.0.events.off(names, listener)
    }

    /// Fire `names` without veto.
    pub fn trigger(&self, names: &str) -> bool {
        self.0.events.trigger(self, names, false)
    }

    pub fn on_close(&self, channel: CloseChannel, listener: &CloseListener<Modal>) -> bool {
        self.0.close.on(channel, listener)
    }

    pub fn off_close(&self, channel: CloseChannel, listener: &CloseListener<Modal>) -> bool {
        self.0.close.off(channel, listener)
    }

    /// Register one listener on several channels; it still runs at most once.
    ///
    /// Returns how many channels accepted it.
    pub fn on_close_many(&self, channels: &[CloseChannel], listener: &CloseListener<Modal>) -> usize {
        self.0.close.on_many(channels, listener)
    }

    pub fn off_close_many(&self, channels: &[CloseChannel], listener: &CloseListener<Modal>) -> usize {
        channels
            .iter()
            .filter(|ch| self.0.close.off(**ch, listener))
            .count()
    }

    #[must_use]
    pub fn close_listener_count(&self, channel: CloseChannel) -> usize {
        self.0.close.listener_count(channel)
    }

    // --- Display ---

    /// Show this modal, loading and initializing it first if needed.
    ///
    /// Repeated calls while loading are ignored. A hidden modal is shown.
    pub fn display(&self) -> Result<(), ModalError> {
        match self.state() {
            ModalState::Closed => Err(ModalError::Closed(self.id())),
            ModalState::Displayed | ModalState::Loading => Ok(()),
            ModalState::Hidden => {
                self.show();
                Ok(())
            }
            ModalState::Created => self.load(),
        }
    }

    fn load(&self) -> Result<(), ModalError> {
        let inner = &self.0;
        inner.state.set(ModalState::Loading);

        let own = inner.template.borrow().clone();
        if let Some(template) = own {
            return self.initialize(template);
        }

        let ctx = &inner.ctx;
        if inner.options.use_cache
            && let Some(hit) = ctx.cache().get(&inner.name)
        {
            tracing::trace!(modal = %inner.id, template = %inner.name, "template cache hit");
            return self.initialize(hit);
        }

        let request = ContentRequest::resolve(&inner.name, &inner.options.template);
        tracing::debug!(modal = %inner.id, uri = %request.uri, "requesting template");
        let ticket = ContentTicket::new(self, ctx.cache().clone(), inner.name.clone());
        match ctx.source().fetch(&request, ticket) {
            Fetch::Ready(result) => settle(ctx.cache(), &inner.name, Some(self.clone()), result),
            Fetch::Pending => Ok(()),
        }
    }

    pub(crate) fn accept_content(&self, content: Content) -> Result<(), ModalError> {
        if self.state() != ModalState::Loading || self.0.initializing.get() {
            tracing::trace!(modal = %self.id(), state = %self.state(), "stale content dropped");
            return Ok(());
        }
        self.initialize(content)
    }

    fn initialize(&self, template: Content) -> Result<(), ModalError> {
        let inner = &self.0;
        inner.initializing.set(true);
        *inner.template.borrow_mut() = Some(template.clone());
        *inner.container.borrow_mut() = Some(template);

        if !inner.events.trigger(self, event::BEFORE_DISPLAY, true) {
            inner.initializing.set(false);
            if self.state() == ModalState::Loading {
                inner.state.set(ModalState::Created);
            }
            tracing::debug!(modal = %inner.id, "display vetoed");
            return Ok(());
        }
        if self.is_closed() {
            return Ok(());
        }

        let ready = inner.behavior.init_view(self);
        if self.is_closed() {
            tracing::debug!(modal = %inner.id, "closed during init_view");
            return Ok(());
        }
        if !ready || inner.options.manually_display_after_init {
            tracing::debug!(modal = %inner.id, "display held for finish_display");
            return Ok(());
        }
        self.present();
        Ok(())
    }

    /// Complete a display held by `init_view` or `manually_display_after_init`.
    pub fn finish_display(&self) -> Result<(), ModalError> {
        match self.state() {
            ModalState::Closed => Err(ModalError::Closed(self.id())),
            ModalState::Loading if self.0.initializing.get() => {
                self.present();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    // Hooks run here may close the modal; each one is followed by a check so
    // a closed modal is never mounted, registered or given the overlay.
    fn present(&self) {
        let inner = &self.0;
        let ctx = &inner.ctx;

        let mut content = inner.container.borrow_mut().take().unwrap_or_default();
        for init in ctx.initializers() {
            if inner.options.initializer_enabled(init.key()) {
                init.initialize(self, &mut content, &inner.data);
            }
            if self.is_closed() {
                tracing::debug!(modal = %inner.id, key = init.key(), "closed by initializer");
                return;
            }
        }

        let z = self.z_index();
        let layout = if inner.options.scrollable {
            LayoutMode::Scrollable
        } else {
            LayoutMode::Positioned
        };
        ctx.surface().mount(&MountSpec {
            modal: inner.id,
            name: &inner.name,
            content: &content,
            z_index: z,
            layout,
            classes: &inner.options.classes,
        });
        *inner.container.borrow_mut() = Some(content);
        inner.mounted.set(true);

        if !inner.options.scrollable {
            self.refresh_position(true);
        }
        if self.is_closed() {
            return;
        }

        if let Some(parent) = self.parent() {
            if inner.options.hide_parent {
                parent.hide();
            }
            if self.is_closed() {
                parent.show();
                return;
            }
            let weak = parent.downgrade();
            inner.close.on(
                CloseChannel::All,
                &CloseListener::new(move |_: &Modal| {
                    if let Some(parent) = weak.upgrade() {
                        parent.show();
                    }
                }),
            );
        }

        inner.state.set(ModalState::Displayed);
        inner.initializing.set(false);
        self.acquire_overlay();
        ctx.registry().insert(self);

        tracing::debug!(modal = %inner.id, name = %inner.name, z, "modal displayed");
        self.trigger("display visible");
    }

    /// Re-run placement.
    ///
    /// Skipped for scrollable modals, unmounted modals, and (unless `force`)
    /// hidden ones.
    pub fn refresh_position(&self, force: bool) -> Option<Placement> {
        let inner = &self.0;
        if inner.options.scrollable || !inner.mounted.get() {
            return None;
        }
        if !force && self.is_hidden() {
            return None;
        }

        let surface = inner.ctx.surface();
        let rect = surface.modal_rect(inner.id)?;
        let frames = ReferenceFrames {
            viewport: surface.viewport(),
            anchor: inner
                .options
                .position
                .anchor
                .as_ref()
                .and_then(|a| surface.measure(&a.element)),
            container: inner
                .options
                .position
                .container
                .as_ref()
                .and_then(|c| surface.measure(c)),
        };
        let placement = place(rect, &inner.position, &frames);

        surface.move_modal(inner.id, placement.origin());
        if let Some(y) = placement.scroll_to {
            surface.scroll_to(y);
        }
        tracing::trace!(
            modal = %inner.id,
            x = placement.rect.x,
            y = placement.rect.y,
            applied = ?placement.applied,
            "modal placed"
        );
        self.trigger(event::MOVE);
        Some(placement)
    }

    // --- Visibility ---

    pub fn hide(&self) {
        if self.state() != ModalState::Displayed {
            return;
        }
        self.0.ctx.surface().set_visible(self.0.id, false);
        self.0.state.set(ModalState::Hidden);
        tracing::debug!(modal = %self.id(), "modal hidden");
        self.release_overlay();
        self.trigger(event::HIDE);
    }

    pub fn show(&self) {
        if !self.is_open() || self.state() != ModalState::Hidden {
            return;
        }
        self.0.ctx.surface().set_visible(self.0.id, true);
        self.0.state.set(ModalState::Displayed);
        tracing::debug!(modal = %self.id(), "modal shown");
        self.acquire_overlay();
        self.trigger("show visible");
    }

    fn acquire_overlay(&self) -> OverlayGrant {
        self.0.ctx.overlay().acquire(self)
    }

    fn release_overlay(&self) -> bool {
        self.0.ctx.overlay().release(self)
    }

    // --- Closing ---

    /// Close through `channel`.
    ///
    /// Returns `false` (and does nothing) if already closed.
    pub fn trigger_close(&self, channel: CloseChannel) -> bool {
        let inner = &self.0;
        if self.is_closed() {
            return false;
        }
        inner.state.set(ModalState::Closed);
        inner.initializing.set(false);

        if inner.mounted.replace(false) {
            inner.ctx.surface().unmount(inner.id);
        }

        let flow = inner.flow.borrow_mut().take();
        if let Some(flow) = flow {
            flow.remove(self);
        }

        let delivered = inner.close.trigger_close(self, channel);
        self.release_overlay();
        inner.ctx.registry().remove(inner.id);
        inner.events.clear();

        tracing::debug!(
            modal = %inner.id,
            channel = channel.as_str(),
            listeners = delivered,
            "modal closed"
        );
        true
    }

    /// Close through the `method` channel.
    pub fn close(&self) -> bool {
        self.trigger_close(CloseChannel::Method)
    }

    /// Close this modal, its flow, or every open modal.
    ///
    /// Returns how many modals this call closed.
    pub fn close_scope(&self, scope: CloseScope, channel: CloseChannel) -> usize {
        match scope {
            CloseScope::This => usize::from(self.trigger_close(channel)),
            CloseScope::Flow => {
                let Some(flow) = self.flow() else {
                    return 0;
                };
                let members = flow.dialogs();
                if let Some(root) = flow.go_to(FlowSelector::Index(0), channel) {
                    root.trigger_close(channel);
                }
                members.iter().filter(|m| m.is_closed()).count()
            }
            CloseScope::All => self.0.ctx.close_all(channel),
        }
    }

    /// Apply the `overlay_close` policy for a click on this modal's overlay.
    ///
    /// The modal itself closes through the `all` channel only.
    pub fn overlay_clicked(&self) -> usize {
        let policy = self.0.options.overlay_close;
        if policy == OverlayClose::None {
            return 0;
        }
        let flow = self.flow();
        let mut closed = usize::from(self.trigger_close(CloseChannel::All));
        match policy {
            OverlayClose::All => closed += self.0.ctx.close_all(CloseChannel::All),
            OverlayClose::Flow => {
                if let Some(flow) = flow {
                    closed += flow.close_all(CloseChannel::All);
                }
            }
            OverlayClose::SelfOnly | OverlayClose::None => {}
        }
        closed
    }
}

impl Dialog for Modal {
    fn name(&self) -> &str {
        &self.0.name
    }

    fn same_dialog(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }

    fn on_close(&self, channel: CloseChannel, listener: &CloseListener<Self>) -> bool {
        Modal::on_close(self, channel, listener)
    }

    fn off_close(&self, channel: CloseChannel, listener: &CloseListener<Self>) -> bool {
        Modal::off_close(self, channel, listener)
    }

    fn close_listener_count(&self, channel: CloseChannel) -> usize {
        Modal::close_listener_count(self, channel)
    }

    fn trigger_close(&self, channel: CloseChannel) -> bool {
        Modal::trigger_close(self, channel)
    }
}
