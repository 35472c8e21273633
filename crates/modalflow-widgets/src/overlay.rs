#![forbid(unsafe_code)]

//! Shared-overlay coordination.
//!
//! One backdrop dims the surface at a time. The coordinator records which
//! modal owns it; a modal that asks while another visible modal owns it is
//! deferred until that owner fires `hideOverlay`.
//!
//! # Invariants
//!
//! 1. `owner` is either `None` or a modal whose `overlay_owned` flag is set.
//! 2. The overlay layer is `owner_z - ceil(interval / 10)`: beneath its owner
//!    and above the previous modal layer.
//! 3. A modal fires `showOverlay` once per acquisition and `hideOverlay`
//!    once per release.
//! 4. A deferred request is retried at most once per owner release, and only
//!    if the requester is still open, visible, and not already an owner.
//!
//! # Failure Modes
//!
//! - Owner dropped without closing: the weak owner no longer upgrades and the
//!   next request is granted.
//! - Stacked overlays (`stack_overlay`): the newest requester becomes the
//!   recorded owner; earlier overlays stay mounted until their own modal
//!   releases them.

use std::cell::RefCell;

use modalflow_runtime::EventListener;

use crate::modal::{Modal, WeakModal, event};
use crate::surface::OverlaySpec;

/// Result of an overlay request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayGrant {
    /// The requester now shows the overlay.
    Granted,
    /// Queued behind the current owner.
    Deferred,
    /// The requester has overlays turned off.
    Disabled,
}

/// Tracks the current overlay owner of one modal context.
#[derive(Debug, Default)]
pub struct OverlayCoordinator {
    owner: RefCell<Option<WeakModal>>,
}

impl OverlayCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The modal currently recorded as owner, if it is still alive.
    pub fn owner(&self) -> Option<Modal> {
        self.owner.borrow().as_ref().and_then(WeakModal::upgrade)
    }

    #[must_use]
    pub fn is_owner(&self, modal: &Modal) -> bool {
        self.owner().is_some_and(|owner| owner.ptr_eq(modal))
    }

    /// Request the overlay for `modal`.
    pub fn acquire(&self, modal: &Modal) -> OverlayGrant {
        let options = modal.options();
        if !options.overlay.is_enabled() {
            return OverlayGrant::Disabled;
        }
        if modal.overlay_owned() {
            return OverlayGrant::Granted;
        }

        let current = self.owner();
        let free = match &current {
            None => true,
            Some(owner) => owner.ptr_eq(modal) || owner.is_hidden(),
        };

        if options.stack_overlay || free {
            self.grant(modal);
            return OverlayGrant::Granted;
        }

        if let Some(owner) = current {
            tracing::debug!(modal = %modal.id(), owner = %owner.id(), "overlay deferred");
            let waiter = modal.downgrade();
            owner.once(
                event::HIDE_OVERLAY,
                &EventListener::observer(move |_: &Modal, _: &str| {
                    let Some(waiter) = waiter.upgrade() else {
                        return;
                    };
                    if waiter.is_open() && !waiter.is_hidden() && !waiter.overlay_owned() {
                        waiter.context().overlay().acquire(&waiter);
                    }
                }),
            );
        }
        OverlayGrant::Deferred
    }

    fn grant(&self, modal: &Modal) {
        *self.owner.borrow_mut() = Some(modal.downgrade());
        modal.set_overlay_owned(true);

        let ctx = modal.context();
        let z = ctx.layers().overlay_z(modal.z_index());
        ctx.surface().mount_overlay(&OverlaySpec {
            modal: modal.id(),
            z_index: z,
            element: modal.options().overlay.element(),
        });
        tracing::debug!(modal = %modal.id(), z, "overlay granted");
        modal.trigger(event::SHOW_OVERLAY);
    }

    /// Take the overlay away from `modal`, waking one deferred requester.
    ///
    /// Returns `false` if `modal` was not showing an overlay.
    pub fn release(&self, modal: &Modal) -> bool {
        if !modal.overlay_owned() {
            return false;
        }
        modal.set_overlay_owned(false);
        modal.context().surface().unmount_overlay(modal.id());
        {
            let mut owner = self.owner.borrow_mut();
            if owner
                .as_ref()
                .and_then(WeakModal::upgrade)
                .is_some_and(|o| o.ptr_eq(modal))
            {
                *owner = None;
            }
        }
        tracing::debug!(modal = %modal.id(), "overlay released");
        modal.trigger(event::HIDE_OVERLAY);
        true
    }

    /// Forget the owner without notifying anyone.
    pub fn reset(&self) {
        *self.owner.borrow_mut() = None;
    }
}
