#![forbid(unsafe_code)]

//! Integration tests: modal lifecycle against the headless harness.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use modalflow_core::{Point, Rect, ZIndexAllocator};
use modalflow_harness::{
    Fixture, HeadlessSurface, PlaceholderInitializer, ScriptedSource, init_tracing,
};
use modalflow_layout::AnchorTag;
use modalflow_runtime::{CloseChannel, CloseListener, EventListener};
use modalflow_widgets::{
    CloseScope, Content, ContentInitializer, DataRecord, FlowSelector, LayoutMode, Modal,
    ModalBehavior, ModalError, ModalOverrides, ModalState, event,
};

fn fixture() -> Fixture {
    init_tracing();
    Fixture::with_templates(&["alpha", "beta", "gamma", "delta"])
}

fn counter(modal: &Modal, names: &str) -> Rc<Cell<usize>> {
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    modal.on(names, &EventListener::observer(move |_: &Modal, _: &str| h.set(h.get() + 1)));
    hits
}

fn close_log(modal: &Modal, channels: &[CloseChannel]) -> Rc<RefCell<Vec<&'static str>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for &channel in channels {
        let l = log.clone();
        modal.on_close(
            channel,
            &CloseListener::new(move |_: &Modal| l.borrow_mut().push(channel.as_str())),
        );
    }
    log
}

// ============================================================================
// Layers
// ============================================================================

#[test]
fn layers_start_at_base_and_step_by_interval() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    let b = fx.ctx.modal("beta").open().unwrap();
    let c = fx.ctx.modal("gamma").open().unwrap();

    assert_eq!(a.z_index(), 30_000);
    assert_eq!(b.z_index(), 31_000);
    assert_eq!(c.z_index(), 32_000);
    assert_eq!(fx.surface.modal(b.id()).unwrap().z_index, 31_000);
}

#[test]
fn custom_layer_sequence() {
    let fx = Fixture::with_layers(
        HeadlessSurface::default(),
        ScriptedSource::new().with_template("alpha", "<a/>"),
        ZIndexAllocator::new(100, 10),
    );
    let a = fx.ctx.modal("alpha").open().unwrap();
    let b = fx.ctx.modal("alpha").open().unwrap();
    assert_eq!((a.z_index(), b.z_index()), (100, 110));
    assert_eq!(fx.surface.overlay(a.id()).unwrap().z_index, 99);
}

#[test]
fn pinned_z_index_never_allocates() {
    let fx = fixture();
    let pinned = fx
        .ctx
        .modal("alpha")
        .overrides(ModalOverrides::new().z_index(5))
        .open()
        .unwrap();
    let next = fx.ctx.modal("beta").open().unwrap();

    assert_eq!(pinned.z_index(), 5);
    assert_eq!(next.z_index(), 30_000);
}

#[test]
fn z_index_is_stable_across_hide_and_show() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    let z = a.z_index();
    a.hide();
    a.show();
    assert_eq!(a.z_index(), z);
}

// ============================================================================
// Display
// ============================================================================

#[test]
fn display_centers_in_viewport() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();

    let mounted = fx.surface.modal(a.id()).unwrap();
    assert_eq!(mounted.rect.origin(), Point::new(312.0, 234.0));
    assert_eq!(mounted.layout, LayoutMode::Positioned);
    assert_eq!(mounted.markup, "<alpha/>");
    assert_eq!(a.state(), ModalState::Displayed);
    assert!(a.is_open());
    assert!(fx.ctx.is_open(a.id()));
}

#[test]
fn display_events_fire_once() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").build().unwrap();
    let hits = counter(&a, "display visible");

    a.display().unwrap();
    a.display().unwrap();

    assert_eq!(hits.get(), 2);
    assert_eq!(fx.surface.mounted_count(), 1);
}

#[test]
fn build_does_not_display() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").build().unwrap();
    assert_eq!(a.state(), ModalState::Created);
    assert_eq!(fx.source.request_count(), 0);

    let held = fx
        .ctx
        .modal("beta")
        .overrides(ModalOverrides::new().display_on_instantiation(false))
        .open()
        .unwrap();
    assert_eq!(held.state(), ModalState::Created);
}

#[test]
fn anchor_runs_after_center_then_viewport_clamps() {
    let surface = HeadlessSurface::default().with_element("btn", Rect::new(100.0, 50.0, 80.0, 20.0));
    let fx = Fixture::new(surface, ScriptedSource::new().with_template("alpha", "<a/>"));
    let a = fx
        .ctx
        .modal("alpha")
        .overrides(ModalOverrides::new().anchor("btn", AnchorTag::parse("top center")))
        .open()
        .unwrap();

    // Below the button (50 + 20 + 5); centered x would be -60, clamped to 10.
    assert_eq!(fx.surface.modal(a.id()).unwrap().rect.origin(), Point::new(10.0, 75.0));
}

#[test]
fn missing_anchor_element_skips_anchor() {
    let fx = fixture();
    let a = fx
        .ctx
        .modal("alpha")
        .overrides(ModalOverrides::new().anchor("gone", AnchorTag::default()))
        .open()
        .unwrap();
    assert_eq!(fx.surface.modal(a.id()).unwrap().rect.origin(), Point::new(312.0, 234.0));
}

#[test]
fn scrollable_modal_is_never_positioned() {
    let fx = fixture();
    let a = fx
        .ctx
        .modal("alpha")
        .overrides(ModalOverrides::new().scrollable(true))
        .open()
        .unwrap();

    let mounted = fx.surface.modal(a.id()).unwrap();
    assert_eq!(mounted.layout, LayoutMode::Scrollable);
    assert_eq!(mounted.rect.origin(), Point::new(0.0, 0.0));
    assert!(a.refresh_position(true).is_none());
}

#[test]
fn refresh_positions_follow_viewport() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    let b = fx.ctx.modal("beta").open().unwrap();
    b.hide();

    fx.surface.set_viewport(Rect::new(0.0, 0.0, 600.0, 500.0));
    assert_eq!(fx.ctx.refresh_positions(), 1);
    assert_eq!(fx.surface.modal(a.id()).unwrap().rect.origin(), Point::new(100.0, 100.0));
    assert_eq!(fx.surface.modal(b.id()).unwrap().rect.origin(), Point::new(312.0, 234.0));
}

#[test]
fn move_event_fires_on_placement() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").build().unwrap();
    let moves = counter(&a, event::MOVE);
    a.display().unwrap();
    a.refresh_position(false);
    assert_eq!(moves.get(), 2);
}

// ============================================================================
// Veto and deferred display
// ============================================================================

#[test]
fn before_display_veto_returns_to_created() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").build().unwrap();
    let veto = EventListener::new(|_: &Modal, _: &str| false);
    a.on(event::BEFORE_DISPLAY, &veto);

    a.display().unwrap();
    assert_eq!(a.state(), ModalState::Created);
    assert!(!a.is_open());
    assert_eq!(fx.surface.mounted_count(), 0);
    assert_eq!(fx.surface.overlay_count(), 0);

    a.off(event::BEFORE_DISPLAY, &veto);
    a.display().unwrap();
    assert_eq!(a.state(), ModalState::Displayed);
    // The second attempt reuses the template it already has.
    assert_eq!(fx.source.request_count(), 1);
}

#[test]
fn manual_display_waits_for_finish() {
    let fx = fixture();
    let a = fx
        .ctx
        .modal("alpha")
        .overrides(ModalOverrides::new().manually_display_after_init(true))
        .open()
        .unwrap();

    assert_eq!(a.state(), ModalState::Loading);
    assert!(a.content().is_some());
    assert!(!fx.surface.is_mounted(a.id()));

    a.finish_display().unwrap();
    assert_eq!(a.state(), ModalState::Displayed);
    assert!(fx.surface.is_mounted(a.id()));
}

struct Deferred;

impl ModalBehavior for Deferred {
    fn template_name(&self) -> Option<&str> {
        Some("gamma")
    }

    fn init_view(&self, _modal: &Modal) -> bool {
        false
    }
}

#[test]
fn behavior_can_hold_display() {
    let fx = fixture();
    let a = fx.ctx.builder().behavior(Deferred).open().unwrap();
    assert_eq!(a.name(), "gamma");
    assert_eq!(a.state(), ModalState::Loading);
    a.finish_display().unwrap();
    assert!(a.is_open());
}

struct ClosesInInit;

impl ModalBehavior for ClosesInInit {
    fn template_name(&self) -> Option<&str> {
        Some("alpha")
    }

    fn init_view(&self, modal: &Modal) -> bool {
        modal.close();
        true
    }
}

fn assert_stays_closed(fx: &Fixture, modal: &Modal) {
    assert_eq!(modal.state(), ModalState::Closed);
    assert!(!modal.is_open());
    assert!(!modal.overlay_owned());
    assert!(!fx.surface.is_mounted(modal.id()));
    assert_eq!(fx.surface.overlay_count(), 0);
    assert!(!fx.ctx.is_open(modal.id()));
    assert!(fx.ctx.overlay().owner().is_none());
}

#[test]
fn close_from_init_view_is_final() {
    let fx = fixture();
    let a = fx.ctx.builder().behavior(ClosesInInit).build().unwrap();
    let visible = counter(&a, "display visible");

    a.display().unwrap();
    assert_stays_closed(&fx, &a);
    assert_eq!(visible.get(), 0);
    assert_eq!(a.display(), Err(ModalError::Closed(a.id())));
}

struct ClosingInitializer;

impl ContentInitializer for ClosingInitializer {
    fn key(&self) -> &str {
        "closing"
    }

    fn initialize(&self, modal: &Modal, _content: &mut Content, _data: &DataRecord) {
        modal.close();
    }
}

#[test]
fn close_from_initializer_is_final() {
    let fx = fixture();
    fx.ctx.add_initializer(ClosingInitializer);
    let a = fx.ctx.modal("alpha").open().unwrap();
    assert_stays_closed(&fx, &a);

    let b = fx
        .ctx
        .modal("beta")
        .overrides(ModalOverrides::new().initializer("closing", false))
        .open()
        .unwrap();
    assert!(b.is_open());
}

#[test]
fn close_while_hiding_parent_restores_parent() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    let b = fx.ctx.modal("beta").parent(&a).build().unwrap();
    let child = b.downgrade();
    a.once(
        event::HIDE,
        &EventListener::observer(move |_: &Modal, _: &str| {
            if let Some(child) = child.upgrade() {
                child.close();
            }
        }),
    );

    b.display().unwrap();
    assert_eq!(b.state(), ModalState::Closed);
    assert!(!fx.surface.is_mounted(b.id()));
    assert!(!fx.ctx.is_open(b.id()));
    assert_eq!(a.state(), ModalState::Displayed);
    assert!(a.overlay_owned());
    assert_eq!(fx.ctx.open_modals(), vec![a]);
}

// ============================================================================
// Options resolution
// ============================================================================

struct Pinned;

impl ModalBehavior for Pinned {
    fn template_name(&self) -> Option<&str> {
        Some("alpha")
    }

    fn class_overrides(&self) -> ModalOverrides {
        ModalOverrides::new().z_index(7).class("pinned")
    }
}

#[test]
fn instance_overrides_beat_class_overrides() {
    let fx = fixture();
    let class_only = fx.ctx.builder().behavior(Pinned).open().unwrap();
    let instance = fx
        .ctx
        .builder()
        .behavior(Pinned)
        .overrides(ModalOverrides::new().z_index(9))
        .open()
        .unwrap();

    assert_eq!(class_only.z_index(), 7);
    assert_eq!(instance.z_index(), 9);
    assert_eq!(fx.surface.modal(instance.id()).unwrap().classes, vec!["pinned".to_owned()]);
}

#[test]
fn global_defaults_apply_to_new_modals() {
    let fx = fixture();
    fx.ctx
        .update_defaults(&ModalOverrides::new().display_on_instantiation(false));
    let a = fx.ctx.modal("alpha").open().unwrap();
    assert_eq!(a.state(), ModalState::Created);
}

#[test]
fn missing_template_name_is_rejected() {
    let fx = fixture();
    assert_eq!(fx.ctx.builder().build().unwrap_err(), ModalError::MissingTemplate);
    assert_eq!(fx.ctx.modal("").build().unwrap_err(), ModalError::MissingTemplate);
}

// ============================================================================
// Retrieval
// ============================================================================

#[test]
fn cache_serves_repeat_templates() {
    let fx = fixture();
    fx.ctx.modal("alpha").open().unwrap();
    fx.ctx.modal("alpha").open().unwrap();
    assert_eq!(fx.source.request_count(), 1);

    fx.ctx
        .modal("alpha")
        .overrides(ModalOverrides::new().use_cache(false))
        .open()
        .unwrap();
    assert_eq!(fx.source.request_count(), 2);
}

#[test]
fn request_uri_uses_template_addressing() {
    let fx = fixture();
    fx.ctx
        .modal("alpha")
        .overrides(ModalOverrides::new().template_dir("/dialogs/").param("lang", "en"))
        .open()
        .unwrap();
    assert_eq!(fx.source.requests()[0].uri, "/dialogs/alpha.html?lang=en");
}

#[test]
fn retrieval_failure_leaves_modal_loading() {
    let fx = fixture();
    fx.source.fail("alpha", 500, "boom");
    let a = fx.ctx.modal("alpha").build().unwrap();

    match a.display() {
        Err(ModalError::Retrieval(err)) => assert_eq!(err.status, Some(500)),
        other => panic!("expected retrieval error, got {other:?}"),
    }
    assert_eq!(a.state(), ModalState::Loading);
    assert!(!fx.ctx.cache().contains("alpha"));
    assert!(!a.is_open());
}

#[test]
fn unknown_template_is_a_404() {
    let fx = fixture();
    match fx.ctx.modal("nowhere").open() {
        Err(ModalError::Retrieval(err)) => assert_eq!(err.status, Some(404)),
        other => panic!("expected retrieval error, got {other:?}"),
    }
}

#[test]
fn deferred_retrieval_displays_on_completion() {
    let fx = fixture();
    fx.source.set_deferred(true);
    let a = fx.ctx.modal("alpha").open().unwrap();
    assert_eq!(a.state(), ModalState::Loading);

    // Ignored while loading.
    a.display().unwrap();
    assert_eq!(fx.source.pending_count(), 1);

    assert_eq!(fx.source.complete_all(), vec![Ok(())]);
    assert_eq!(a.state(), ModalState::Displayed);
}

#[test]
fn late_result_is_cached_but_not_applied() {
    let fx = fixture();
    fx.source.set_deferred(true);
    let a = fx.ctx.modal("alpha").open().unwrap();
    assert!(a.close());

    assert_eq!(fx.source.complete_next(), Some(Ok(())));
    assert_eq!(a.state(), ModalState::Closed);
    assert!(!fx.surface.is_mounted(a.id()));
    assert!(fx.ctx.cache().contains("alpha"));
}

// ============================================================================
// Initializers
// ============================================================================

#[test]
fn initializers_fill_the_instance_copy() {
    let fx = Fixture::new(
        HeadlessSurface::default(),
        ScriptedSource::new().with_template("greet", "hello {{who}}"),
    );
    fx.ctx.add_initializer(PlaceholderInitializer);

    let a = fx.ctx.modal("greet").datum("who", "world").open().unwrap();
    assert_eq!(a.content().unwrap().markup(), "hello world");
    assert_eq!(a.template().unwrap().markup(), "hello {{who}}");
    assert_eq!(fx.surface.modal(a.id()).unwrap().markup, "hello world");

    let raw = fx
        .ctx
        .modal("greet")
        .datum("who", "world")
        .overrides(ModalOverrides::new().initializer(PlaceholderInitializer::KEY, false))
        .open()
        .unwrap();
    assert_eq!(raw.content().unwrap().markup(), "hello {{who}}");
}

// ============================================================================
// Visibility
// ============================================================================

#[test]
fn hide_and_show_toggle_visibility() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    let hides = counter(&a, event::HIDE);
    let shows = counter(&a, event::SHOW);

    a.hide();
    a.hide();
    assert_eq!(a.state(), ModalState::Hidden);
    assert!(!fx.surface.is_visible(a.id()));
    assert!(a.is_open());

    a.show();
    a.show();
    assert_eq!(a.state(), ModalState::Displayed);
    assert!(fx.surface.is_visible(a.id()));
    assert_eq!((hides.get(), shows.get()), (1, 1));
}

#[test]
fn show_requires_an_open_modal() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").build().unwrap();
    a.show();
    assert_eq!(a.state(), ModalState::Created);
}

#[test]
fn child_hides_parent_until_it_closes() {
    let fx = fixture();
    let parent = fx.ctx.modal("alpha").open().unwrap();
    let child = fx.ctx.modal("beta").parent(&parent).open().unwrap();

    assert_eq!(parent.state(), ModalState::Hidden);
    assert!(!fx.surface.is_visible(parent.id()));
    assert_eq!(child.parent(), Some(parent.clone()));

    child.close();
    assert_eq!(parent.state(), ModalState::Displayed);
    assert!(fx.surface.is_visible(parent.id()));
    assert!(parent.overlay_owned());
}

#[test]
fn hide_parent_can_be_turned_off() {
    let fx = fixture();
    let parent = fx.ctx.modal("alpha").open().unwrap();
    fx.ctx
        .modal("beta")
        .parent(&parent)
        .overrides(ModalOverrides::new().hide_parent(false))
        .open()
        .unwrap();
    assert_eq!(parent.state(), ModalState::Displayed);
}

// ============================================================================
// Closing
// ============================================================================

#[test]
fn close_is_exactly_once() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    let log = close_log(&a, &[CloseChannel::Method]);

    assert!(a.close());
    assert!(!a.close());
    assert!(!a.trigger_close(CloseChannel::Button));

    assert_eq!(*log.borrow(), vec!["method"]);
    assert_eq!(a.state(), ModalState::Closed);
    assert!(!a.is_open());
    assert!(fx.ctx.get(a.id()).is_none());
    assert!(!fx.surface.is_mounted(a.id()));
    assert!(a.flow().is_none());
}

#[test]
fn close_dispatches_all_then_channel() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    let log = close_log(
        &a,
        &[CloseChannel::Button, CloseChannel::All, CloseChannel::Method],
    );

    a.trigger_close(CloseChannel::Button);
    assert_eq!(*log.borrow(), vec!["all", "button"]);
}

#[test]
fn listener_on_two_channels_runs_once() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    let listener = CloseListener::new(move |_: &Modal| h.set(h.get() + 1));
    a.on_close(CloseChannel::All, &listener);
    a.on_close(CloseChannel::Back, &listener);

    a.trigger_close(CloseChannel::Back);
    assert_eq!(hits.get(), 1);
}

#[test]
fn channel_list_registers_one_listener() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    let b = fx.ctx.modal("beta").open().unwrap();
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    let listener = CloseListener::new(move |_: &Modal| h.set(h.get() + 1));
    let channels = CloseChannel::parse_list("button all").unwrap();

    assert_eq!(a.on_close_many(&channels, &listener), 2);
    assert_eq!(b.on_close_many(&channels, &listener), 2);
    assert_eq!(b.off_close_many(&channels, &listener), 2);
    assert_eq!(b.close_listener_count(CloseChannel::Button), 0);

    a.trigger_close(CloseChannel::Button);
    b.trigger_close(CloseChannel::Button);
    assert_eq!(hits.get(), 1);
}

#[test]
fn listeners_added_after_close_are_refused() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    a.close();
    assert!(!a.on_close(CloseChannel::All, &CloseListener::new(|_: &Modal| {})));
    assert_eq!(a.close_listener_count(CloseChannel::All), 0);
}

#[test]
fn display_after_close_is_an_error() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    a.close();
    assert_eq!(a.display(), Err(ModalError::Closed(a.id())));
    assert_eq!(a.finish_display(), Err(ModalError::Closed(a.id())));
}

#[test]
fn close_all_closes_every_open_modal() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    let b = fx.ctx.modal("beta").parent(&a).open().unwrap();
    let c = fx.ctx.modal("gamma").open().unwrap();
    let unopened = fx.ctx.modal("delta").build().unwrap();

    assert_eq!(fx.ctx.open_modals().len(), 3);
    assert_eq!(fx.ctx.close_all(CloseChannel::Method), 3);
    assert!(a.is_closed() && b.is_closed() && c.is_closed());
    assert_eq!(unopened.state(), ModalState::Created);
    assert!(fx.ctx.open_modals().is_empty());
}

// ============================================================================
// Flows
// ============================================================================

#[test]
fn children_join_the_parent_flow() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    let b = fx.ctx.modal("beta").parent(&a).open().unwrap();
    let c = fx.ctx.modal("gamma").parent(&b).open().unwrap();

    let flow = a.flow().unwrap();
    assert!(flow.ptr_eq(&c.flow().unwrap()));
    assert_eq!(flow.dialogs(), vec![a.clone(), b.clone(), c.clone()]);

    b.close();
    assert_eq!(flow.dialogs(), vec![a, c]);
}

#[test]
fn go_to_root_closes_from_the_top() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    let b = fx.ctx.modal("beta").parent(&a).open().unwrap();
    let c = fx.ctx.modal("gamma").parent(&b).open().unwrap();

    let order = Rc::new(RefCell::new(Vec::new()));
    for m in [&b, &c] {
        let o = order.clone();
        m.on_close(
            CloseChannel::Button,
            &CloseListener::new(move |m: &Modal| o.borrow_mut().push(m.name().to_owned())),
        );
    }

    let flow = a.flow().unwrap();
    let root = flow.go_to(FlowSelector::Index(0), CloseChannel::Button);
    assert_eq!(root, Some(a.clone()));
    assert_eq!(*order.borrow(), vec!["gamma", "beta"]);
    assert_eq!(flow.len(), 1);
    assert_eq!(a.state(), ModalState::Displayed);
}

#[test]
fn back_on_lone_member_closes_it() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    let log = close_log(&a, &[CloseChannel::Back]);

    let flow = a.flow().unwrap();
    assert_eq!(flow.back(), Some(a.clone()));
    assert!(a.is_closed());
    assert!(flow.is_empty());
    assert_eq!(*log.borrow(), vec!["back"]);
}

#[test]
fn back_steps_to_previous_member() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    let b = fx.ctx.modal("beta").parent(&a).open().unwrap();

    assert_eq!(a.flow().unwrap().back(), Some(a.clone()));
    assert!(b.is_closed());
    assert!(a.is_open());
}

#[test]
fn close_scopes() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    let b = fx.ctx.modal("beta").parent(&a).open().unwrap();
    let c = fx.ctx.modal("gamma").parent(&b).open().unwrap();
    let other = fx.ctx.modal("delta").open().unwrap();

    assert_eq!(c.close_scope(CloseScope::Flow, CloseChannel::Button), 3);
    assert!(a.is_closed() && b.is_closed());
    assert!(other.is_open());

    let again = fx.ctx.modal("alpha").open().unwrap();
    assert_eq!(again.close_scope(CloseScope::All, CloseChannel::Method), 2);
    assert!(fx.ctx.open_modals().is_empty());
    assert_eq!(again.close_scope(CloseScope::This, CloseChannel::Method), 0);
}

#[test]
fn reset_forgets_shared_state() {
    let fx = fixture();
    let a = fx.ctx.modal("alpha").open().unwrap();
    fx.ctx.reset();

    assert!(fx.ctx.open_modals().is_empty());
    assert!(fx.ctx.cache().is_empty());
    assert!(fx.ctx.overlay().owner().is_none());
    assert_eq!(fx.ctx.layers().peek(), None);
    // The modal itself is untouched.
    assert_eq!(a.state(), ModalState::Displayed);

    let b = fx.ctx.modal("beta").open().unwrap();
    assert_eq!(b.z_index(), 30_000);
}
