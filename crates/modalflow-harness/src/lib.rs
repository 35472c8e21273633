#![forbid(unsafe_code)]

//! Test fixtures for modalflow.
//!
//! - [`HeadlessSurface`]: records mounts, moves, visibility, overlays, and
//!   scrolling in memory.
//! - [`ScriptedSource`]: serves templates from a table, synchronously or on
//!   demand.
//! - [`PlaceholderInitializer`]: substitutes `{{key}}` with the modal's data.
//! - [`Fixture`]: a context wired to both, for one-line test setup.

pub mod source;
pub mod surface;

use std::rc::Rc;

use modalflow_core::ZIndexAllocator;
use modalflow_widgets::{Content, ContentInitializer, DataRecord, Modal, ModalContext};

pub use source::ScriptedSource;
pub use surface::{
    DEFAULT_MODAL_SIZE, DEFAULT_VIEWPORT, HeadlessSurface, MountedModal, MountedOverlay, SurfaceOp,
};

/// A context together with the fixtures behind it.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub ctx: ModalContext,
    pub surface: Rc<HeadlessSurface>,
    pub source: Rc<ScriptedSource>,
}

impl Fixture {
    pub fn new(surface: HeadlessSurface, source: ScriptedSource) -> Self {
        Self::with_layers(surface, source, ZIndexAllocator::default())
    }

    pub fn with_layers(surface: HeadlessSurface, source: ScriptedSource, layers: ZIndexAllocator) -> Self {
        let surface = Rc::new(surface);
        let source = Rc::new(source);
        let ctx = ModalContext::with_layers(surface.clone(), source.clone(), layers);
        Self {
            ctx,
            surface,
            source,
        }
    }

    /// Default surface with a template for each name (markup `<name/>`).
    pub fn with_templates(names: &[&str]) -> Self {
        let source = ScriptedSource::new();
        for name in names {
            source.set_template(*name, format!("<{name}/>"));
        }
        Self::new(HeadlessSurface::default(), source)
    }
}

/// Replaces `{{key}}` in the markup with `data[key]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderInitializer;

impl PlaceholderInitializer {
    pub const KEY: &'static str = "data";
}

impl ContentInitializer for PlaceholderInitializer {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn initialize(&self, _modal: &Modal, content: &mut Content, data: &DataRecord) {
        let markup = content.markup_mut();
        for (key, value) in data {
            *markup = markup.replace(&format!("{{{{{key}}}}}"), value);
        }
    }
}

/// Install a test-writer `tracing` subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}
