#![forbid(unsafe_code)]

//! Modal options.
//!
//! [`ModalOptions`] is the fully resolved configuration a modal runs with.
//! [`ModalOverrides`] carries the same keys with every field optional; it is
//! what callers and modal classes supply, and what override documents
//! deserialize into (camelCase keys, e.g. `posPriority`, `stackOverlay`).
//!
//! Resolution order, lowest to highest: context defaults, class overrides,
//! instance overrides. Nested groups (`position`, `posBuffer`, `template`)
//! merge key by key; everything else replaces.
//!
//! # Example
//!
//! ```ignore
//! let opts = ModalOptions::default().merged(
//!     &ModalOverrides::default()
//!         .anchor("#help-icon", AnchorTag::parse("bottom left"))
//!         .stack_overlay(true),
//! );
//! assert!(opts.position_config().is_enabled(Strategy::Anchor));
//! ```

use std::collections::BTreeMap;

use modalflow_core::ElementRef;
use modalflow_layout::{AnchorTag, PositionBuffers, PositionConfig, Strategies, Strategy, DEFAULT_PRIORITY};
use serde::Deserialize;
use smallvec::SmallVec;

#[cfg(feature = "policy-config")]
use crate::error::ConfigError;

/// Reference element plus docking tag for the anchor strategy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnchorOption {
    pub element: ElementRef,
    #[serde(default)]
    pub tag: AnchorTag,
}

/// Which placement strategies run, and against what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionOptions {
    pub center: bool,
    pub anchor: Option<AnchorOption>,
    pub container: Option<ElementRef>,
    pub viewport: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            center: true,
            anchor: None,
            container: None,
            viewport: true,
        }
    }
}

/// Backdrop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "OverlayRepr")]
pub enum OverlaySetting {
    /// No overlay for this modal.
    Disabled,
    /// The surface's default backdrop.
    #[default]
    Backdrop,
    /// A caller-provided element used as the backdrop.
    Element(ElementRef),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OverlayRepr {
    Flag(bool),
    Element(ElementRef),
}

impl From<OverlayRepr> for OverlaySetting {
    fn from(repr: OverlayRepr) -> Self {
        match repr {
            OverlayRepr::Flag(true) => Self::Backdrop,
            OverlayRepr::Flag(false) => Self::Disabled,
            OverlayRepr::Element(el) => Self::Element(el),
        }
    }
}

impl OverlaySetting {
    #[inline]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    pub fn element(&self) -> Option<&ElementRef> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// What a click on the overlay closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayClose {
    /// Only the modal that owns the overlay.
    #[default]
    #[serde(rename = "self")]
    SelfOnly,
    /// Every open modal.
    All,
    /// The owner's whole flow.
    Flow,
    /// Nothing.
    None,
}

/// Template addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOptions {
    pub dir: String,
    pub ext: String,
    /// Full URI used instead of `dir + name + ext`.
    pub url_override: Option<String>,
    /// Query parameters appended to the URI.
    pub params: BTreeMap<String, String>,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            dir: String::new(),
            ext: ".html".to_owned(),
            url_override: None,
            params: BTreeMap::new(),
        }
    }
}

/// Resolved modal configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalOptions {
    pub position: PositionOptions,
    pub pos_priority: Vec<Strategy>,
    pub pos_buffer: PositionBuffers,
    /// Allow the viewport strategy to scroll the surface.
    pub scroll_to: bool,
    pub template: TemplateOptions,
    pub use_cache: bool,
    pub overlay: OverlaySetting,
    pub overlay_close: OverlayClose,
    /// Hide the parent while this modal is shown.
    pub hide_parent: bool,
    /// Always take the overlay, even while another modal owns it.
    pub stack_overlay: bool,
    /// Scroll-container layout; disables dynamic placement.
    pub scrollable: bool,
    /// Content initializer toggles keyed by initializer name. Absent means on.
    pub initializers: BTreeMap<String, bool>,
    /// Explicit layer; bypasses the allocator.
    pub z_index: Option<i64>,
    pub display_on_instantiation: bool,
    pub manually_display_after_init: bool,
    /// Extra style classes handed to the surface on mount.
    pub classes: Vec<String>,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            position: PositionOptions::default(),
            pos_priority: DEFAULT_PRIORITY.to_vec(),
            pos_buffer: PositionBuffers::default(),
            scroll_to: false,
            template: TemplateOptions::default(),
            use_cache: true,
            overlay: OverlaySetting::Backdrop,
            overlay_close: OverlayClose::SelfOnly,
            hide_parent: true,
            stack_overlay: false,
            scrollable: false,
            initializers: BTreeMap::new(),
            z_index: None,
            display_on_instantiation: true,
            manually_display_after_init: false,
            classes: Vec::new(),
        }
    }
}

impl ModalOptions {
    /// `self` with `overrides` applied on top.
    #[must_use]
    pub fn merged(&self, overrides: &ModalOverrides) -> Self {
        let mut out = self.clone();
        out.apply(overrides);
        out
    }

    pub fn apply(&mut self, o: &ModalOverrides) {
        if let Some(p) = &o.position {
            if let Some(center) = p.center {
                self.position.center = center;
            }
            if let Some(anchor) = &p.anchor {
                self.position.anchor = Some(anchor.clone());
            }
            if let Some(container) = &p.container {
                self.position.container = Some(container.clone());
            }
            if let Some(viewport) = p.viewport {
                self.position.viewport = viewport;
            }
        }
        if let Some(priority) = &o.pos_priority {
            self.pos_priority = priority.clone();
        }
        if let Some(b) = &o.pos_buffer {
            if let Some(v) = b.anchor {
                self.pos_buffer.anchor = v;
            }
            if let Some(v) = b.container {
                self.pos_buffer.container = v;
            }
            if let Some(v) = b.viewport {
                self.pos_buffer.viewport = v;
            }
            if b.override_all.is_some() {
                self.pos_buffer.override_all = b.override_all;
            }
        }
        if let Some(t) = &o.template {
            if let Some(dir) = &t.dir {
                self.template.dir.clone_from(dir);
            }
            if let Some(ext) = &t.ext {
                self.template.ext.clone_from(ext);
            }
            if t.url_override.is_some() {
                self.template.url_override.clone_from(&t.url_override);
            }
            if let Some(params) = &t.params {
                self.template
                    .params
                    .extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        if let Some(initializers) = &o.initializers {
            self.initializers
                .extend(initializers.iter().map(|(k, v)| (k.clone(), *v)));
        }

        macro_rules! replace {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = &o.$field {
                    self.$field = v.clone();
                })*
            };
        }
        replace!(
            scroll_to,
            use_cache,
            overlay,
            overlay_close,
            hide_parent,
            stack_overlay,
            scrollable,
            display_on_instantiation,
            manually_display_after_init,
            classes,
        );
        if o.z_index.is_some() {
            self.z_index = o.z_index;
        }
    }

    /// Placement settings for the layout engine.
    pub fn position_config(&self) -> PositionConfig {
        let mut enabled = Strategies::empty();
        enabled.set(Strategies::CENTER, self.position.center);
        enabled.set(Strategies::ANCHOR, self.position.anchor.is_some());
        enabled.set(Strategies::CONTAINER, self.position.container.is_some());
        enabled.set(Strategies::VIEWPORT, self.position.viewport);

        PositionConfig {
            enabled,
            priority: SmallVec::from_slice(&self.pos_priority),
            anchor: self
                .position
                .anchor
                .as_ref()
                .map(|a| a.tag)
                .unwrap_or_default(),
            buffers: self.pos_buffer,
            scroll_into_view: self.scroll_to,
        }
    }

    #[must_use]
    pub fn initializer_enabled(&self, key: &str) -> bool {
        self.initializers.get(key).copied().unwrap_or(true)
    }
}

// --- Overrides ---

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionOverrides {
    pub center: Option<bool>,
    pub anchor: Option<AnchorOption>,
    pub container: Option<ElementRef>,
    pub viewport: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct BufferOverrides {
    pub anchor: Option<f64>,
    pub container: Option<f64>,
    pub viewport: Option<f64>,
    #[serde(rename = "override")]
    pub override_all: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateOverrides {
    pub dir: Option<String>,
    pub ext: Option<String>,
    pub url_override: Option<String>,
    pub params: Option<BTreeMap<String, String>>,
}

/// Partial options; `None` leaves the lower layer's value in place.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModalOverrides {
    pub position: Option<PositionOverrides>,
    pub pos_priority: Option<Vec<Strategy>>,
    pub pos_buffer: Option<BufferOverrides>,
    pub scroll_to: Option<bool>,
    pub template: Option<TemplateOverrides>,
    pub use_cache: Option<bool>,
    pub overlay: Option<OverlaySetting>,
    pub overlay_close: Option<OverlayClose>,
    pub hide_parent: Option<bool>,
    pub stack_overlay: Option<bool>,
    #[serde(alias = "modalIsScrollable")]
    pub scrollable: Option<bool>,
    pub initializers: Option<BTreeMap<String, bool>>,
    pub z_index: Option<i64>,
    pub display_on_instantiation: Option<bool>,
    pub manually_display_after_init: Option<bool>,
    pub classes: Option<Vec<String>>,
}

impl ModalOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    fn position_mut(&mut self) -> &mut PositionOverrides {
        self.position.get_or_insert_with(PositionOverrides::default)
    }

    fn buffer_mut(&mut self) -> &mut BufferOverrides {
        self.pos_buffer.get_or_insert_with(BufferOverrides::default)
    }

    fn template_mut(&mut self) -> &mut TemplateOverrides {
        self.template.get_or_insert_with(TemplateOverrides::default)
    }

    #[must_use]
    pub fn center(mut self, enabled: bool) -> Self {
        self.position_mut().center = Some(enabled);
        self
    }

    #[must_use]
    pub fn anchor(mut self, element: impl Into<ElementRef>, tag: AnchorTag) -> Self {
        self.position_mut().anchor = Some(AnchorOption {
            element: element.into(),
            tag,
        });
        self
    }

    #[must_use]
    pub fn container(mut self, element: impl Into<ElementRef>) -> Self {
        self.position_mut().container = Some(element.into());
        self
    }

    #[must_use]
    pub fn viewport(mut self, enabled: bool) -> Self {
        self.position_mut().viewport = Some(enabled);
        self
    }

    #[must_use]
    pub fn pos_priority(mut self, order: impl IntoIterator<Item = Strategy>) -> Self {
        self.pos_priority = Some(order.into_iter().collect());
        self
    }

    #[must_use]
    pub fn buffer(mut self, strategy: Strategy, amount: f64) -> Self {
        let b = self.buffer_mut();
        match strategy {
            Strategy::Anchor => b.anchor = Some(amount),
            Strategy::Container => b.container = Some(amount),
            Strategy::Viewport => b.viewport = Some(amount),
            Strategy::Center => {}
        }
        self
    }

    #[must_use]
    pub fn buffer_override(mut self, amount: f64) -> Self {
        self.buffer_mut().override_all = Some(amount);
        self
    }

    #[must_use]
    pub fn scroll_to(mut self, scroll: bool) -> Self {
        self.scroll_to = Some(scroll);
        self
    }

    #[must_use]
    pub fn template_dir(mut self, dir: impl Into<String>) -> Self {
        self.template_mut().dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn template_ext(mut self, ext: impl Into<String>) -> Self {
        self.template_mut().ext = Some(ext.into());
        self
    }

    #[must_use]
    pub fn url_override(mut self, url: impl Into<String>) -> Self {
        self.template_mut().url_override = Some(url.into());
        self
    }

    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.template_mut()
            .params
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = Some(use_cache);
        self
    }

    #[must_use]
    pub fn overlay(mut self, overlay: OverlaySetting) -> Self {
        self.overlay = Some(overlay);
        self
    }

    #[must_use]
    pub fn overlay_close(mut self, policy: OverlayClose) -> Self {
        self.overlay_close = Some(policy);
        self
    }

    #[must_use]
    pub fn hide_parent(mut self, hide: bool) -> Self {
        self.hide_parent = Some(hide);
        self
    }

    #[must_use]
    pub fn stack_overlay(mut self, stack: bool) -> Self {
        self.stack_overlay = Some(stack);
        self
    }

    #[must_use]
    pub fn scrollable(mut self, scrollable: bool) -> Self {
        self.scrollable = Some(scrollable);
        self
    }

    #[must_use]
    pub fn initializer(mut self, key: impl Into<String>, enabled: bool) -> Self {
        self.initializers
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), enabled);
        self
    }

    #[must_use]
    pub fn z_index(mut self, z: i64) -> Self {
        self.z_index = Some(z);
        self
    }

    #[must_use]
    pub fn display_on_instantiation(mut self, display: bool) -> Self {
        self.display_on_instantiation = Some(display);
        self
    }

    #[must_use]
    pub fn manually_display_after_init(mut self, manual: bool) -> Self {
        self.manually_display_after_init = Some(manual);
        self
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.get_or_insert_with(Vec::new).push(class.into());
        self
    }

    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(doc: &str) -> Result<Self, ConfigError> {
        toml::from_str(doc).map_err(|e| ConfigError::Toml(e.to_string()))
    }

    #[cfg(feature = "policy-config")]
    pub fn from_json_str(doc: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(doc).map_err(|e| ConfigError::Json(e.to_string()))
    }
}
