#![forbid(unsafe_code)]

//! Priority-ordered placement.
//!
//! [`place`] walks [`PositionConfig::priority`] and applies each enabled
//! strategy to a working rectangle. A strategy whose reference frame is
//! missing (no anchor element measured, no container measured) is skipped
//! rather than treated as an error.
//!
//! # Coordinate model
//!
//! All rectangles share one surface coordinate space. The viewport rectangle
//! carries the current scroll offset in its origin, so a widget is visible
//! iff it intersects `frames.viewport`.
//!
//! # Invariants
//!
//! 1. The widget's size is never changed; only its origin moves.
//! 2. Each strategy sees the rectangle left by the previous one.
//! 3. `place` is pure: identical inputs yield identical outputs.
//! 4. `center` is idempotent for an unmoved widget and viewport.
//!
//! # Failure Modes
//!
//! | Condition                         | Behavior                          |
//! |-----------------------------------|-----------------------------------|
//! | Strategy disabled                 | Skipped                           |
//! | Anchor/container frame is `None`  | Skipped                           |
//! | Widget larger than container      | Start edge wins                   |
//! | Widget larger than viewport       | Left edge wins; top pinned to `buffer` when unscrolled |

use modalflow_core::{Point, Rect};
use smallvec::SmallVec;

use crate::anchor::{AnchorTag, HorizontalAnchor, VerticalAnchor};
use crate::strategy::{DEFAULT_PRIORITY, Strategies, Strategy};

/// Gap kept between the widget and each reference frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionBuffers {
    pub anchor: f64,
    /// Negative values let the widget extend past the container edge.
    pub container: f64,
    pub viewport: f64,
    /// When set and non-zero, replaces every per-strategy buffer.
    pub override_all: Option<f64>,
}

impl Default for PositionBuffers {
    fn default() -> Self {
        Self {
            anchor: 5.0,
            container: -20.0,
            viewport: 10.0,
            override_all: None,
        }
    }
}

impl PositionBuffers {
    /// Effective buffer for `strategy`.
    pub fn for_strategy(&self, strategy: Strategy) -> f64 {
        if let Some(all) = self.override_all
            && all != 0.0
        {
            return all;
        }
        match strategy {
            Strategy::Anchor => self.anchor,
            Strategy::Container => self.container,
            Strategy::Viewport => self.viewport,
            Strategy::Center => 0.0,
        }
    }
}

/// Resolved placement settings for one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionConfig {
    pub enabled: Strategies,
    pub priority: SmallVec<[Strategy; 4]>,
    pub anchor: AnchorTag,
    pub buffers: PositionBuffers,
    /// Let the viewport strategy request a scroll when the widget is clipped
    /// vertically.
    pub scroll_into_view: bool,
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            enabled: Strategies::CENTER | Strategies::VIEWPORT,
            priority: SmallVec::from_slice(&DEFAULT_PRIORITY),
            anchor: AnchorTag::default(),
            buffers: PositionBuffers::default(),
            scroll_into_view: false,
        }
    }
}

impl PositionConfig {
    #[must_use]
    pub fn enable(mut self, strategies: Strategies) -> Self {
        self.enabled |= strategies;
        self
    }

    #[must_use]
    pub fn disable(mut self, strategies: Strategies) -> Self {
        self.enabled.remove(strategies);
        self
    }

    #[must_use]
    pub fn priority(mut self, order: impl IntoIterator<Item = Strategy>) -> Self {
        self.priority = order.into_iter().collect();
        self
    }

    #[must_use]
    pub fn anchor_tag(mut self, tag: AnchorTag) -> Self {
        self.anchor = tag;
        self
    }

    #[must_use]
    pub fn buffers(mut self, buffers: PositionBuffers) -> Self {
        self.buffers = buffers;
        self
    }

    #[must_use]
    pub fn scroll_into_view(mut self, scroll: bool) -> Self {
        self.scroll_into_view = scroll;
        self
    }

    #[inline]
    pub fn is_enabled(&self, strategy: Strategy) -> bool {
        self.enabled.contains(strategy.flag())
    }
}

/// Measured geometry the strategies are computed against.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReferenceFrames {
    /// Visible region; the origin is the current scroll offset.
    pub viewport: Rect,
    pub anchor: Option<Rect>,
    pub container: Option<Rect>,
}

impl ReferenceFrames {
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            anchor: None,
            container: None,
        }
    }

    #[must_use]
    pub fn with_anchor(mut self, anchor: Rect) -> Self {
        self.anchor = Some(anchor);
        self
    }

    #[must_use]
    pub fn with_container(mut self, container: Rect) -> Self {
        self.container = Some(container);
        self
    }
}

/// Outcome of a placement pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rect: Rect,
    /// Vertical scroll offset the surface should move to, if any.
    pub scroll_to: Option<f64>,
    /// Strategies that actually ran.
    pub applied: Strategies,
}

impl Placement {
    #[inline]
    pub fn origin(&self) -> Point {
        self.rect.origin()
    }
}

/// Compute the widget's next box.
pub fn place(widget: Rect, config: &PositionConfig, frames: &ReferenceFrames) -> Placement {
    let mut out = Placement {
        rect: widget,
        scroll_to: None,
        applied: Strategies::empty(),
    };

    for &strategy in &config.priority {
        if !config.is_enabled(strategy) {
            continue;
        }
        let buffer = config.buffers.for_strategy(strategy);
        let ran = match strategy {
            Strategy::Center => {
                out.rect = center(out.rect, frames.viewport);
                true
            }
            Strategy::Anchor => frames.anchor.is_some_and(|target| {
                out.rect = anchor(out.rect, target, config.anchor, buffer);
                true
            }),
            Strategy::Container => frames.container.is_some_and(|bounds| {
                out.rect = contain(out.rect, bounds, buffer);
                true
            }),
            Strategy::Viewport => {
                let (rect, scroll) = viewport(
                    out.rect,
                    frames.viewport,
                    buffer,
                    config.scroll_into_view,
                );
                out.rect = rect;
                if scroll.is_some() {
                    out.scroll_to = scroll;
                }
                true
            }
        };
        if ran {
            out.applied |= strategy.flag();
        }
    }

    out
}

// --- Strategies ---

fn center(widget: Rect, vp: Rect) -> Rect {
    widget.with_origin(Point::new(
        vp.x + vp.width / 2.0 - widget.width / 2.0,
        vp.y + vp.height / 2.0 - widget.height / 2.0,
    ))
}

fn anchor(widget: Rect, target: Rect, tag: AnchorTag, buffer: f64) -> Rect {
    let y = match tag.vertical {
        VerticalAnchor::Top => target.bottom() + buffer,
        VerticalAnchor::Bottom => target.y - widget.height - buffer,
        VerticalAnchor::Center => target.y + target.height / 2.0 - widget.height / 2.0,
    };
    // Horizontal pass starts from the vertically placed box.
    let placed = widget.with_y(y);
    let x = match tag.horizontal {
        HorizontalAnchor::Left => target.right() + buffer,
        HorizontalAnchor::Right => target.x - placed.width - buffer,
        HorizontalAnchor::Center => target.x + target.width / 2.0 - placed.width / 2.0,
    };
    placed.with_x(x)
}

fn contain(widget: Rect, container: Rect, buffer: f64) -> Rect {
    let bounds = container.inset(buffer);
    let mut rect = widget;

    if rect.x < container.x {
        rect.x = bounds.x;
    } else if rect.right() > container.right() {
        rect.x = bounds.right() - rect.width;
    }

    if rect.y < container.y {
        rect.y = bounds.y;
    } else if rect.bottom() > container.bottom() {
        rect.y = bounds.bottom() - rect.height;
    }

    rect
}

fn viewport(widget: Rect, vp: Rect, buffer: f64, scroll_into_view: bool) -> (Rect, Option<f64>) {
    let mut rect = widget;
    let far_left = widget.x - vp.x;
    let far_right = vp.right() - widget.right();
    let far_top = widget.y - vp.y;
    let far_bottom = vp.bottom() - widget.bottom();

    if far_left < 0.0 {
        rect.x = vp.x + buffer;
    } else if far_right < 0.0 {
        rect.x = vp.right() - rect.width - buffer;
    }

    let mut scroll = None;
    if scroll_into_view {
        if far_top < 0.0 {
            scroll = Some((widget.y - buffer).max(0.0));
        } else if far_bottom < 0.0 {
            scroll = Some(vp.y + far_bottom.abs() + buffer);
        }
    }

    if vp.y <= 0.0 && far_top < 0.0 {
        rect.y = buffer;
    }

    (rect, scroll)
}
