#![forbid(unsafe_code)]

//! Compass tags for anchored placement.
//!
//! A tag is written as `"<vertical> <horizontal>"`, e.g. `"bottom left"`.
//! Each word names the widget edge that docks against the anchor:
//!
//! - `top`: the widget's top edge sits below the anchor's bottom edge.
//! - `bottom`: the widget's bottom edge sits above the anchor's top edge.
//! - `left`: the widget's left edge sits right of the anchor's right edge.
//! - `right`: the widget's right edge sits left of the anchor's left edge.
//! - `center`: centers on the anchor along that axis.
//!
//! Matching is by prefix fragment (`bot`, `cen`), so `"btm"` is not
//! recognized but `"bottom-ish"` is. Missing or unknown words fall back to
//! `top` vertically and `center` horizontally.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAnchor {
    #[default]
    Top,
    Bottom,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAnchor {
    Left,
    Right,
    #[default]
    Center,
}

/// Vertical plus horizontal docking instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AnchorTag {
    pub vertical: VerticalAnchor,
    pub horizontal: HorizontalAnchor,
}

impl AnchorTag {
    pub const fn new(vertical: VerticalAnchor, horizontal: HorizontalAnchor) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// Lenient parse; never fails.
    pub fn parse(tag: &str) -> Self {
        let lowered = tag.trim().to_ascii_lowercase();
        let mut words = lowered.split_whitespace();
        let vert = words.next().unwrap_or("");
        let horz = words.next().unwrap_or("");

        let vertical = if vert.contains("bot") {
            VerticalAnchor::Bottom
        } else if vert.contains("cen") {
            VerticalAnchor::Center
        } else {
            VerticalAnchor::Top
        };

        let horizontal = if horz.contains("left") {
            HorizontalAnchor::Left
        } else if horz.contains("right") {
            HorizontalAnchor::Right
        } else {
            HorizontalAnchor::Center
        };

        Self::new(vertical, horizontal)
    }
}

impl FromStr for AnchorTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for AnchorTag {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<AnchorTag> for String {
    fn from(value: AnchorTag) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AnchorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = match self.vertical {
            VerticalAnchor::Top => "top",
            VerticalAnchor::Bottom => "bottom",
            VerticalAnchor::Center => "center",
        };
        let h = match self.horizontal {
            HorizontalAnchor::Left => "left",
            HorizontalAnchor::Right => "right",
            HorizontalAnchor::Center => "center",
        };
        write!(f, "{v} {h}")
    }
}
