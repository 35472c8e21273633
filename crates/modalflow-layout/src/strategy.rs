#![forbid(unsafe_code)]

//! Strategy names and toggles.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// One named placement algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Center,
    Anchor,
    Container,
    Viewport,
}

/// Default evaluation order.
pub const DEFAULT_PRIORITY: [Strategy; 4] = [
    Strategy::Center,
    Strategy::Anchor,
    Strategy::Container,
    Strategy::Viewport,
];

bitflags! {
    /// Set of enabled strategies.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Strategies: u8 {
        const CENTER = 1 << 0;
        const ANCHOR = 1 << 1;
        const CONTAINER = 1 << 2;
        const VIEWPORT = 1 << 3;
    }
}

impl Strategy {
    /// The toggle bit for this strategy.
    #[inline]
    pub const fn flag(self) -> Strategies {
        match self {
            Self::Center => Strategies::CENTER,
            Self::Anchor => Strategies::ANCHOR,
            Self::Container => Strategies::CONTAINER,
            Self::Viewport => Strategies::VIEWPORT,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Anchor => "anchor",
            Self::Container => "container",
            Self::Viewport => "viewport",
        }
    }

    /// Parse a whitespace-separated priority list such as `"anchor center"`.
    pub fn parse_list(list: &str) -> Result<Vec<Self>, ParseError> {
        list.split_whitespace().map(str::parse).collect()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "center" => Ok(Self::Center),
            "anchor" => Ok(Self::Anchor),
            "container" => Ok(Self::Container),
            "viewport" => Ok(Self::Viewport),
            _ => Err(ParseError::UnknownStrategy(s.to_owned())),
        }
    }
}

/// Errors from parsing placement configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A strategy name outside `center|anchor|container|viewport`.
    UnknownStrategy(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownStrategy(name) => write!(f, "unknown placement strategy: {name}"),
        }
    }
}

impl std::error::Error for ParseError {}
