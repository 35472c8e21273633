#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a modal.
///
/// `Created → Loading → Displayed ⇄ Hidden → Closed`. `Closed` is terminal.
/// A vetoed display returns `Loading` to `Created`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModalState {
    #[default]
    Created,
    Loading,
    Displayed,
    Hidden,
    Closed,
}

impl ModalState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Loading => "loading",
            Self::Displayed => "displayed",
            Self::Hidden => "hidden",
            Self::Closed => "closed",
        }
    }

    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for ModalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle event names fired on a modal's event bus.
pub mod event {
    pub const BEFORE_DISPLAY: &str = "beforeDisplay";
    pub const DISPLAY: &str = "display";
    pub const VISIBLE: &str = "visible";
    pub const SHOW: &str = "show";
    pub const HIDE: &str = "hide";
    pub const MOVE: &str = "move";
    pub const SHOW_OVERLAY: &str = "showOverlay";
    pub const HIDE_OVERLAY: &str = "hideOverlay";
}

/// How much a close request takes down with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloseScope {
    /// The modal itself.
    #[default]
    This,
    /// Every member of the modal's flow.
    Flow,
    /// Every open modal in the context.
    All,
}

impl FromStr for CloseScope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "this" | "self" => Ok(Self::This),
            "flow" => Ok(Self::Flow),
            "all" => Ok(Self::All),
            other => Err(UnknownScope(other.to_owned())),
        }
    }
}

/// A close scope outside `this|flow|all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScope(pub String);

impl fmt::Display for UnknownScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown close scope: {}", self.0)
    }
}

impl std::error::Error for UnknownScope {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_closed_is_terminal() {
        assert!(ModalState::Closed.is_terminal());
        assert!(!ModalState::Hidden.is_terminal());
        assert_eq!(ModalState::default(), ModalState::Created);
    }

    #[test]
    fn scope_parsing() {
        assert_eq!("self".parse::<CloseScope>(), Ok(CloseScope::This));
        assert_eq!("".parse::<CloseScope>(), Ok(CloseScope::This));
        assert_eq!("flow".parse::<CloseScope>(), Ok(CloseScope::Flow));
        assert!("parent".parse::<CloseScope>().is_err());
    }
}
