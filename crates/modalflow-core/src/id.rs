#![forbid(unsafe_code)]

//! Identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Global counter for unique modal IDs.
static MODAL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a modal instance.
///
/// Generated at construction and stable for the instance's lifetime. IDs are
/// never reused within a process, so ordering by ID is ordering by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModalId(u64);

impl ModalId {
    /// Allocate the next unique modal ID.
    pub fn next() -> Self {
        Self(MODAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "modal-{:08x}", self.0)
    }
}

/// Handle to a reference element on the presentation surface.
///
/// The core never interprets the handle; the presentation surface maps it to
/// whatever it uses to locate elements (a selector, a widget key, a node id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementRef(String);

impl ElementRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ElementRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = ModalId::next();
        let b = ModalId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn element_ref_is_transparent_in_json() {
        let r: ElementRef = serde_json::from_str("\"#sidebar\"").unwrap();
        assert_eq!(r.as_str(), "#sidebar");
        assert_eq!(serde_json::to_string(&r).unwrap(), "\"#sidebar\"");
    }
}
