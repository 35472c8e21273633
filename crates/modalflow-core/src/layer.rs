#![forbid(unsafe_code)]

//! Z-index allocation for stacked modals.
//!
//! # Invariants
//!
//! - The sequence is inactive (`next == 0`) until the first allocation.
//! - Once active, every allocation returns the current `next` and advances it
//!   by `interval`. The counter never decrements.
//! - Indices are not recycled when a modal closes.
//!
//! The allocator uses `Cell` and is therefore `!Sync`: it is meant to live in
//! a single-threaded context object. Sharing it across threads requires
//! wrapping it in a lock.

use std::cell::Cell;

/// First index handed out by a fresh sequence.
pub const DEFAULT_Z_START: i64 = 30_000;

/// Gap between consecutive modal layers (leaves room for the overlay).
pub const DEFAULT_Z_INTERVAL: i64 = 1_000;

/// Monotonic layer-index sequence.
#[derive(Debug)]
pub struct ZIndexAllocator {
    start: i64,
    interval: i64,
    next: Cell<i64>,
}

impl Default for ZIndexAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_Z_START, DEFAULT_Z_INTERVAL)
    }
}

impl ZIndexAllocator {
    /// Create an inactive sequence.
    ///
    /// `start` and `interval` are clamped to at least 1 because `0` is the
    /// "inactive" marker.
    pub fn new(start: i64, interval: i64) -> Self {
        Self {
            start: start.max(1),
            interval: interval.max(1),
            next: Cell::new(0),
        }
    }

    /// Hand out the next layer index, activating the sequence if needed.
    pub fn allocate(&self) -> i64 {
        if self.next.get() <= 0 {
            self.next.set(self.start);
        }
        let z = self.next.get();
        self.next.set(z + self.interval);
        z
    }

    /// The index the next allocation will return, if the sequence is active.
    pub fn peek(&self) -> Option<i64> {
        let next = self.next.get();
        (next > 0).then_some(next)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.next.get() > 0
    }

    #[inline]
    pub fn start(&self) -> i64 {
        self.start
    }

    #[inline]
    pub fn interval(&self) -> i64 {
        self.interval
    }

    /// Distance the overlay sits below its owner: `ceil(interval / 10)`.
    pub fn overlay_gap(&self) -> i64 {
        (self.interval + 9) / 10
    }

    /// Layer for an overlay owned by a modal at `owner_z`.
    ///
    /// Always strictly below the owner and above the previous modal layer.
    pub fn overlay_z(&self, owner_z: i64) -> i64 {
        owner_z - self.overlay_gap()
    }

    /// Return to the inactive state. Intended for test isolation.
    pub fn reset(&self) {
        self.next.set(0);
    }
}
