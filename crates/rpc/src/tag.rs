//! Request correlation tags.
//!
//! Every outbound request carries a [`Tag`] that the daemon echoes back in its
//! response. Tags are drawn from a [`TagAllocator`], which is owned by the
//! scope that builds the client(s) rather than living in global state. Several
//! clients can share one allocator through an [`Arc`](std::sync::Arc) so that
//! their tags form a single stream.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Per-request correlation integer, echoed by the daemon.
///
/// Serialised as a bare JSON integer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tag(i64);

impl Tag {
    /// Creates a tag from a raw integer.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------

/// Monotonically increasing tag source, safe to share across tasks.
///
/// The counter is never negative. When an increment would overflow, the
/// counter resets to zero and zero is handed out; it does not wrap into the
/// negative range.
#[derive(Debug, Default)]
pub struct TagAllocator {
    last: Mutex<i64>,
}

impl TagAllocator {
    /// Creates an allocator whose first tag is `1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator that has already handed out `last`.
    ///
    /// The next call to [`next`](Self::next) returns `last + 1`. Negative
    /// seeds are clamped to zero.
    pub fn starting_at(last: i64) -> Self {
        Self {
            last: Mutex::new(last.max(0)),
        }
    }

    /// Allocates the next tag.
    pub fn next(&self) -> Tag {
        let mut last = self.last.lock();
        *last = last.checked_add(1).unwrap_or(0);
        Tag(*last)
    }
}

#[cfg(test)]
#[path = "tag_tests.rs"]
mod tests;
