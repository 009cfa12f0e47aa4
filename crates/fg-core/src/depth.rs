//! Gather depth: how many foreign-key hops remain eligible for expansion.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of foreign-key hops still eligible for expansion.
///
/// Depth 0 means "bare row, no references resolved". There is no
/// compile-time upper bound; callers that want one enforce it at runtime
/// (see `GatherConfig::max_depth`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GatherDepth(u32);

impl GatherDepth {
    /// Bare row: no references are expanded.
    pub const ZERO: Self = Self(0);

    /// Depth used when a caller does not ask for one.
    pub const DEFAULT: Self = Self(3);

    /// Wrap a raw hop count.
    pub const fn new(depth: u32) -> Self {
        Self(depth)
    }

    /// Raw hop count.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// True when no further references may be expanded.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// One hop less, or `None` at depth 0.
    pub fn child(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }
}

impl Default for GatherDepth {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for GatherDepth {
    fn from(depth: u32) -> Self {
        Self(depth)
    }
}

impl fmt::Display for GatherDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
