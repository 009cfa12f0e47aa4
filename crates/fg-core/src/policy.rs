//! Invalid-reference policy selection.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do when a foreign-key value points at a row that is not in the
/// fetched set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidReferencePolicy {
    /// Drop the whole model containing the dangling reference (and, by
    /// propagation, every ancestor up to the root).
    #[default]
    Omit,
    /// Fail the gather call with an error naming the dangling reference.
    Throw,
    /// Accepted for compatibility; behaves exactly like [`Omit`](Self::Omit).
    Null,
    /// Put `null` in the edge's slot and keep reconstructing.
    Keep,
}

impl InvalidReferencePolicy {
    /// Every policy, in declaration order.
    pub const ALL: [Self; 4] = [Self::Omit, Self::Throw, Self::Null, Self::Keep];

    /// Configuration spelling of the policy.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Omit => "omit",
            Self::Throw => "throw",
            Self::Null => "null",
            Self::Keep => "keep",
        }
    }
}

impl fmt::Display for InvalidReferencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvalidReferencePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::InvalidPolicy {
                value: s.to_string(),
            })
    }
}
