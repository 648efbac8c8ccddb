//! Entity version timestamps.
//!
//! An entity is immutable per version; every update produces a new version
//! with a strictly greater timestamp. A plain wall clock cannot guarantee
//! that for two updates landing in the same millisecond, so versions carry
//! a logical counter alongside the physical component.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A version timestamp for one entity revision.
///
/// Totally ordered: first by wall time, then by the logical counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityVersion {
    /// Physical component (milliseconds since Unix epoch).
    wall_time_ms: u64,
    /// Logical counter for versions assigned at the same wall time.
    logical: u32,
}

impl EntityVersion {
    /// The smallest possible version. Drafts that never synced carry no
    /// version; comparisons treat them as this.
    pub const MIN: Self = Self {
        wall_time_ms: 0,
        logical: 0,
    };

    /// Creates a version at the current wall time.
    #[must_use]
    pub fn now() -> Self {
        let wall_time_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_millis() as u64;

        Self {
            wall_time_ms,
            logical: 0,
        }
    }

    /// Creates a version from components.
    #[must_use]
    pub const fn new(wall_time_ms: u64, logical: u32) -> Self {
        Self {
            wall_time_ms,
            logical,
        }
    }

    /// Returns the wall time component in milliseconds since the Unix epoch.
    #[must_use]
    pub const fn wall_time_ms(&self) -> u64 {
        self.wall_time_ms
    }

    /// Returns the logical counter.
    #[must_use]
    pub const fn logical(&self) -> u32 {
        self.logical
    }

    /// Returns the next version, strictly greater than `self` even when the
    /// wall clock has not advanced (or has moved backwards).
    #[must_use]
    pub fn tick(&self) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_millis() as u64;

        if now > self.wall_time_ms {
            Self {
                wall_time_ms: now,
                logical: 0,
            }
        } else {
            Self {
                wall_time_ms: self.wall_time_ms,
                logical: self.logical.saturating_add(1),
            }
        }
    }
}

impl fmt::Display for EntityVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.wall_time_ms, self.logical)
    }
}

impl PartialOrd for EntityVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EntityVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.wall_time_ms.cmp(&other.wall_time_ms) {
            Ordering::Equal => self.logical.cmp(&other.logical),
            other => other,
        }
    }
}
