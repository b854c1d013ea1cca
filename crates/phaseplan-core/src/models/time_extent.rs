//! Time extent value type shared by phases and entity lifetimes.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::{MissionError, Result};

/// A closed time interval `[start, end]` with `start <= end`.
///
/// Overlap tests treat the interior only: two extents that merely touch at a
/// boundary do not intersect. Adjacent phases are separated by a one second
/// gap, so an entity ending in one phase never also appears to start in the
/// next.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeExtent {
    /// Inclusive start instant (UTC)
    pub start: Timestamp,

    /// Inclusive end instant (UTC)
    pub end: Timestamp,
}

impl TimeExtent {
    /// Creates a new extent, rejecting an end that precedes the start.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        if end < start {
            return Err(MissionError::invalid_input("time_extent")
                .with_reason(format!("end {end} precedes start {start}")));
        }
        Ok(Self { start, end })
    }

    /// Creates an extent starting at `start` and lasting `duration`.
    pub fn starting_at(start: Timestamp, duration: SignedDuration) -> Result<Self> {
        let end = shift(start, duration)?;
        Self::new(start, end)
    }

    /// Returns true when the interiors of the two extents overlap.
    pub fn intersects(&self, other: &TimeExtent) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns true when `other` lies entirely within this extent.
    pub fn contains(&self, other: &TimeExtent) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns a new extent with both endpoints shifted by `duration`.
    pub fn offset(&self, duration: SignedDuration) -> Result<Self> {
        Ok(Self {
            start: shift(self.start, duration)?,
            end: shift(self.end, duration)?,
        })
    }

    /// Smallest extent covering both `self` and `other`.
    pub fn union(&self, other: &TimeExtent) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length of the extent.
    pub fn duration(&self) -> SignedDuration {
        self.end.duration_since(self.start)
    }
}

/// Adds a duration to a timestamp, mapping overflow to an input error.
pub(crate) fn shift(at: Timestamp, duration: SignedDuration) -> Result<Timestamp> {
    at.checked_add(duration).map_err(|e| {
        MissionError::invalid_input("time_extent")
            .with_reason(format!("cannot shift {at} by {duration}: {e}"))
    })
}
