//! Mission phase model definition.

use serde::{Deserialize, Serialize};

use super::{PhaseId, TimeExtent};

/// A named, time-bounded stage of a mission plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MissionPhase {
    /// Unique identifier, generated when the phase is added
    pub id: PhaseId,

    /// Display name of the phase
    pub name: String,

    /// Time window the phase covers
    pub time_extent: TimeExtent,
}

impl MissionPhase {
    /// Creates a phase with a freshly generated identifier.
    pub fn new(name: impl Into<String>, time_extent: TimeExtent) -> Self {
        Self {
            id: PhaseId::new(),
            name: name.into(),
            time_extent,
        }
    }
}
