//! Mission summary types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Mission, TimeExtent};

/// Summary information about a stored mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionSummary {
    /// Mission name
    pub name: String,
    /// Number of phases
    pub phase_count: u32,
    /// Number of units
    pub entity_count: u32,
    /// Index of the phase selected when the mission was last saved
    pub current_phase: usize,
    /// Span of all phases, if there are any
    pub time_extent: Option<TimeExtent>,
    /// Last save timestamp
    pub updated_at: Timestamp,
}

impl MissionSummary {
    /// Summarizes `mission` as saved at `updated_at`.
    pub fn from_mission(mission: &Mission, current_phase: usize, updated_at: Timestamp) -> Self {
        Self {
            name: mission.name.clone(),
            phase_count: mission.phase_count() as u32,
            entity_count: mission.entities.len() as u32,
            current_phase,
            time_extent: mission.time_extent(),
            updated_at,
        }
    }
}
