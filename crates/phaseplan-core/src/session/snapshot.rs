//! Phase-resolved views handed to the rendering side.

use serde::{Deserialize, Serialize};

use super::DeleteOutcome;
use crate::models::{EntityId, Mission, MissionPhase, PhaseId, TimeAwareEntity};

/// The state of every entity visible in one phase, with live attributes
/// resolved for that phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSnapshot {
    /// Position of the phase in the mission
    pub index: usize,

    /// Total number of phases in the mission
    pub phase_count: usize,

    /// The phase the snapshot was resolved for
    pub phase: MissionPhase,

    /// Visible entities, in mission order
    pub entities: Vec<TimeAwareEntity>,
}

impl PhaseSnapshot {
    /// Builds a snapshot of `mission` at phase `index` from its current live
    /// attribute state. Returns `None` if the index is out of range.
    pub(crate) fn capture(mission: &Mission, index: usize) -> Option<Self> {
        let phase = mission.phase(index)?.clone();
        let entities = mission
            .entities_visible_in(&phase.time_extent)
            .cloned()
            .collect();
        Some(Self {
            index,
            phase_count: mission.phase_count(),
            phase,
            entities,
        })
    }

    /// Looks up a visible entity.
    pub fn entity(&self, id: &EntityId) -> Option<&TimeAwareEntity> {
        self.entities.iter().find(|entity| &entity.id == id)
    }

    /// Identifier of the resolved phase.
    pub fn phase_id(&self) -> PhaseId {
        self.phase.id
    }
}

/// Result of deleting a phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseRemoval {
    /// The phase that was removed
    pub phase: MissionPhase,

    /// Entities dropped because they only lived in the removed phase
    pub dropped_entities: Vec<EntityId>,

    /// The newly selected phase, if any phases remain
    pub snapshot: Option<PhaseSnapshot>,
}

/// Result of removing a unit from a phase.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRemoval {
    /// The unit that was removed
    pub id: EntityId,

    /// The phase it was removed from
    pub phase: MissionPhase,

    /// How the unit's lifetime changed
    pub outcome: DeleteOutcome,
}
