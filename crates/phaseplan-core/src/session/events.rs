//! Typed notifications published by a [`MissionSession`](super::MissionSession).

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::models::{EntityId, PhaseId};

/// Capacity of a session's event channel. Slow subscribers miss the oldest
/// events first.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// How deleting an entity from the current phase changed its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The entity lived only in the current phase and is gone
    Deleted,
    /// The entity now starts at the next phase
    StartAdvanced { start: Timestamp },
    /// The entity now ends at the previous phase
    EndRetracted { end: Timestamp },
    /// The entity kept the phases before the current one; the phases after it
    /// now belong to a new entity
    Split { end: Timestamp, successor: EntityId },
}

/// Something that changed in the mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MissionEvent {
    PhaseAdded { index: usize, id: PhaseId },
    PhaseDeleted { index: usize, id: PhaseId },
    PhaseEdited { index: usize, id: PhaseId },
    PhaseSelected { index: usize, id: PhaseId },
    EntityCreated { id: EntityId, phase: PhaseId },
    EntityUpdated { id: EntityId, phase: PhaseId },
    EntityRemovedFromPhase {
        id: EntityId,
        phase: PhaseId,
        outcome: DeleteOutcome,
    },
    MissionLoaded { name: String },
}
