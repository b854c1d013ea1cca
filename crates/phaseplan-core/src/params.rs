//! Parameter structures for planner operations.
//!
//! These carry no interface-specific derives; the CLI defines its own clap
//! argument structs and converts them into these with `From`.
//!
//! Every operation names the mission it applies to. A mission that does not
//! exist in the store yet is created empty on first use.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    document::MissionDocument,
    models::{EntityId, Geometry, DEFAULT_MISSION_NAME},
};

/// Parameters for operations that need only the mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionRef {
    /// Name of the mission
    pub mission: String,
}

impl Default for MissionRef {
    fn default() -> Self {
        Self {
            mission: DEFAULT_MISSION_NAME.to_string(),
        }
    }
}

/// Parameters for appending a phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPhase {
    pub mission: String,
    /// Display name of the new phase
    pub name: String,
    /// Start of the first phase when the mission has none. Defaults to now.
    pub start: Option<Timestamp>,
}

/// Parameters for operations addressing one phase by position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseRef {
    pub mission: String,
    /// Zero-based phase index
    pub index: usize,
}

/// Parameters for renaming a phase or moving its time extent.
///
/// When only one of `start` and `end` is given, the other keeps its
/// current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditPhase {
    pub mission: String,
    /// Zero-based phase index
    pub index: usize,
    pub name: Option<String>,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

/// Parameters for placing a new unit in the selected phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntity {
    pub mission: String,
    /// Symbol identification code
    pub symbol_code: String,
    pub geometry: Geometry,
}

/// Parameters for moving a unit in the selected phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePosition {
    pub mission: String,
    pub id: EntityId,
    pub geometry: Geometry,
}

/// Parameters for setting a non-geometry attribute of a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAttribute {
    pub mission: String,
    pub id: EntityId,
    /// Attribute key as written on the wire, e.g. `uniquedesignation`
    pub key: String,
    pub value: String,
}

/// Parameters for operations addressing one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRef {
    pub mission: String,
    pub id: EntityId,
}

/// Parameters for importing a mission document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportMission {
    /// Store the mission under this name instead of the document's
    pub name: Option<String>,
    pub document: MissionDocument,
    /// Replace a stored mission with the same name
    #[serde(default)]
    pub replace: bool,
}
