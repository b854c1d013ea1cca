//! Time-aware entity (versioned unit) model definition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    attributes::{
        DEFAULT_UNIQUE_DESIGNATION, DEFAULT_WKID, MSG_ACTION_UPDATE, MSG_TYPE_POSITION_REPORT,
    },
    AttributeKey, Attributes, EntityId, PhaseId, TimeExtent,
};

/// A geographic unit whose position can differ from phase to phase.
///
/// Presence across phases is a single contiguous lifetime
/// (`visible_time_extent`); per-phase geometry lives in
/// `phase_control_points`. The `_control_points` attribute always holds the
/// geometry of whichever phase is currently selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeAwareEntity {
    /// Stable identity, assigned at creation
    pub id: EntityId,

    /// Live attribute state for the selected phase
    pub attributes: Attributes,

    /// Lifetime across all phases the entity appears in
    pub visible_time_extent: TimeExtent,

    /// Control points recorded for each phase the entity was edited in
    #[serde(default)]
    pub phase_control_points: BTreeMap<PhaseId, String>,
}

impl TimeAwareEntity {
    /// Creates a unit with the default attribute set, alive during `extent`
    /// and positioned at `control_points` in `phase`.
    pub fn new(
        symbol_code: &str,
        control_points: String,
        extent: TimeExtent,
        phase: PhaseId,
    ) -> Self {
        let mut attributes = Attributes::new();
        attributes.insert(AttributeKey::Type, MSG_TYPE_POSITION_REPORT);
        attributes.insert(AttributeKey::Action, MSG_ACTION_UPDATE);
        attributes.insert(AttributeKey::Wkid, DEFAULT_WKID);
        attributes.insert(AttributeKey::SymbolCode, symbol_code);
        attributes.insert(AttributeKey::UniqueDesignation, DEFAULT_UNIQUE_DESIGNATION);
        attributes.insert(AttributeKey::ControlPoints, control_points.clone());

        let mut phase_control_points = BTreeMap::new();
        phase_control_points.insert(phase, control_points);

        Self {
            id: EntityId::new(),
            attributes,
            visible_time_extent: extent,
            phase_control_points,
        }
    }

    /// Symbol identification code, if set.
    pub fn symbol_code(&self) -> Option<&str> {
        self.attributes.get(&AttributeKey::SymbolCode)
    }

    /// Live control points for the selected phase, if set.
    pub fn control_points(&self) -> Option<&str> {
        self.attributes.get(&AttributeKey::ControlPoints)
    }

    /// Overwrites the live control points and records them for `phase`.
    ///
    /// An existing entry for `phase` is replaced; otherwise one is inserted.
    pub fn store_control_points(&mut self, phase: PhaseId, control_points: String) {
        self.attributes
            .insert(AttributeKey::ControlPoints, control_points.clone());
        self.phase_control_points.insert(phase, control_points);
    }

    /// Makes the control points recorded for `phase` the live ones.
    ///
    /// Returns false, leaving the live value unchanged, when no entry exists
    /// for `phase`.
    pub fn apply_phase(&mut self, phase: &PhaseId) -> bool {
        match self.phase_control_points.get(phase) {
            Some(control_points) => {
                self.attributes
                    .insert(AttributeKey::ControlPoints, control_points.clone());
                true
            }
            None => false,
        }
    }

    /// Copies the live control points into `phase`'s entry.
    pub fn seed_phase(&mut self, phase: PhaseId) {
        if let Some(current) = self.control_points().map(str::to_string) {
            self.phase_control_points.insert(phase, current);
        }
    }

    /// Returns true when the entity is alive during `extent`.
    pub fn is_visible_in(&self, extent: &TimeExtent) -> bool {
        self.visible_time_extent.intersects(extent)
    }
}
