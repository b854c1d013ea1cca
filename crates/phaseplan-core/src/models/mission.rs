//! Mission model: the ordered phase sequence plus its entities.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use super::{
    time_extent::shift, EntityId, MissionPhase, PhaseId, TimeAwareEntity, TimeExtent,
};
use crate::{
    config::MissionConfig,
    error::{MissionError, Result},
};

/// Name given to missions created without one.
pub const DEFAULT_MISSION_NAME: &str = "Default Mission";

/// A mission plan: ordered phases and the units placed on them.
///
/// Phase order is insertion order and defines navigation order. Entities
/// refer to phases only through the phase IDs in their per-phase control
/// points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mission {
    /// Mission name
    pub name: String,

    /// Phases in navigation order
    #[serde(default)]
    pub phases: Vec<MissionPhase>,

    /// Units placed on the plan
    #[serde(default)]
    pub entities: Vec<TimeAwareEntity>,
}

impl Default for Mission {
    fn default() -> Self {
        Self::new(DEFAULT_MISSION_NAME)
    }
}

impl Mission {
    /// Creates an empty mission.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phases: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Appends a phase and returns its index.
    ///
    /// The first phase starts at `now`; every later phase starts one gap
    /// after the previous phase ends and runs until the previous extent
    /// offset by the configured phase offset.
    pub fn add_phase(
        &mut self,
        name: impl Into<String>,
        now: Timestamp,
        config: &MissionConfig,
    ) -> Result<usize> {
        let extent = match self.phases.last() {
            Some(previous) => {
                let previous = previous.time_extent;
                let start = shift(previous.end, SignedDuration::from_secs(config.phase_gap_secs))?;
                let end = previous
                    .offset(SignedDuration::from_secs(config.phase_offset_secs))?
                    .end;
                TimeExtent::new(start, end)?
            }
            None => TimeExtent::starting_at(
                now,
                SignedDuration::from_secs(config.first_phase_duration_secs),
            )?,
        };

        self.phases.push(MissionPhase::new(name, extent));
        Ok(self.phases.len() - 1)
    }

    /// Removes and returns the phase at `index`.
    ///
    /// Entity lifetimes and per-phase control points are not touched here;
    /// see `MissionSession::delete_phase` for the configurable clean-up.
    pub fn delete_phase(&mut self, index: usize) -> Result<MissionPhase> {
        self.check_phase_index(index)?;
        Ok(self.phases.remove(index))
    }

    /// Returns the phase at `index`.
    pub fn phase(&self, index: usize) -> Option<&MissionPhase> {
        self.phases.get(index)
    }

    /// Returns the position of the phase with `id`.
    pub fn phase_index(&self, id: &PhaseId) -> Option<usize> {
        self.phases.iter().position(|phase| &phase.id == id)
    }

    /// Number of phases.
    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Errors unless `index` addresses an existing phase.
    pub fn check_phase_index(&self, index: usize) -> Result<()> {
        if self.phases.is_empty() {
            return Err(MissionError::NoPhases);
        }
        if index >= self.phases.len() {
            return Err(MissionError::PhaseIndexOutOfRange {
                index,
                count: self.phases.len(),
            });
        }
        Ok(())
    }

    /// Returns the entity with `id`.
    pub fn entity(&self, id: &EntityId) -> Option<&TimeAwareEntity> {
        self.entities.iter().find(|entity| &entity.id == id)
    }

    /// Returns the entity with `id` for mutation.
    pub fn entity_mut(&mut self, id: &EntityId) -> Option<&mut TimeAwareEntity> {
        self.entities.iter_mut().find(|entity| &entity.id == id)
    }

    /// Removes and returns the entity with `id`.
    pub fn remove_entity(&mut self, id: &EntityId) -> Option<TimeAwareEntity> {
        let position = self.entities.iter().position(|entity| &entity.id == id)?;
        Some(self.entities.remove(position))
    }

    /// Entities alive during `extent`, in insertion order.
    pub fn entities_visible_in<'a>(
        &'a self,
        extent: &'a TimeExtent,
    ) -> impl Iterator<Item = &'a TimeAwareEntity> + 'a {
        self.entities
            .iter()
            .filter(move |entity| entity.is_visible_in(extent))
    }

    /// Span of the whole mission, from the earliest phase start to the latest
    /// phase end.
    pub fn time_extent(&self) -> Option<TimeExtent> {
        self.phases
            .iter()
            .map(|phase| phase.time_extent)
            .reduce(|acc, extent| acc.union(&extent))
    }

    /// First and last phase index during which `entity` is visible.
    pub fn phase_span(&self, entity: &TimeAwareEntity) -> Option<(usize, usize)> {
        let mut visible = self
            .phases
            .iter()
            .enumerate()
            .filter(|(_, phase)| entity.is_visible_in(&phase.time_extent))
            .map(|(index, _)| index);
        let first = visible.next()?;
        let last = visible.last().unwrap_or(first);
        Some((first, last))
    }

    /// Phase IDs referenced by entities that no longer exist in the phase
    /// sequence.
    pub fn dangling_phase_references(&self) -> Vec<(EntityId, PhaseId)> {
        self.entities
            .iter()
            .flat_map(|entity| {
                entity
                    .phase_control_points
                    .keys()
                    .filter(|id| self.phase_index(id).is_none())
                    .map(move |id| (entity.id, *id))
            })
            .collect()
    }
}
