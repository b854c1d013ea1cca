//! Entity operations for the MissionSession.

use std::collections::BTreeMap;

use jiff::Timestamp;
use log::debug;

use super::{DeleteOutcome, MissionEvent, MissionSession};
use crate::{
    error::{MissionError, Result},
    models::{
        AttributeKey, EntityId, Geometry, MissionPhase, PhaseId, TimeAwareEntity, TimeExtent,
    },
};

/// Name of the phase added automatically when the first unit is placed.
pub const FIRST_PHASE_NAME: &str = "Phase 1";

impl MissionSession {
    /// Places a new unit in the selected phase.
    ///
    /// The unit's lifetime is the selected phase's extent and its geometry is
    /// recorded as that phase's control points. When the mission has no
    /// phases and `auto_create_first_phase` is set, a first phase is added.
    pub fn create_entity(
        &mut self,
        symbol_code: &str,
        geometry: &Geometry,
    ) -> Result<TimeAwareEntity> {
        let symbol_code = symbol_code.trim();
        if symbol_code.is_empty() {
            return Err(MissionError::invalid_input("symbol_code").with_reason("cannot be empty"));
        }
        let control_points = self.encode(symbol_code, geometry)?;

        if self.mission.phase_count() == 0 {
            if !self.config.auto_create_first_phase {
                return Err(MissionError::NoPhases);
            }
            self.add_phase_at(FIRST_PHASE_NAME, Timestamp::now())?;
        }
        let phase = self.require_current_phase()?;

        let entity = TimeAwareEntity::new(symbol_code, control_points, phase.time_extent, phase.id);
        self.mission.entities.push(entity.clone());

        self.emit(MissionEvent::EntityCreated {
            id: entity.id,
            phase: phase.id,
        });
        Ok(entity)
    }

    /// Moves a unit within the selected phase.
    ///
    /// Other phases keep whatever control points they already recorded.
    pub fn update_position(&mut self, id: &EntityId, geometry: &Geometry) -> Result<TimeAwareEntity> {
        let phase = self.require_current_phase()?;
        let symbol_code = self
            .visible_entity(id, &phase)?
            .symbol_code()
            .unwrap_or_default()
            .to_string();
        let control_points = self.encode(&symbol_code, geometry)?;

        let entity = self
            .mission
            .entity_mut(id)
            .ok_or_else(|| entity_not_found(id))?;
        entity.store_control_points(phase.id, control_points);
        let entity = entity.clone();

        self.emit(MissionEvent::EntityUpdated { id: *id, phase: phase.id });
        Ok(entity)
    }

    /// Sets a non-geometry attribute on a unit visible in the selected phase.
    ///
    /// Attributes other than control points are not versioned per phase;
    /// the new value applies to every phase the unit appears in.
    pub fn update_attribute(
        &mut self,
        id: &EntityId,
        key: AttributeKey,
        value: &str,
    ) -> Result<TimeAwareEntity> {
        if key == AttributeKey::ControlPoints {
            return Err(MissionError::invalid_input("key")
                .with_reason("control points change through update_position"));
        }
        let phase = self.require_current_phase()?;
        self.visible_entity(id, &phase)?;

        let entity = self
            .mission
            .entity_mut(id)
            .ok_or_else(|| entity_not_found(id))?;
        entity.attributes.insert(key, value);
        let entity = entity.clone();

        self.emit(MissionEvent::EntityUpdated { id: *id, phase: phase.id });
        Ok(entity)
    }

    /// Removes a unit from the selected phase.
    ///
    /// | lifetime relative to the phase | effect                               |
    /// |--------------------------------|--------------------------------------|
    /// | inside                         | unit deleted                         |
    /// | continues into later phases    | start moves to the next phase        |
    /// | began in earlier phases        | end moves back to the previous phase |
    /// | both                           | split into two units                 |
    ///
    /// A neighbouring phase only counts when it exists and still overlaps the
    /// lifetime. A lifetime can outlast its phases after a retained phase
    /// deletion, and the remainder on such a side is dropped. When neither
    /// side counts the unit is deleted.
    pub fn delete_entity(&mut self, id: &EntityId) -> Result<DeleteOutcome> {
        let phase = self.require_current_phase()?;
        let lifetime = self.visible_entity(id, &phase)?.visible_time_extent;

        let index = self.current_phase;
        let previous = index
            .checked_sub(1)
            .and_then(|i| self.mission.phase(i))
            .filter(|p| {
                lifetime.start < phase.time_extent.start && p.time_extent.intersects(&lifetime)
            })
            .cloned();
        let next = self
            .mission
            .phase(index + 1)
            .filter(|p| {
                lifetime.end > phase.time_extent.end && p.time_extent.intersects(&lifetime)
            })
            .cloned();

        let outcome = match (previous, next) {
            (Some(previous), Some(next)) => self.split_entity(id, &previous, &next)?,
            (None, Some(next)) => {
                let remaining = TimeExtent::new(next.time_extent.start, lifetime.end)?;
                let entity = self.mission.entity_mut(id).ok_or_else(|| entity_not_found(id))?;
                entity.visible_time_extent = remaining;
                entity.phase_control_points.remove(&phase.id);
                DeleteOutcome::StartAdvanced {
                    start: remaining.start,
                }
            }
            (Some(previous), None) => {
                let remaining = TimeExtent::new(lifetime.start, previous.time_extent.end)?;
                let entity = self.mission.entity_mut(id).ok_or_else(|| entity_not_found(id))?;
                entity.visible_time_extent = remaining;
                entity.phase_control_points.remove(&phase.id);
                DeleteOutcome::EndRetracted {
                    end: remaining.end,
                }
            }
            (None, None) => {
                self.mission.remove_entity(id);
                DeleteOutcome::Deleted
            }
        };

        debug!("removed entity {id} from phase '{}': {outcome:?}", phase.name);
        self.emit(MissionEvent::EntityRemovedFromPhase {
            id: *id,
            phase: phase.id,
            outcome,
        });
        Ok(outcome)
    }

    /// Cuts the selected phase out of a lifetime that spans it. The original
    /// unit keeps the earlier part; a new unit takes the later part along with
    /// the control points recorded for its phases.
    fn split_entity(
        &mut self,
        id: &EntityId,
        previous: &MissionPhase,
        next: &MissionPhase,
    ) -> Result<DeleteOutcome> {
        let entity = self.mission.entity(id).ok_or_else(|| entity_not_found(id))?;

        let earlier = TimeExtent::new(entity.visible_time_extent.start, previous.time_extent.end)?;
        let later = TimeExtent::new(next.time_extent.start, entity.visible_time_extent.end)?;

        let mut kept = BTreeMap::new();
        let mut moved = BTreeMap::new();
        for (phase_id, control_points) in &entity.phase_control_points {
            match self.phase_extent(phase_id) {
                Some(extent) if extent.intersects(&later) => {
                    moved.insert(*phase_id, control_points.clone());
                }
                Some(extent) if !extent.intersects(&earlier) => {}
                _ => {
                    kept.insert(*phase_id, control_points.clone());
                }
            }
        }

        let mut successor = TimeAwareEntity {
            id: EntityId::new(),
            attributes: entity.attributes.clone(),
            visible_time_extent: later,
            phase_control_points: moved,
        };
        successor.apply_phase(&next.id);
        let successor_id = successor.id;

        let entity = self.mission.entity_mut(id).ok_or_else(|| entity_not_found(id))?;
        entity.visible_time_extent = earlier;
        entity.phase_control_points = kept;
        self.mission.entities.push(successor);

        self.emit(MissionEvent::EntityCreated {
            id: successor_id,
            phase: next.id,
        });
        Ok(DeleteOutcome::Split {
            end: earlier.end,
            successor: successor_id,
        })
    }

    fn phase_extent(&self, id: &PhaseId) -> Option<TimeExtent> {
        self.mission
            .phase_index(id)
            .and_then(|index| self.mission.phase(index))
            .map(|phase| phase.time_extent)
    }

    fn visible_entity(&self, id: &EntityId, phase: &MissionPhase) -> Result<&TimeAwareEntity> {
        let entity = self.mission.entity(id).ok_or_else(|| entity_not_found(id))?;
        if !entity.is_visible_in(&phase.time_extent) {
            return Err(MissionError::EntityNotInPhase {
                id: id.to_string(),
                phase: phase.name.clone(),
            });
        }
        Ok(entity)
    }

    fn encode(&self, symbol_code: &str, geometry: &Geometry) -> Result<String> {
        let shape = self.symbols.draw_shape(symbol_code);
        geometry.to_control_points(shape)
    }
}

fn entity_not_found(id: &EntityId) -> MissionError {
    MissionError::EntityNotFound { id: id.to_string() }
}
