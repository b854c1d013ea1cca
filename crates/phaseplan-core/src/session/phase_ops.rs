//! Phase operations for the MissionSession.

use jiff::Timestamp;
use log::{debug, warn};

use super::{MissionEvent, MissionSession, PhaseRemoval, PhaseSnapshot};
use crate::{
    config::PhaseDeletePolicy,
    error::{MissionError, Result},
    models::{EntityId, MissionPhase, TimeExtent},
};

impl MissionSession {
    /// Appends a phase starting now and selects it.
    pub fn add_phase(&mut self, name: &str) -> Result<PhaseSnapshot> {
        self.add_phase_at(name, Timestamp::now())
    }

    /// Appends a phase and selects it. `now` is only used when the mission
    /// has no phases yet.
    ///
    /// Entities whose lifetime ends exactly where the previous last phase
    /// ends are carried into the new phase: their lifetime is extended to the
    /// new phase's end and the new phase is seeded with the control points
    /// they had in the previous phase.
    pub fn add_phase_at(&mut self, name: &str, now: Timestamp) -> Result<PhaseSnapshot> {
        let predecessor = self.mission.phases.last().cloned();
        let index = self.mission.add_phase(name, now, &self.config)?;
        let phase = self.mission.phases[index].clone();

        if let Some(predecessor) = predecessor {
            let mut carried = 0usize;
            for entity in self
                .mission
                .entities
                .iter_mut()
                .filter(|entity| entity.visible_time_extent.end == predecessor.time_extent.end)
            {
                entity.visible_time_extent.end = phase.time_extent.end;
                match entity.phase_control_points.get(&predecessor.id).cloned() {
                    Some(previous) => {
                        entity.phase_control_points.insert(phase.id, previous);
                    }
                    None => entity.seed_phase(phase.id),
                }
                carried += 1;
            }
            debug!("carried {carried} entities into phase '{}'", phase.name);
        }

        self.emit(MissionEvent::PhaseAdded { index, id: phase.id });
        self.select_phase(index)
    }

    /// Selects the phase at `index`, clamped to the phase sequence, and
    /// resolves each visible entity's live control points for it.
    pub fn select_phase(&mut self, index: usize) -> Result<PhaseSnapshot> {
        let count = self.mission.phase_count();
        if count == 0 {
            return Err(MissionError::NoPhases);
        }
        self.current_phase = index.min(count - 1);
        self.resolve_current();

        let snapshot = self.snapshot()?;
        self.emit(MissionEvent::PhaseSelected {
            index: snapshot.index,
            id: snapshot.phase.id,
        });
        Ok(snapshot)
    }

    /// Moves to the next phase. Returns `None` at the last phase.
    pub fn next_phase(&mut self) -> Result<Option<PhaseSnapshot>> {
        if self.current_phase + 1 >= self.mission.phase_count() {
            return Ok(None);
        }
        self.select_phase(self.current_phase + 1).map(Some)
    }

    /// Moves to the previous phase. Returns `None` at the first phase.
    pub fn previous_phase(&mut self) -> Result<Option<PhaseSnapshot>> {
        if self.current_phase == 0 || self.mission.phase_count() == 0 {
            return Ok(None);
        }
        self.select_phase(self.current_phase - 1).map(Some)
    }

    /// Removes the phase at `index`, applying the configured
    /// [`PhaseDeletePolicy`] to entities that referenced it.
    ///
    /// The selection stays on the same phase when possible; when the selected
    /// phase itself is removed, the phase now at that position (or the new
    /// last phase) is selected.
    pub fn delete_phase(&mut self, index: usize) -> Result<PhaseRemoval> {
        self.mission.check_phase_index(index)?;

        let previous = index
            .checked_sub(1)
            .and_then(|i| self.mission.phase(i))
            .cloned();
        let next = self.mission.phase(index + 1).cloned();
        let phase = self.mission.delete_phase(index)?;

        let dropped_entities = match self.config.phase_delete_policy {
            PhaseDeletePolicy::Retain => {
                let dangling = self
                    .mission
                    .entities
                    .iter()
                    .filter(|entity| entity.phase_control_points.contains_key(&phase.id))
                    .count();
                if dangling > 0 {
                    warn!(
                        "phase {} deleted while {dangling} entities still reference it",
                        phase.id
                    );
                }
                Vec::new()
            }
            PhaseDeletePolicy::Purge => {
                self.purge_phase(&phase, previous.as_ref(), next.as_ref())
            }
        };

        self.emit(MissionEvent::PhaseDeleted { index, id: phase.id });

        let snapshot = if self.mission.phase_count() == 0 {
            self.current_phase = 0;
            None
        } else {
            let target = if index < self.current_phase {
                self.current_phase - 1
            } else {
                self.current_phase
            };
            Some(self.select_phase(target)?)
        };

        Ok(PhaseRemoval {
            phase,
            dropped_entities,
            snapshot,
        })
    }

    /// Renames a phase and/or changes its time extent.
    ///
    /// A new extent must be non-empty and stay strictly between the
    /// neighbouring phases, so navigation order always equals time order.
    /// Entity lifetimes that started or ended on the old phase boundaries
    /// follow the new boundaries.
    pub fn edit_phase(
        &mut self,
        index: usize,
        name: Option<&str>,
        extent: Option<TimeExtent>,
    ) -> Result<MissionPhase> {
        self.mission.check_phase_index(index)?;

        if let Some(extent) = extent {
            self.check_phase_extent(index, &extent)?;
        }

        let old_extent = self.mission.phases[index].time_extent;
        if let Some(extent) = extent {
            for entity in &mut self.mission.entities {
                let lifetime = &mut entity.visible_time_extent;
                if lifetime.start == old_extent.start {
                    lifetime.start = extent.start;
                }
                if lifetime.end == old_extent.end {
                    lifetime.end = extent.end;
                }
            }
        }

        let phase = &mut self.mission.phases[index];
        if let Some(name) = name {
            phase.name = name.to_string();
        }
        if let Some(extent) = extent {
            phase.time_extent = extent;
        }
        let phase = phase.clone();

        self.emit(MissionEvent::PhaseEdited { index, id: phase.id });
        if index == self.current_phase {
            self.resolve_current();
        }
        Ok(phase)
    }

    /// Applies the selected phase's control points to every entity visible
    /// in it.
    pub(super) fn resolve_current(&mut self) {
        let Some(phase) = self.mission.phase(self.current_phase).cloned() else {
            return;
        };
        for entity in self
            .mission
            .entities
            .iter_mut()
            .filter(|entity| entity.is_visible_in(&phase.time_extent))
        {
            if !entity.apply_phase(&phase.id) {
                warn!(
                    "control points not found for phase id {} on entity {}",
                    phase.id, entity.id
                );
            }
        }
    }

    fn check_phase_extent(&self, index: usize, extent: &TimeExtent) -> Result<()> {
        if extent.start >= extent.end {
            return Err(MissionError::invalid_input("time_extent")
                .with_reason("phase must end after it starts"));
        }
        if let Some(previous) = index.checked_sub(1).and_then(|i| self.mission.phase(i)) {
            if extent.start <= previous.time_extent.end {
                return Err(MissionError::invalid_input("time_extent").with_reason(format!(
                    "phase must start after '{}' ends at {}",
                    previous.name, previous.time_extent.end
                )));
            }
        }
        if let Some(next) = self.mission.phase(index + 1) {
            if extent.end >= next.time_extent.start {
                return Err(MissionError::invalid_input("time_extent").with_reason(format!(
                    "phase must end before '{}' starts at {}",
                    next.name, next.time_extent.start
                )));
            }
        }
        Ok(())
    }

    /// Removes every trace of `phase` from the entities: its control point
    /// entries, entities that lived only in it, and lifetime boundaries that
    /// fell inside it.
    fn purge_phase(
        &mut self,
        phase: &MissionPhase,
        previous: Option<&MissionPhase>,
        next: Option<&MissionPhase>,
    ) -> Vec<EntityId> {
        let removed = phase.time_extent;
        let inside = |at: Timestamp| removed.start <= at && at <= removed.end;

        for entity in &mut self.mission.entities {
            entity.phase_control_points.remove(&phase.id);

            let lifetime = &mut entity.visible_time_extent;
            if removed.contains(lifetime) {
                continue;
            }
            if inside(lifetime.start) {
                if let Some(next) = next {
                    lifetime.start = next.time_extent.start;
                }
            }
            if inside(lifetime.end) {
                if let Some(previous) = previous {
                    lifetime.end = previous.time_extent.end;
                }
            }
        }

        let phases = &self.mission.phases;
        let orphaned = |lifetime: &TimeExtent| {
            removed.contains(lifetime)
                || !phases.iter().any(|p| p.time_extent.intersects(lifetime))
        };
        let dropped: Vec<EntityId> = self
            .mission
            .entities
            .iter()
            .filter(|entity| orphaned(&entity.visible_time_extent))
            .map(|entity| entity.id)
            .collect();
        self.mission
            .entities
            .retain(|entity| !dropped.contains(&entity.id));

        if !dropped.is_empty() {
            debug!(
                "purged {} entities that only lived in phase {}",
                dropped.len(),
                phase.id
            );
        }
        dropped
    }
}
