//! Phase operations for the Planner.

use jiff::Timestamp;

use super::Planner;
use crate::{
    display::Phases,
    error::Result,
    models::{MissionPhase, TimeExtent},
    params::{AddPhase, EditPhase, MissionRef, PhaseRef},
    session::{PhaseRemoval, PhaseSnapshot},
};

impl Planner {
    /// Appends a phase to the mission and selects it.
    ///
    /// The first phase of a mission starts at `params.start`, or now when
    /// unset. Later phases follow the last one after the configured gap.
    pub async fn add_phase(&self, params: &AddPhase) -> Result<PhaseSnapshot> {
        let name = params.name.clone();
        let start = params.start.unwrap_or_else(Timestamp::now);

        self.modify(&params.mission, move |session| {
            session.add_phase_at(&name, start)
        })
        .await
    }

    /// Lists the mission's phases, marking the selected one.
    pub async fn list_phases(&self, params: &MissionRef) -> Result<Phases> {
        self.inspect(&params.mission, |session| {
            Ok(Phases::new(
                session.mission().phases.clone(),
                session.current_phase_index(),
            ))
        })
        .await
    }

    /// Selects the phase at `params.index`, clamped to the phase sequence.
    pub async fn select_phase(&self, params: &PhaseRef) -> Result<PhaseSnapshot> {
        let index = params.index;
        self.modify(&params.mission, move |session| session.select_phase(index))
            .await
    }

    /// Moves to the next phase. Returns `None` at the last phase.
    pub async fn next_phase(&self, params: &MissionRef) -> Result<Option<PhaseSnapshot>> {
        self.modify(&params.mission, |session| session.next_phase())
            .await
    }

    /// Moves to the previous phase. Returns `None` at the first phase.
    pub async fn previous_phase(&self, params: &MissionRef) -> Result<Option<PhaseSnapshot>> {
        self.modify(&params.mission, |session| session.previous_phase())
            .await
    }

    /// Removes the phase at `params.index`.
    pub async fn delete_phase(&self, params: &PhaseRef) -> Result<PhaseRemoval> {
        let index = params.index;
        self.modify(&params.mission, move |session| session.delete_phase(index))
            .await
    }

    /// Renames a phase and/or moves its time extent. An omitted bound keeps
    /// its current value.
    pub async fn edit_phase(&self, params: &EditPhase) -> Result<MissionPhase> {
        let EditPhase {
            index,
            name,
            start,
            end,
            ..
        } = params.clone();

        self.modify(&params.mission, move |session| {
            let extent = if start.is_some() || end.is_some() {
                session.mission().check_phase_index(index)?;
                let current = session.mission().phases[index].time_extent;
                Some(TimeExtent::new(
                    start.unwrap_or(current.start),
                    end.unwrap_or(current.end),
                )?)
            } else {
                None
            };
            session.edit_phase(index, name.as_deref(), extent)
        })
        .await
    }

    /// Phase-resolved view of the selected phase.
    pub async fn current_phase(&self, params: &MissionRef) -> Result<PhaseSnapshot> {
        self.inspect(&params.mission, |session| session.snapshot())
            .await
    }
}
