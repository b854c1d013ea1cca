//! Phase-transition engine.
//!
//! A [`MissionSession`] owns one [`Mission`] together with the index of the
//! currently selected phase and applies every phase and entity operation to
//! it. It keeps three things consistent across operations:
//!
//! - each entity's live `_control_points` matches the selected phase
//! - the selected phase's entry in `phase_control_points` tracks every edit
//! - each entity's lifetime is the tightest interval covering the phases it
//!   is meant to appear in
//!
//! ```text
//!  select_phase ──▶ resolve live attributes from per-phase control points
//!  add_phase    ──▶ carry forward entities ending with the previous phase
//!  delete_entity──▶ delete / advance start / retract end / split lifetime
//! ```
//!
//! Operations are synchronous and run to completion. An operation that
//! returns an error has not changed the mission. Changes are announced on a
//! [`tokio::sync::broadcast`] channel obtained from
//! [`MissionSession::subscribe`].
//!
//! # Example
//!
//! ```rust
//! use jiff::Timestamp;
//! use phaseplan_core::{
//!     models::{Geometry, MapPoint, Mission},
//!     session::MissionSession,
//! };
//!
//! let mut session = MissionSession::new(Mission::new("Example"));
//! let t0 = Timestamp::from_second(0).unwrap();
//!
//! session.add_phase_at("Phase 1", t0).unwrap();
//! let unit = session
//!     .create_entity("SFGPUCI----K---", &Geometry::Point(MapPoint::new(10.0, 20.0)))
//!     .unwrap();
//!
//! session.add_phase_at("Phase 2", t0).unwrap();
//! session
//!     .update_position(&unit.id, &Geometry::Point(MapPoint::new(15.0, 25.0)))
//!     .unwrap();
//!
//! let first = session.select_phase(0).unwrap();
//! assert_eq!(first.entity(&unit.id).unwrap().control_points(), Some("10,20"));
//! ```

use std::sync::Arc;

use log::debug;
use tokio::sync::broadcast;

use crate::{
    config::MissionConfig,
    document::MissionDocument,
    error::{MissionError, Result},
    models::{Mission, MissionPhase},
    symbols::{PatternSymbolDictionary, SymbolDictionary},
};

mod entity_ops;
pub mod events;
mod phase_ops;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use entity_ops::FIRST_PHASE_NAME;
pub use events::{DeleteOutcome, MissionEvent, EVENT_CHANNEL_CAPACITY};
pub use snapshot::{EntityRemoval, PhaseRemoval, PhaseSnapshot};

/// Owns a mission and the currently selected phase.
pub struct MissionSession {
    mission: Mission,
    current_phase: usize,
    config: MissionConfig,
    symbols: Arc<dyn SymbolDictionary>,
    events: broadcast::Sender<MissionEvent>,
}

impl MissionSession {
    /// Creates a session with default configuration, positioned at the first
    /// phase.
    pub fn new(mission: Mission) -> Self {
        Self::with_config(mission, MissionConfig::default())
    }

    /// Creates a session with the given configuration. The symbol dictionary
    /// is built from the configured arrow patterns.
    pub fn with_config(mission: Mission, config: MissionConfig) -> Self {
        let symbols = Arc::new(PatternSymbolDictionary::from_config(&config));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let mut session = Self {
            mission,
            current_phase: 0,
            config,
            symbols,
            events,
        };
        session.resolve_current();
        session
    }

    /// Replaces the symbol dictionary.
    pub fn with_symbol_dictionary(mut self, symbols: Arc<dyn SymbolDictionary>) -> Self {
        self.symbols = symbols;
        self
    }

    /// Positions the session at `index` (clamped to the phase sequence) and
    /// resolves live attributes for it, without announcing a selection.
    pub fn restore_phase(mut self, index: usize) -> Self {
        self.current_phase = index.min(self.mission.phase_count().saturating_sub(1));
        self.resolve_current();
        self
    }

    /// The mission being edited.
    pub fn mission(&self) -> &Mission {
        &self.mission
    }

    /// Consumes the session, returning the mission.
    pub fn into_mission(self) -> Mission {
        self.mission
    }

    /// Active configuration.
    pub fn config(&self) -> &MissionConfig {
        &self.config
    }

    /// Index of the selected phase. Zero when the mission has no phases.
    pub fn current_phase_index(&self) -> usize {
        self.current_phase
    }

    /// The selected phase, if the mission has any.
    pub fn current_phase(&self) -> Option<&MissionPhase> {
        self.mission.phase(self.current_phase)
    }

    /// Subscribes to mission change events.
    pub fn subscribe(&self) -> broadcast::Receiver<MissionEvent> {
        self.events.subscribe()
    }

    /// Phase-resolved state of the selected phase.
    pub fn snapshot(&self) -> Result<PhaseSnapshot> {
        PhaseSnapshot::capture(&self.mission, self.current_phase).ok_or(MissionError::NoPhases)
    }

    /// Serializable document of the whole mission graph.
    pub fn to_document(&self) -> MissionDocument {
        self.mission.to_document()
    }

    /// Replaces the mission with one read from `document`.
    ///
    /// The document is fully validated first; on failure the session is left
    /// untouched. On success the first phase is selected.
    pub fn load_document(&mut self, document: MissionDocument) -> Result<Option<PhaseSnapshot>> {
        let mission = Mission::from_document(document)?;
        let name = mission.name.clone();
        self.mission = mission;
        self.current_phase = 0;
        self.emit(MissionEvent::MissionLoaded { name });

        if self.mission.phase_count() == 0 {
            return Ok(None);
        }
        self.select_phase(0).map(Some)
    }

    /// Replaces the mission with one parsed from a JSON document.
    pub fn load_json(&mut self, json: &str) -> Result<Option<PhaseSnapshot>> {
        let document: MissionDocument = serde_json::from_str(json)?;
        self.load_document(document)
    }

    fn emit(&self, event: MissionEvent) {
        debug!("mission event: {event:?}");
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    fn require_current_phase(&self) -> Result<MissionPhase> {
        self.current_phase().cloned().ok_or(MissionError::NoPhases)
    }
}
