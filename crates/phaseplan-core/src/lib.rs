//! Core library for the phaseplan mission planner.
//!
//! A mission is an ordered sequence of phases, each covering a contiguous
//! time span, and a set of units whose lifetime spans one or more phases.
//! Each unit records its own position per phase, so moving it in one phase
//! leaves the others untouched, and removing it from one phase trims or
//! splits its lifetime instead of erasing it everywhere.
//!
//! # Layers
//!
//! - **Domain Models** ([`models`]): missions, phases, time extents and
//!   time-aware entities
//! - **Session** ([`session`]): in-memory editing of one mission with a
//!   selected phase, publishing [`MissionEvent`]s
//! - **Persistence** ([`db`], [`document`]): SQLite storage and the JSON
//!   mission document
//! - **Planner** ([`planner`]): async facade that loads, edits and saves
//!   missions by name
//! - **Display Wrappers** ([`display`]): markdown formatting for terminal
//!   output
//!
//! # Quick Start
//!
//! ```rust
//! use phaseplan_core::{
//!     models::{Geometry, MapPoint},
//!     MissionSession, Mission,
//! };
//!
//! let mut session = MissionSession::new(Mission::new("Operation Example"));
//! session.add_phase("Approach")?;
//! let unit = session.create_entity(
//!     "SFGPUCI----K---",
//!     &Geometry::Point(MapPoint::new(10.0, 20.0)),
//! )?;
//!
//! session.add_phase("Assault")?;
//! session.update_position(&unit.id, &Geometry::Point(MapPoint::new(15.0, 25.0)))?;
//!
//! let approach = session.select_phase(0)?;
//! assert_eq!(approach.entity(&unit.id).and_then(|u| u.control_points()), Some("10,20"));
//! # Ok::<(), phaseplan_core::MissionError>(())
//! ```

pub mod config;
pub mod db;
pub mod display;
pub mod document;
pub mod error;
pub mod models;
pub mod params;
pub mod planner;
pub mod session;
pub mod symbols;

// Re-export commonly used types
pub use config::{MissionConfig, PhaseDeletePolicy};
pub use db::Database;
pub use display::{
    CreateResult, DeleteResult, Entities, MissionSummaries, OperationStatus, Phases, UpdateResult,
};
pub use document::MissionDocument;
pub use error::{MissionError, Result};
pub use models::{
    EntityId, Geometry, MapPoint, Mission, MissionPhase, MissionSummary, PhaseId, TimeAwareEntity,
    TimeExtent,
};
pub use planner::{Planner, PlannerBuilder};
pub use session::{MissionEvent, MissionSession, PhaseSnapshot};
