//! Data models for missions, phases and time-aware entities.
//!
//! This module contains the core domain models of the phase planning system.
//! Display implementations for these models are located in
//! [`crate::display::models`] to keep presentation out of the data types.
//!
//! # Model Overview
//!
//! ```text
//! Mission
//! ├── phases: [MissionPhase { id, name, time_extent }]   (navigation order)
//! └── entities: [TimeAwareEntity]
//!     ├── attributes            live state for the selected phase
//!     ├── visible_time_extent   one contiguous lifetime across phases
//!     └── phase_control_points  phase id -> geometry recorded in that phase
//! ```
//!
//! An entity never stores an explicit list of phases it belongs to. It is
//! visible in a phase when its lifetime intersects the phase's
//! [`TimeExtent`], and its geometry for that phase comes from the sparse
//! per-phase map.
//!
//! # Examples
//!
//! ```rust
//! use jiff::Timestamp;
//! use phaseplan_core::{config::MissionConfig, models::Mission};
//!
//! let mut mission = Mission::new("Operation Example");
//! let config = MissionConfig::default();
//! let now = Timestamp::from_second(0).unwrap();
//!
//! mission.add_phase("Phase 1", now, &config).unwrap();
//! mission.add_phase("Phase 2", now, &config).unwrap();
//!
//! let second = mission.phase(1).unwrap();
//! assert_eq!(second.time_extent.start, Timestamp::from_second(3600).unwrap());
//! assert_eq!(second.time_extent.end, Timestamp::from_second(7199).unwrap());
//! ```

pub mod attributes;
pub mod entity;
pub mod geometry;
pub mod ids;
pub mod mission;
pub mod phase;
pub mod summary;
pub mod time_extent;


pub use attributes::{Attribute, AttributeKey, Attributes};
pub use entity::TimeAwareEntity;
pub use geometry::{parse_control_points, DrawShape, Geometry, MapPoint};
pub use ids::{EntityId, PhaseId};
pub use mission::{Mission, DEFAULT_MISSION_NAME};
pub use phase::MissionPhase;
pub use summary::MissionSummary;
pub use time_extent::TimeExtent;
