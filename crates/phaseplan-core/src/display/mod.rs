//! Markdown formatting of missions, phases, units and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections and operation outcomes are formatted through newtype wrappers
//! so the same data can be shown differently depending on context.
//!
//! ```text
//! Mission / PhaseSnapshot / TimeAwareEntity ──▶ Display (markdown)
//! CreateResult / UpdateResult / DeleteResult ──▶ summary line + resource
//! MissionSummaries / Phases / Entities       ──▶ lists
//! ```
//!
//! # Example
//!
//! ```rust
//! use phaseplan_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Mission 'Alpha' deleted");
//! assert_eq!(status.to_string(), "Success: Mission 'Alpha' deleted\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Entities, MissionSummaries, Phases};
pub use datetime::{HumanDuration, LocalDateTime};
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
