//! Async planner facade over the mission store.
//!
//! The [`Planner`] addresses missions by name. Each call opens the database
//! on a blocking thread, loads the mission into a
//! [`MissionSession`](crate::session::MissionSession) positioned at the phase
//! that was selected when it was last saved, applies one operation, and
//! writes the mission back. Loading and saving share one immediate
//! transaction, so concurrent calls on the same database are serialized. A
//! failed operation writes nothing.
//!
//! ```text
//! Planner::select_phase ──▶ spawn_blocking ──▶ Database::update_mission
//!                                               ├─ load
//!                                               ├─ MissionSession::select_phase
//!                                               └─ save
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Planner`] instances
//! - [`mission_ops`]: Whole-mission operations (show, list, import, export)
//! - [`phase_ops`]: Phase sequence and navigation
//! - [`entity_ops`]: Unit placement, movement and removal
//!
//! # Example
//!
//! ```rust
//! use phaseplan_core::{
//!     models::{Geometry, MapPoint},
//!     params::{AddPhase, CreateEntity},
//!     PlannerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some(dir.path().join("plans.db")))
//!     .build()
//!     .await?;
//!
//! planner
//!     .add_phase(&AddPhase {
//!         mission: "Alpha".to_string(),
//!         name: "Approach".to_string(),
//!         start: None,
//!     })
//!     .await?;
//! let unit = planner
//!     .create_entity(&CreateEntity {
//!         mission: "Alpha".to_string(),
//!         symbol_code: "SFGPUCI----K---".to_string(),
//!         geometry: Geometry::Point(MapPoint::new(10.0, 20.0)),
//!     })
//!     .await?;
//! assert_eq!(unit.control_points(), Some("10,20"));
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use log::debug;
use tokio::task;

use crate::{
    config::MissionConfig,
    db::Database,
    error::{MissionError, Result},
    models::Mission,
    session::MissionSession,
};

pub mod builder;
pub mod entity_ops;
pub mod mission_ops;
pub mod phase_ops;


pub use builder::PlannerBuilder;

/// Main planner interface for managing stored missions.
pub struct Planner {
    pub(crate) db_path: PathBuf,
    pub(crate) config: MissionConfig,
}

impl Planner {
    /// Creates a new planner with the specified database path.
    pub(crate) fn new(db_path: PathBuf, config: MissionConfig) -> Self {
        Self { db_path, config }
    }

    /// Path of the SQLite database backing this planner.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Mission configuration applied to every loaded session.
    pub fn config(&self) -> &MissionConfig {
        &self.config
    }

    /// Runs `op` on the named mission and saves the result. A mission that
    /// is not stored yet starts out empty.
    pub(crate) async fn modify<T, F>(&self, mission: &str, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut MissionSession) -> Result<T> + Send + 'static,
    {
        let name = mission.trim().to_string();
        if name.is_empty() {
            return Err(MissionError::invalid_input("mission").with_reason("cannot be empty"));
        }
        let db_path = self.db_path.clone();
        let config = self.config.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.update_mission(&name, |stored| {
                let mut session = match stored {
                    Some(stored) => MissionSession::with_config(stored.mission, config)
                        .restore_phase(stored.current_phase),
                    None => {
                        debug!("starting new mission '{name}'");
                        MissionSession::with_config(Mission::new(name.clone()), config)
                    }
                };

                let value = op(&mut session)?;
                let current_phase = session.current_phase_index();
                Ok((session.into_mission(), current_phase, value))
            })
        })
        .await
        .map_err(|e| MissionError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Runs `op` on the named mission without saving.
    pub(crate) async fn inspect<T, F>(&self, mission: &str, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&MissionSession) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        let config = self.config.clone();
        let name = mission.trim().to_string();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            let stored = db
                .load_mission(&name)?
                .ok_or(MissionError::MissionNotFound { name })?;
            let session = MissionSession::with_config(stored.mission, config)
                .restore_phase(stored.current_phase);
            op(&session)
        })
        .await
        .map_err(|e| MissionError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
