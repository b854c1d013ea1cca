//! Whole-mission operations for the Planner.

use log::info;
use serde_json::Value;
use tokio::task;

use super::Planner;
use crate::{
    db::Database,
    display::MissionSummaries,
    document::{geomessages, MissionDocument},
    error::{MissionError, Result},
    models::Mission,
    params::{ImportMission, MissionRef},
    session::MissionSession,
};

impl Planner {
    /// Retrieves a stored mission.
    pub async fn get_mission(&self, params: &MissionRef) -> Result<Mission> {
        self.inspect(&params.mission, |session| Ok(session.mission().clone()))
            .await
    }

    /// Lists all stored missions, ordered by name.
    pub async fn list_missions(&self) -> Result<MissionSummaries> {
        let db_path = self.db_path.clone();

        let summaries = task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_missions()
        })
        .await
        .map_err(|e| MissionError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(MissionSummaries(summaries))
    }

    /// Serializable document of a stored mission.
    pub async fn export_mission(&self, params: &MissionRef) -> Result<MissionDocument> {
        self.inspect(&params.mission, |session| Ok(session.to_document()))
            .await
    }

    /// Geomessages of a stored mission with attributes resolved for its
    /// selected phase.
    pub async fn export_geomessages(&self, params: &MissionRef) -> Result<Value> {
        self.inspect(&params.mission, |session| Ok(geomessages(session.mission())))
            .await
    }

    /// Stores a mission read from a document and selects its first phase.
    ///
    /// The mission is stored under `params.name` when given, otherwise under
    /// the document's name. An existing mission with that name is only
    /// overwritten when `params.replace` is set.
    pub async fn import_mission(&self, params: &ImportMission) -> Result<Mission> {
        let db_path = self.db_path.clone();
        let config = self.config.clone();
        let mut document = params.document.clone();
        if let Some(name) = &params.name {
            document.name = name.clone();
        }
        let name = document.name.trim().to_string();
        if name.is_empty() {
            return Err(MissionError::invalid_input("name").with_reason("cannot be empty"));
        }
        document.name = name.clone();
        let replace = params.replace;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            let mission = db.update_mission(&name, |stored| {
                if stored.is_some() && !replace {
                    return Err(MissionError::invalid_input("name").with_reason(format!(
                        "mission '{name}' already exists, use replace to overwrite it"
                    )));
                }

                let mut session = MissionSession::with_config(Mission::new(name.clone()), config);
                session.load_document(document)?;
                let current_phase = session.current_phase_index();
                let mission = session.into_mission();
                Ok((mission.clone(), current_phase, mission))
            })?;
            info!(
                "imported mission '{name}' with {} phases",
                mission.phase_count()
            );
            Ok(mission)
        })
        .await
        .map_err(|e| MissionError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Deletes a stored mission.
    ///
    /// Returns `MissionError::MissionNotFound` if no mission has that name.
    pub async fn delete_mission(&self, params: &MissionRef) -> Result<()> {
        let db_path = self.db_path.clone();
        let name = params.mission.trim().to_string();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            if db.delete_mission(&name)? {
                Ok(())
            } else {
                Err(MissionError::MissionNotFound { name })
            }
        })
        .await
        .map_err(|e| MissionError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
