//! Unit operations for the Planner.

use super::Planner;
use crate::{
    error::{MissionError, Result},
    models::{AttributeKey, TimeAwareEntity},
    params::{CreateEntity, EntityRef, MissionRef, SetAttribute, UpdatePosition},
    session::EntityRemoval,
};

impl Planner {
    /// Places a unit in the selected phase of the mission.
    pub async fn create_entity(&self, params: &CreateEntity) -> Result<TimeAwareEntity> {
        let CreateEntity {
            symbol_code,
            geometry,
            ..
        } = params.clone();

        self.modify(&params.mission, move |session| {
            session.create_entity(&symbol_code, &geometry)
        })
        .await
    }

    /// Moves a unit within the selected phase.
    pub async fn update_position(&self, params: &UpdatePosition) -> Result<TimeAwareEntity> {
        let id = params.id;
        let geometry = params.geometry.clone();

        self.modify(&params.mission, move |session| {
            session.update_position(&id, &geometry)
        })
        .await
    }

    /// Sets a non-geometry attribute of a unit visible in the selected phase.
    pub async fn set_attribute(&self, params: &SetAttribute) -> Result<TimeAwareEntity> {
        let id = params.id;
        let key = params.key.trim().to_string();
        if key.is_empty() {
            return Err(MissionError::invalid_input("key").with_reason("cannot be empty"));
        }
        let key = AttributeKey::from(key);
        let value = params.value.clone();

        self.modify(&params.mission, move |session| {
            session.update_attribute(&id, key, &value)
        })
        .await
    }

    /// Removes a unit from the selected phase.
    pub async fn delete_entity(&self, params: &EntityRef) -> Result<EntityRemoval> {
        let id = params.id;

        self.modify(&params.mission, move |session| {
            let phase = session
                .current_phase()
                .cloned()
                .ok_or(MissionError::NoPhases)?;
            let outcome = session.delete_entity(&id)?;
            Ok(EntityRemoval { id, phase, outcome })
        })
        .await
    }

    /// Retrieves a unit with its attributes resolved for the selected phase.
    pub async fn get_entity(&self, params: &EntityRef) -> Result<Option<TimeAwareEntity>> {
        let id = params.id;
        self.inspect(&params.mission, move |session| {
            Ok(session.mission().entity(&id).cloned())
        })
        .await
    }

    /// Lists every unit of the mission, whether or not it is visible in the
    /// selected phase.
    pub async fn list_entities(&self, params: &MissionRef) -> Result<Vec<TimeAwareEntity>> {
        self.inspect(&params.mission, |session| {
            Ok(session.mission().entities.clone())
        })
        .await
    }
}
