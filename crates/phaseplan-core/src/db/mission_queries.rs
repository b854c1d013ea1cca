//! Mission save/load queries.

use std::{
    collections::{BTreeMap, HashMap},
    str::FromStr,
};

use jiff::Timestamp;
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row, TransactionBehavior};

use crate::{
    error::{DatabaseResultExt, Result},
    models::{
        AttributeKey, Attributes, EntityId, Mission, MissionPhase, MissionSummary, PhaseId,
        TimeAwareEntity, TimeExtent,
    },
};

const UPSERT_MISSION_SQL: &str = "INSERT INTO missions (name, current_phase, created_at, updated_at) VALUES (?1, ?2, ?3, ?3) \
     ON CONFLICT(name) DO UPDATE SET current_phase = excluded.current_phase, updated_at = excluded.updated_at";
const SELECT_MISSION_ID_SQL: &str = "SELECT id FROM missions WHERE name = ?1";
const SELECT_MISSION_SQL: &str =
    "SELECT id, current_phase, updated_at FROM missions WHERE name = ?1";
const DELETE_MISSION_SQL: &str = "DELETE FROM missions WHERE name = ?1";

const DELETE_CONTROL_POINTS_SQL: &str = "DELETE FROM phase_control_points WHERE mission_id = ?1";
const DELETE_ATTRIBUTES_SQL: &str = "DELETE FROM entity_attributes WHERE mission_id = ?1";
const DELETE_ENTITIES_SQL: &str = "DELETE FROM entities WHERE mission_id = ?1";
const DELETE_PHASES_SQL: &str = "DELETE FROM phases WHERE mission_id = ?1";

const INSERT_PHASE_SQL: &str = "INSERT INTO phases (mission_id, id, position, name, start_time, end_time) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const INSERT_ENTITY_SQL: &str = "INSERT INTO entities (mission_id, id, position, visible_start, visible_end) VALUES (?1, ?2, ?3, ?4, ?5)";
const INSERT_ATTRIBUTE_SQL: &str = "INSERT INTO entity_attributes (mission_id, entity_id, position, key, value) VALUES (?1, ?2, ?3, ?4, ?5)";
const INSERT_CONTROL_POINTS_SQL: &str = "INSERT INTO phase_control_points (mission_id, entity_id, phase_id, control_points) VALUES (?1, ?2, ?3, ?4)";

const SELECT_PHASES_SQL: &str = "SELECT id, name, start_time, end_time FROM phases WHERE mission_id = ?1 ORDER BY position";
const SELECT_ENTITIES_SQL: &str = "SELECT id, visible_start, visible_end FROM entities WHERE mission_id = ?1 ORDER BY position";
const SELECT_ATTRIBUTES_SQL: &str = "SELECT entity_id, key, value FROM entity_attributes WHERE mission_id = ?1 ORDER BY entity_id, position";
const SELECT_CONTROL_POINTS_SQL: &str = "SELECT entity_id, phase_id, control_points FROM phase_control_points WHERE mission_id = ?1";

const SELECT_SUMMARIES_SQL: &str = "SELECT id, name, phase_count, entity_count, current_phase, updated_at FROM mission_summaries ORDER BY name";
const SELECT_PHASE_EXTENTS_SQL: &str =
    "SELECT start_time, end_time FROM phases WHERE mission_id = ?1";

/// A mission as read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMission {
    pub mission: Mission,
    /// Phase selected when the mission was saved
    pub current_phase: usize,
    pub updated_at: Timestamp,
}

impl super::Database {
    /// Writes the whole graph of `mission`, replacing any earlier save under
    /// the same name, and returns the save timestamp.
    pub fn save_mission(&mut self, mission: &Mission, current_phase: usize) -> Result<Timestamp> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;
        let now = write_mission(&tx, mission, current_phase)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(now)
    }

    /// Loads the mission saved under `name`, hands it to `update` and saves
    /// the mission it returns, all in one immediate transaction. Concurrent
    /// updates of the same database wait for each other. Nothing is written
    /// when `update` fails.
    pub fn update_mission<T, F>(&mut self, name: &str, update: F) -> Result<T>
    where
        F: FnOnce(Option<StoredMission>) -> Result<(Mission, usize, T)>,
    {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;
        let stored = read_mission(&tx, name)?;
        let (mission, current_phase, value) = update(stored)?;
        write_mission(&tx, &mission, current_phase)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(value)
    }

    /// Reads back the mission saved under `name`.
    pub fn load_mission(&self, name: &str) -> Result<Option<StoredMission>> {
        read_mission(&self.connection, name)
    }

    /// Summaries of every stored mission, ordered by name.
    pub fn list_missions(&self) -> Result<Vec<MissionSummary>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_SUMMARIES_SQL)
            .db_context("Failed to prepare mission summary query")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    MissionSummary {
                        name: row.get(1)?,
                        phase_count: row.get(2)?,
                        entity_count: row.get(3)?,
                        current_phase: usize::try_from(row.get::<_, i64>(4)?).unwrap_or_default(),
                        time_extent: None,
                        updated_at: parse_column(row, 5)?,
                    },
                ))
            })
            .db_context("Failed to query mission summaries")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read mission summaries")?;

        rows.into_iter()
            .map(|(mission_id, mut summary)| -> Result<MissionSummary> {
                summary.time_extent = mission_extent(&self.connection, mission_id)?;
                Ok(summary)
            })
            .collect()
    }

    /// Deletes the mission saved under `name`. Returns false if there was
    /// none.
    pub fn delete_mission(&mut self, name: &str) -> Result<bool> {
        let affected = self
            .connection
            .execute(DELETE_MISSION_SQL, params![name])
            .db_context("Failed to delete mission")?;
        Ok(affected > 0)
    }
}

/// Replaces the stored graph of `mission` within the caller's transaction.
fn write_mission(conn: &Connection, mission: &Mission, current_phase: usize) -> Result<Timestamp> {
    let now = Timestamp::now();
    conn.execute(
        UPSERT_MISSION_SQL,
        params![&mission.name, current_phase as i64, now.to_string()],
    )
    .db_context("Failed to upsert mission")?;

    let mission_id: i64 = conn
        .query_row(SELECT_MISSION_ID_SQL, params![&mission.name], |row| row.get(0))
        .db_context("Failed to query mission id")?;

    for sql in [
        DELETE_CONTROL_POINTS_SQL,
        DELETE_ATTRIBUTES_SQL,
        DELETE_ENTITIES_SQL,
        DELETE_PHASES_SQL,
    ] {
        conn.execute(sql, params![mission_id])
            .db_context("Failed to clear previous mission state")?;
    }

    {
        let mut insert_phase = conn
            .prepare(INSERT_PHASE_SQL)
            .db_context("Failed to prepare phase insert")?;
        for (position, phase) in mission.phases.iter().enumerate() {
            insert_phase
                .execute(params![
                    mission_id,
                    phase.id.to_string(),
                    position as i64,
                    &phase.name,
                    phase.time_extent.start.to_string(),
                    phase.time_extent.end.to_string(),
                ])
                .db_context("Failed to insert phase")?;
        }

        let mut insert_entity = conn
            .prepare(INSERT_ENTITY_SQL)
            .db_context("Failed to prepare entity insert")?;
        let mut insert_attribute = conn
            .prepare(INSERT_ATTRIBUTE_SQL)
            .db_context("Failed to prepare attribute insert")?;
        let mut insert_control_points = conn
            .prepare(INSERT_CONTROL_POINTS_SQL)
            .db_context("Failed to prepare control points insert")?;

        for (position, entity) in mission.entities.iter().enumerate() {
            let entity_id = entity.id.to_string();
            insert_entity
                .execute(params![
                    mission_id,
                    &entity_id,
                    position as i64,
                    entity.visible_time_extent.start.to_string(),
                    entity.visible_time_extent.end.to_string(),
                ])
                .db_context("Failed to insert entity")?;

            for (position, attribute) in entity.attributes.iter().enumerate() {
                insert_attribute
                    .execute(params![
                        mission_id,
                        &entity_id,
                        position as i64,
                        attribute.key.as_str(),
                        &attribute.value,
                    ])
                    .db_context("Failed to insert entity attribute")?;
            }

            for (phase_id, control_points) in &entity.phase_control_points {
                insert_control_points
                    .execute(params![
                        mission_id,
                        &entity_id,
                        phase_id.to_string(),
                        control_points,
                    ])
                    .db_context("Failed to insert phase control points")?;
            }
        }
    }

    Ok(now)
}

fn read_mission(conn: &Connection, name: &str) -> Result<Option<StoredMission>> {
    let header = conn
        .query_row(SELECT_MISSION_SQL, params![name], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                parse_column::<Timestamp>(row, 2)?,
            ))
        })
        .optional()
        .db_context("Failed to query mission")?;

    let Some((mission_id, current_phase, updated_at)) = header else {
        return Ok(None);
    };

    let phases = load_phases(conn, mission_id)?;
    let mut attributes = load_attributes(conn, mission_id)?;
    let mut control_points = load_control_points(conn, mission_id)?;

    let mut stmt = conn
        .prepare(SELECT_ENTITIES_SQL)
        .db_context("Failed to prepare entity query")?;
    let entities = stmt
        .query_map(params![mission_id], |row| {
            Ok((
                parse_column::<EntityId>(row, 0)?,
                TimeExtent {
                    start: parse_column(row, 1)?,
                    end: parse_column(row, 2)?,
                },
            ))
        })
        .db_context("Failed to query entities")?
        .map(|row| {
            row.map(|(id, visible_time_extent)| TimeAwareEntity {
                id,
                attributes: attributes.remove(&id).unwrap_or_default(),
                visible_time_extent,
                phase_control_points: control_points.remove(&id).unwrap_or_default(),
            })
        })
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to read entities")?;

    Ok(Some(StoredMission {
        mission: Mission {
            name: name.to_string(),
            phases,
            entities,
        },
        current_phase: usize::try_from(current_phase).unwrap_or_default(),
        updated_at,
    }))
}

fn load_phases(conn: &Connection, mission_id: i64) -> Result<Vec<MissionPhase>> {
    let mut stmt = conn
        .prepare(SELECT_PHASES_SQL)
        .db_context("Failed to prepare phase query")?;
    let phases = stmt
        .query_map(params![mission_id], |row| {
            Ok(MissionPhase {
                id: parse_column(row, 0)?,
                name: row.get(1)?,
                time_extent: TimeExtent {
                    start: parse_column(row, 2)?,
                    end: parse_column(row, 3)?,
                },
            })
        })
        .db_context("Failed to query phases")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to read phases")?;
    Ok(phases)
}

fn load_attributes(conn: &Connection, mission_id: i64) -> Result<HashMap<EntityId, Attributes>> {
    let mut stmt = conn
        .prepare(SELECT_ATTRIBUTES_SQL)
        .db_context("Failed to prepare attribute query")?;
    let rows = stmt
        .query_map(params![mission_id], |row| {
            Ok((
                parse_column::<EntityId>(row, 0)?,
                AttributeKey::from(row.get::<_, String>(1)?),
                row.get::<_, String>(2)?,
            ))
        })
        .db_context("Failed to query entity attributes")?;

    let mut attributes: HashMap<EntityId, Attributes> = HashMap::new();
    for row in rows {
        let (entity_id, key, value) = row.db_context("Failed to read entity attribute")?;
        attributes.entry(entity_id).or_default().insert(key, value);
    }
    Ok(attributes)
}

fn load_control_points(
    conn: &Connection,
    mission_id: i64,
) -> Result<HashMap<EntityId, BTreeMap<PhaseId, String>>> {
    let mut stmt = conn
        .prepare(SELECT_CONTROL_POINTS_SQL)
        .db_context("Failed to prepare control points query")?;
    let rows = stmt
        .query_map(params![mission_id], |row| {
            Ok((
                parse_column::<EntityId>(row, 0)?,
                parse_column::<PhaseId>(row, 1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .db_context("Failed to query phase control points")?;

    let mut control_points: HashMap<EntityId, BTreeMap<PhaseId, String>> = HashMap::new();
    for row in rows {
        let (entity_id, phase_id, value) =
            row.db_context("Failed to read phase control points")?;
        control_points
            .entry(entity_id)
            .or_default()
            .insert(phase_id, value);
    }
    Ok(control_points)
}

fn mission_extent(conn: &Connection, mission_id: i64) -> Result<Option<TimeExtent>> {
    let mut stmt = conn
        .prepare(SELECT_PHASE_EXTENTS_SQL)
        .db_context("Failed to prepare phase extent query")?;
    let extents = stmt
        .query_map(params![mission_id], |row| {
            Ok(TimeExtent {
                start: parse_column(row, 0)?,
                end: parse_column(row, 1)?,
            })
        })
        .db_context("Failed to query phase extents")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to read phase extents")?;
    Ok(extents.into_iter().reduce(|acc, extent| acc.union(&extent)))
}

/// Reads a text column and parses it, reporting parse failures as column
/// conversion errors.
fn parse_column<T>(row: &Row<'_>, index: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(index)?;
    text.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}
