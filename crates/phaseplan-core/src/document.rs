//! Durable mission document and geomessage export.
//!
//! [`MissionDocument`] is the interchange form of a whole mission graph. It
//! is plain data: identifiers are strings and maps are key/value lists, so
//! a document can be read by anything that understands JSON. Converting it
//! back into a [`Mission`] validates every identifier and extent first and
//! fails without producing a partial mission.
//!
//! ```text
//! {
//!   "name": "...",
//!   "phase_list": [{ "id", "name", "time_extent_start", "time_extent_end" }],
//!   "entities": [{
//!     "id", "visible_time_extent": { "start", "end" },
//!     "attributes": [{ "key", "value" }],
//!     "phase_control_points": [{ "key": <phase id>, "value" }]
//!   }]
//! }
//! ```

use std::collections::{BTreeMap, HashSet};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{MissionError, Result},
    models::{
        AttributeKey, Attributes, EntityId, Mission, MissionPhase, PhaseId, TimeAwareEntity,
        TimeExtent,
    },
};

/// Width symbol codes are padded to in geomessages.
pub const SYMBOL_CODE_WIDTH: usize = 15;

/// Serialized form of a [`Mission`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionDocument {
    pub name: String,
    #[serde(default)]
    pub phase_list: Vec<PhaseRecord>,
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub id: String,
    pub name: String,
    pub time_extent_start: Timestamp,
    pub time_extent_end: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    pub visible_time_extent: TimeExtent,
    #[serde(default)]
    pub attributes: Vec<KeyValue>,
    #[serde(default)]
    pub phase_control_points: Vec<KeyValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Mission {
    /// Serializable document of the whole mission graph.
    pub fn to_document(&self) -> MissionDocument {
        MissionDocument {
            name: self.name.clone(),
            phase_list: self
                .phases
                .iter()
                .map(|phase| PhaseRecord {
                    id: phase.id.to_string(),
                    name: phase.name.clone(),
                    time_extent_start: phase.time_extent.start,
                    time_extent_end: phase.time_extent.end,
                })
                .collect(),
            entities: self
                .entities
                .iter()
                .map(|entity| EntityRecord {
                    id: entity.id.to_string(),
                    visible_time_extent: entity.visible_time_extent,
                    attributes: entity
                        .attributes
                        .iter()
                        .map(|attribute| KeyValue::new(attribute.key.as_str(), &attribute.value))
                        .collect(),
                    phase_control_points: entity
                        .phase_control_points
                        .iter()
                        .map(|(phase, control_points)| {
                            KeyValue::new(phase.to_string(), control_points)
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Rebuilds a mission from a document.
    ///
    /// Fails with [`MissionError::Document`] on malformed or duplicate
    /// identifiers and on extents that end before they start. Control point
    /// entries keyed by phases missing from `phase_list` are kept.
    pub fn from_document(document: MissionDocument) -> Result<Self> {
        let mut phase_ids = HashSet::new();
        let mut phases = Vec::with_capacity(document.phase_list.len());
        for record in document.phase_list {
            let id = parse_id::<PhaseId>("phase", &record.id)?;
            if !phase_ids.insert(id) {
                return Err(MissionError::document(format!("duplicate phase id {id}")));
            }
            let time_extent = TimeExtent::new(record.time_extent_start, record.time_extent_end)
                .map_err(|e| MissionError::document(format!("phase '{}': {e}", record.name)))?;
            phases.push(MissionPhase {
                id,
                name: record.name,
                time_extent,
            });
        }

        let mut entity_ids = HashSet::new();
        let mut entities = Vec::with_capacity(document.entities.len());
        for record in document.entities {
            let id = parse_id::<EntityId>("entity", &record.id)?;
            if !entity_ids.insert(id) {
                return Err(MissionError::document(format!("duplicate entity id {id}")));
            }
            let extent = record.visible_time_extent;
            if extent.end < extent.start {
                return Err(MissionError::document(format!(
                    "entity {id}: lifetime ends at {} before it starts at {}",
                    extent.end, extent.start
                )));
            }

            let attributes: Attributes = record
                .attributes
                .into_iter()
                .map(|kv| (AttributeKey::from(kv.key), kv.value))
                .collect();

            let mut phase_control_points = BTreeMap::new();
            for kv in record.phase_control_points {
                let phase = parse_id::<PhaseId>("phase control point key", &kv.key)?;
                phase_control_points.insert(phase, kv.value);
            }

            entities.push(TimeAwareEntity {
                id,
                attributes,
                visible_time_extent: extent,
                phase_control_points,
            });
        }

        Ok(Self {
            name: document.name,
            phases,
            entities,
        })
    }
}

fn parse_id<T>(what: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr<Err = MissionError>,
{
    value
        .parse()
        .map_err(|_| MissionError::document(format!("invalid {what} id '{value}'")))
}

/// Flattens every entity's live attributes into geomessage objects.
///
/// Keys are lowercased, the entity id is included as `_id` and symbol codes
/// are padded with `-` to [`SYMBOL_CODE_WIDTH`] characters.
pub fn geomessages(mission: &Mission) -> Value {
    let messages = mission
        .entities
        .iter()
        .map(|entity| {
            let mut message = Map::new();
            message.insert("_id".to_string(), Value::String(entity.id.to_string()));
            for attribute in entity.attributes.iter() {
                let key = attribute.key.as_str().to_lowercase();
                let value = if attribute.key == AttributeKey::SymbolCode {
                    pad_symbol_code(&attribute.value)
                } else {
                    attribute.value.clone()
                };
                message.insert(key, Value::String(value));
            }
            Value::Object(message)
        })
        .collect();
    Value::Array(messages)
}

fn pad_symbol_code(code: &str) -> String {
    format!("{code:-<SYMBOL_CODE_WIDTH$}")
}
