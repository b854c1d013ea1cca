//! Ordered attribute bag carried by every entity.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Attribute message type for units placed on the plan.
pub const MSG_TYPE_POSITION_REPORT: &str = "position_report";
/// Attribute action for live units.
pub const MSG_ACTION_UPDATE: &str = "update";
/// Spatial reference code the control points are expressed in.
pub const DEFAULT_WKID: &str = "3857";
/// Designation assigned to freshly created units.
pub const DEFAULT_UNIQUE_DESIGNATION: &str = "1";

/// Type-safe enumeration of the attribute keys the renderer understands,
/// with a fallback for anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttributeKey {
    /// Message type (`_type`)
    Type,
    /// Message action (`_action`)
    Action,
    /// Spatial reference code (`_wkid`)
    Wkid,
    /// Symbol identification code (`sic`)
    SymbolCode,
    /// Unit designation (`uniquedesignation`)
    UniqueDesignation,
    /// Live geometry for the selected phase (`_control_points`)
    ControlPoints,
    /// Any key not known to this crate
    Other(String),
}

impl AttributeKey {
    /// Wire name of the key.
    pub fn as_str(&self) -> &str {
        match self {
            AttributeKey::Type => "_type",
            AttributeKey::Action => "_action",
            AttributeKey::Wkid => "_wkid",
            AttributeKey::SymbolCode => "sic",
            AttributeKey::UniqueDesignation => "uniquedesignation",
            AttributeKey::ControlPoints => "_control_points",
            AttributeKey::Other(key) => key,
        }
    }
}

impl FromStr for AttributeKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "_type" => AttributeKey::Type,
            "_action" => AttributeKey::Action,
            "_wkid" => AttributeKey::Wkid,
            "sic" => AttributeKey::SymbolCode,
            "uniquedesignation" => AttributeKey::UniqueDesignation,
            "_control_points" => AttributeKey::ControlPoints,
            other => AttributeKey::Other(other.to_string()),
        })
    }
}

impl From<String> for AttributeKey {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(key) => key,
            Err(never) => match never {},
        }
    }
}

impl From<AttributeKey> for String {
    fn from(value: AttributeKey) -> Self {
        value.as_str().to_string()
    }
}

/// A single key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: AttributeKey,
    pub value: String,
}

/// Insertion-ordered key/value map.
///
/// Keys are unique; re-inserting a key replaces its value in place and keeps
/// its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    /// Creates an empty attribute bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &AttributeKey) -> Option<&str> {
        self.0
            .iter()
            .find(|attr| &attr.key == key)
            .map(|attr| attr.value.as_str())
    }

    /// Inserts or replaces a value, returning the previous one.
    pub fn insert(&mut self, key: AttributeKey, value: impl Into<String>) -> Option<String> {
        let value = value.into();
        match self.0.iter_mut().find(|attr| attr.key == key) {
            Some(existing) => Some(std::mem::replace(&mut existing.value, value)),
            None => {
                self.0.push(Attribute { key, value });
                None
            }
        }
    }

    /// Removes a key, returning its value.
    pub fn remove(&mut self, key: &AttributeKey) -> Option<String> {
        let position = self.0.iter().position(|attr| &attr.key == key)?;
        Some(self.0.remove(position).value)
    }

    /// Returns true when `key` is present.
    pub fn contains_key(&self, key: &AttributeKey) -> bool {
        self.get(key).is_some()
    }

    /// Iterates pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.0.iter()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no attributes are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(AttributeKey, String)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (AttributeKey, String)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (key, value) in iter {
            attributes.insert(key, value);
        }
        attributes
    }
}
