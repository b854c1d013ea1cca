//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use crate::models::{MissionPhase, MissionSummary, TimeAwareEntity};

/// Newtype wrapper for displaying stored mission summaries.
pub struct MissionSummaries(pub Vec<MissionSummary>);

impl MissionSummaries {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of summaries in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the summaries.
    pub fn iter(&self) -> std::slice::Iter<'_, MissionSummary> {
        self.0.iter()
    }
}

impl fmt::Display for MissionSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No missions found.")
        } else {
            for mission in &self.0 {
                write!(f, "{mission}")?;
            }
            Ok(())
        }
    }
}

/// The phase sequence of a mission with the selected phase marked.
pub struct Phases {
    pub phases: Vec<MissionPhase>,
    pub current: usize,
}

impl Phases {
    pub fn new(phases: Vec<MissionPhase>, current: usize) -> Self {
        Self { phases, current }
    }
}

impl fmt::Display for Phases {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.phases.is_empty() {
            return writeln!(f, "No phases in this mission.");
        }
        for (index, phase) in self.phases.iter().enumerate() {
            let marker = if index == self.current { " (current)" } else { "" };
            writeln!(f, "{}. {}{marker}", index + 1, phase.name)?;
            writeln!(f, "   {}", phase.time_extent)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying a list of units.
pub struct Entities(pub Vec<TimeAwareEntity>);

impl Entities {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of units in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Entities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No units found.")
        } else {
            for entity in &self.0 {
                write!(f, "{entity}")?;
            }
            Ok(())
        }
    }
}
