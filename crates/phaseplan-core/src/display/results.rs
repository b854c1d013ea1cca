//! Result wrapper types for displaying operation outcomes.
//!
//! Each wrapper prints a one-line summary of what happened followed by the
//! affected resource.

use std::fmt;

use crate::{
    models::{MissionPhase, TimeAwareEntity},
    session::{EntityRemoval, PhaseRemoval, PhaseSnapshot},
};

/// Wrapper type for displaying the result of create operations.
///
/// # Examples
///
/// ```rust
/// use jiff::Timestamp;
/// use phaseplan_core::{
///     display::CreateResult,
///     models::Mission,
///     session::MissionSession,
/// };
///
/// let mut session = MissionSession::new(Mission::new("Example"));
/// let snapshot = session.add_phase_at("Phase 1", Timestamp::UNIX_EPOCH).unwrap();
///
/// let output = CreateResult::new(snapshot).to_string();
/// assert!(output.contains("Added phase 1: Phase 1"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<TimeAwareEntity> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created unit with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<PhaseSnapshot> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Added phase {}: {}",
            self.resource.index + 1,
            self.resource.phase.name
        )?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations, optionally
/// listing the changes made.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    /// Create a new UpdateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }

    fn fmt_changes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for UpdateResult<TimeAwareEntity> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated unit with ID: {}", self.resource.id)?;
        self.fmt_changes(f)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for UpdateResult<MissionPhase> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated phase '{}'", self.resource.name)?;
        self.fmt_changes(f)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    /// Create a new DeleteResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<PhaseRemoval> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let removal = &self.resource;
        writeln!(f, "Deleted phase '{}' (ID: {})", removal.phase.name, removal.phase.id)?;
        if !removal.dropped_entities.is_empty() {
            writeln!(f)?;
            writeln!(f, "Units removed with the phase:")?;
            for id in &removal.dropped_entities {
                writeln!(f, "- {id}")?;
            }
        }
        if let Some(snapshot) = &removal.snapshot {
            writeln!(f)?;
            write!(f, "{snapshot}")?;
        }
        Ok(())
    }
}

impl fmt::Display for DeleteResult<EntityRemoval> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let removal = &self.resource;
        writeln!(
            f,
            "Removed unit {} from phase '{}': {}",
            removal.id, removal.phase.name, removal.outcome
        )
    }
}
