//! Error types for the mission planning library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all mission operations.
///
/// Every operation that returns an error leaves the mission it was applied to
/// exactly as it was before the call.
#[derive(Error, Debug)]
pub enum MissionError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Mission not found in the store
    #[error("Mission '{name}' not found")]
    MissionNotFound { name: String },
    /// The mission has no phases to operate on
    #[error("Mission has no phases")]
    NoPhases,
    /// Phase index outside the phase sequence
    #[error("Phase index {index} is out of range. Mission has {count} phases")]
    PhaseIndexOutOfRange { index: usize, count: usize },
    /// Entity not found for the given ID
    #[error("Entity with ID {id} not found")]
    EntityNotFound { id: String },
    /// Entity exists but is not visible during the current phase
    #[error("Entity {id} is not visible in phase '{phase}'")]
    EntityNotInPhase { id: String, phase: String },
    /// Malformed control-points payload
    #[error("Invalid control points '{value}': {reason}")]
    InvalidControlPoints { value: String, reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// A persisted mission document failed validation
    #[error("Invalid mission document: {reason}")]
    Document { reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> MissionError {
        MissionError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> MissionError {
        MissionError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl MissionError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a document validation error.
    pub fn document(reason: impl Into<String>) -> Self {
        Self::Document {
            reason: reason.into(),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| MissionError::database(message).with_source(e))
    }
}

/// Result type alias for mission operations
pub type Result<T> = std::result::Result<T, MissionError>;
