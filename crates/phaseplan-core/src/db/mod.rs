//! SQLite mission store.
//!
//! A mission is stored as one row in `missions` plus its phases, entities,
//! entity attributes and per-phase control points in child tables. Saving
//! replaces the whole graph of one mission inside a single transaction, so a
//! reader never sees a half-written mission. Read-modify-write cycles go
//! through [`Database::update_mission`], which holds the write lock from the
//! load to the save.

use std::{path::Path, time::Duration};

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod migrations;
pub mod mission_queries;

pub use mission_queries::StoredMission;

/// How long a connection waits for another writer before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (or creates) the database at `path` and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
