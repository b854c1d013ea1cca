//! Database schema initialization and migrations.

use rusqlite::OptionalExtension;

use crate::error::{DatabaseResultExt, Result};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        // Cascading deletes of a mission's graph rely on this.
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        // The summary view reads columns added here, so existing tables are
        // upgraded before the schema batch creates it.
        self.apply_migrations()?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        Ok(())
    }

    /// Brings databases created by earlier versions up to date.
    ///
    /// The first store layout kept no selection: its `missions` table had
    /// only `id`, `name`, `created_at` and `updated_at`, and every reload
    /// started at the first phase.
    fn apply_migrations(&self) -> Result<()> {
        let has_missions = self
            .connection
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'missions'",
                [],
                |_| Ok(()),
            )
            .optional()
            .db_context("Failed to inspect database schema")?
            .is_some();
        if !has_missions {
            return Ok(());
        }

        let has_current_phase = self.has_column("missions", "current_phase")?;
        if !has_current_phase {
            self.connection
                .execute(
                    "ALTER TABLE missions ADD COLUMN current_phase INTEGER NOT NULL DEFAULT 0",
                    [],
                )
                .db_context("Failed to add current_phase column to missions table")?;
        }

        Ok(())
    }

    fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        let count: i64 = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
                [table, column],
                |row| row.get(0),
            )
            .db_context("Failed to inspect table columns")?;
        Ok(count > 0)
    }
}
