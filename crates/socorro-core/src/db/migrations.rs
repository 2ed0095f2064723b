//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, Result, WorkflowError};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        // Enable foreign keys for this connection
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        // Execute the schema SQL
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        // Apply migrations for existing databases
        self.apply_migrations()?;

        Ok(())
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        // Check if manual_travel_minutes column exists in workflow_steps
        let has_travel_column: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('workflow_steps') WHERE name = 'manual_travel_minutes'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        if !has_travel_column {
            self.connection
                .execute(
                    "ALTER TABLE workflow_steps ADD COLUMN manual_travel_minutes INTEGER",
                    [],
                )
                .map_err(|e| {
                    WorkflowError::database_error(
                        "Failed to add manual_travel_minutes column to workflow_steps table",
                        e,
                    )
                })?;
        }

        // Check if insurer_reference column exists in tickets
        let has_insurer_column: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('tickets') WHERE name = 'insurer_reference'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        if !has_insurer_column {
            self.connection
                .execute("ALTER TABLE tickets ADD COLUMN insurer_reference TEXT", [])
                .map_err(|e| {
                    WorkflowError::database_error(
                        "Failed to add insurer_reference column to tickets table",
                        e,
                    )
                })?;
        }

        Ok(())
    }
}
