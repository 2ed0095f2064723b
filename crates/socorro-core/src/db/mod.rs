//! Database operations and SQLite management for tickets and workflow steps.
//!
//! This module provides low-level database operations for the Socorro
//! roadside-assistance system. It handles SQLite database connections, schema
//! management, and provides specialized query interfaces for tickets and
//! their workflow steps.

use std::path::Path;

use rusqlite::Connection;

use crate::{
    error::{DatabaseResultExt, Result},
    workflow::StepTable,
};

pub mod migrations;
pub mod step_queries;
pub mod ticket_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
    steps: StepTable,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_step_table(path, StepTable::default())
    }

    /// Creates a database connection using a custom workflow step table.
    pub fn with_step_table<P: AsRef<Path>>(path: P, steps: StepTable) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection, steps };
        db.initialize_schema()?;
        Ok(db)
    }

    /// The workflow step table used when initializing ticket workflows.
    pub fn step_table(&self) -> &StepTable {
        &self.steps
    }
}
