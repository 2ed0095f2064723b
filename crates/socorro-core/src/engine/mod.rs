//! High-level workflow engine API for managing tickets and their steps.
//!
//! This module provides the main [`WorkflowEngine`] interface for the Socorro
//! roadside-assistance system. The engine acts as the central coordinator
//! between application layers and the database, implementing all business
//! logic for ticket and workflow step operations.
//!
//! Every operation opens a connection on a blocking task, so the engine is
//! cheap to clone around async code and safe to call from multiple tasks.
//!
//! # Usage Examples
//!
//! ## Creating an Engine
//!
//! ```rust
//! use socorro_core::WorkflowEngineBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create with default database path
//! let engine = WorkflowEngineBuilder::new().build().await?;
//!
//! // Or specify custom database path
//! let engine = WorkflowEngineBuilder::new()
//!     .with_database_path(Some("/custom/path/socorro.db"))
//!     .build()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Ticket Operations
//!
//! ```rust
//! use socorro_core::{WorkflowEngineBuilder, params::{AdvanceStep, OpenTicket}};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = WorkflowEngineBuilder::new().build().await?;
//!
//! // Open a towing ticket; the workflow starts on step 2 automatically
//! let ticket = engine
//!     .open_ticket(&OpenTicket {
//!         title: "Dead battery on the interstate".to_string(),
//!         description: None,
//!         category: "towing".to_string(),
//!         insurer_reference: None,
//!     })
//!     .await?;
//!
//! // Complete step 2 once the insurer opens its ticket
//! engine
//!     .advance_step(&AdvanceStep {
//!         ticket_id: ticket.id,
//!         step_number: 2,
//!         insurer_reference: Some("INS-12345".to_string()),
//!         travel_minutes: None,
//!         notes: None,
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use crate::workflow::StepTable;

// Module declarations
pub mod builder;
pub mod step_ops;
pub mod ticket_ops;

// Re-export the main types
pub use builder::WorkflowEngineBuilder;

/// Main engine interface for managing tickets and workflow steps.
pub struct WorkflowEngine {
    pub(crate) db_path: PathBuf,
    pub(crate) steps: StepTable,
}

impl WorkflowEngine {
    /// Creates a new engine with the specified database path and step table.
    pub(crate) fn new(db_path: PathBuf, steps: StepTable) -> Self {
        Self { db_path, steps }
    }

    /// The workflow step table this engine seeds towing tickets with.
    pub fn step_table(&self) -> &StepTable {
        &self.steps
    }
}
