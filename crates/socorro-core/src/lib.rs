//! Core library for the Socorro roadside-assistance application.
//!
//! This crate provides the business logic for managing service tickets and
//! their towing workflow: a fixed seven-step process with SLA deadlines that
//! every towing ticket moves through, from intake to vehicle delivery.
//!
//! # Display Architecture
//!
//! The crate implements a Display-based architecture for formatting output:
//!
//! - **Domain Models** ([`models`]): Implement [`std::fmt::Display`] for
//!   direct formatting
//! - **Display Wrappers** ([`display`]): Provide contextual and specialized
//!   formatting
//! - **Terminal Rendering**: Rich markdown output via the CLI's terminal
//!   renderer
//!
//! This separation allows the same data to be formatted differently depending
//! on context (lists vs. individual items, creation results vs. advancement
//! results) while maintaining consistency across all output.
//!
//! # Quick Start
//!
//! ```rust
//! use socorro_core::{WorkflowEngineBuilder, params::OpenTicket};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an engine instance
//! let engine = WorkflowEngineBuilder::new()
//!     .with_database_path(Some("test.db"))
//!     .build()
//!     .await?;
//!
//! // Open a towing ticket; its workflow starts immediately
//! let ticket = engine
//!     .open_ticket(&OpenTicket {
//!         title: "Collision on route 9".to_string(),
//!         description: Some("Front-end damage, needs a flatbed".to_string()),
//!         category: "towing".to_string(),
//!         insurer_reference: None,
//!     })
//!     .await?;
//! println!("Opened ticket: {}", ticket);
//!
//! // List open tickets as summaries
//! use socorro_core::params::ListTickets;
//! let tickets = engine.list_tickets(&ListTickets::default()).await?;
//! for ticket in &tickets {
//!     println!("Ticket: {}", ticket.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod params;
pub mod workflow;

// Re-export commonly used types
pub use db::Database;
pub use display::{
    CreateResult, FinalizeResult, LocalDateTime, OperationStatus, Steps, TicketSummaries,
};
pub use engine::{WorkflowEngine, WorkflowEngineBuilder};
pub use error::{Result, WorkflowError};
pub use models::{
    Advancement, StepInstance, StepStatus, Ticket, TicketCategory, TicketStatus, TicketSummary,
};
pub use params::{
    AdvanceStep, FinalizeTicket, Id, ListTickets, OpenTicket, RenewProviderWait,
    UpdateInsurerReference, UpdateTravelTime,
};
pub use workflow::{StepDefinition, StepTable, STEP_COUNT};
