//! Data models for tickets and workflow steps.
//!
//! This module contains the core domain models of the roadside-assistance
//! ticketing system: tickets, the per-ticket workflow step instances, and the
//! closed status enumerations. Display implementations live in
//! [`crate::display::models`] to keep data structures and presentation logic
//! separated.

pub mod status;
pub mod step;
pub mod summary;
pub mod ticket;


// Re-export all public types at the models level
pub use status::{StepStatus, TicketCategory, TicketStatus};
pub use step::{Advancement, StepInstance};
pub use summary::TicketSummary;
pub use ticket::{generate_protocol, Ticket};
