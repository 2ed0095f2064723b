//! Ticket summary types for list views.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{StepStatus, Ticket, TicketCategory, TicketStatus};

/// Summary information about a ticket with workflow step statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketSummary {
    /// Ticket ID
    pub id: u64,
    /// External protocol code
    pub protocol: String,
    /// Title of the ticket
    pub title: String,
    /// Service category
    pub category: TicketCategory,
    /// Coarse ticket status
    pub status: TicketStatus,
    /// Active workflow step number
    pub current_step: u32,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// Total number of workflow steps (0 for non-towing tickets)
    pub total_steps: u32,
    /// Number of completed steps
    pub completed_steps: u32,
    /// Number of steps currently past their deadline
    pub late_steps: u32,
}

impl From<&Ticket> for TicketSummary {
    fn from(ticket: &Ticket) -> Self {
        let total_steps = ticket.steps.len() as u32;
        let completed_steps = ticket
            .steps
            .iter()
            .filter(|step| step.status == StepStatus::Completed)
            .count() as u32;
        let late_steps = ticket
            .steps
            .iter()
            .filter(|step| step.status == StepStatus::Late)
            .count() as u32;

        Self {
            id: ticket.id,
            protocol: ticket.protocol.clone(),
            title: ticket.title.clone(),
            category: ticket.category,
            status: ticket.status,
            current_step: ticket.current_step,
            created_at: ticket.created_at,
            total_steps,
            completed_steps,
            late_steps,
        }
    }
}
