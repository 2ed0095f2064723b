//! Workflow step instance model.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::StepStatus;

/// One materialized step of a ticket's towing workflow.
///
/// Exactly one instance exists per (ticket, step_number) pair; the seven
/// instances are created as a batch when the ticket is opened and are mutated
/// in place by advancement and the deadline sweep, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepInstance {
    /// Unique identifier for the step instance
    pub id: u64,

    /// ID of the owning ticket
    pub ticket_id: u64,

    /// Position in the workflow, copied from the step table; immutable
    pub step_number: u32,

    /// Label copied from the step table at instantiation time
    pub name: String,

    /// Current status of the step
    pub status: StepStatus,

    /// Timestamp when the step was activated (UTC)
    pub started_at: Option<Timestamp>,

    /// Timestamp when the step was completed (UTC)
    pub completed_at: Option<Timestamp>,

    /// Deadline for an in-progress step; past-due steps are swept to `Late`
    pub deadline_at: Option<Timestamp>,

    /// Insurer protocol reference, meaningful on step 2
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurer_reference: Option<String>,

    /// Operator-supplied travel estimate in minutes, meaningful on step 6
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_travel_minutes: Option<u32>,

    /// Free-text notes; step 3 renewals append here, never overwrite
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StepInstance {
    /// Whether the step still counts against its deadline.
    pub fn is_active(&self) -> bool {
        matches!(self.status, StepStatus::InProgress | StepStatus::Late)
    }
}

/// Outcome of advancing the workflow by one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advancement {
    /// The step that was just completed
    pub completed: StepInstance,
    /// The step that was activated, if the workflow has one left
    pub activated: Option<StepInstance>,
    /// The ticket status after the transition
    pub ticket_status: super::TicketStatus,
}
