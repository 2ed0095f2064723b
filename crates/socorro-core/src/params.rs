//! Parameter structures for workflow operations
//!
//! Shared parameter structures used across interfaces (CLI, MCP) without
//! framework-specific derives. Interface layers wrap these with their own
//! derives (clap arguments, JSON schema) and convert into them, keeping the
//! core free of UI framework concerns.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, WorkflowError},
    models::TicketCategory,
};

/// Generic parameters for operations requiring just a ticket ID.
///
/// Used for show_ticket, get_steps, and initialize_workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the ticket to operate on
    pub id: u64,
}

/// Parameters for opening a new service ticket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct OpenTicket {
    /// Title of the ticket (required)
    pub title: String,
    /// Optional detailed description of the occurrence
    pub description: Option<String>,
    /// Service category ('towing', 'windshield', or 'standard').
    /// Towing tickets get the staged workflow initialized automatically.
    pub category: String,
    /// Optional insurer protocol reference known at intake time
    pub insurer_reference: Option<String>,
}

impl OpenTicket {
    /// Validate the parameters and return the parsed category.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::InvalidInput` - When the title is empty or the
    ///   category string is not one of the known categories
    pub fn validate(&self) -> Result<TicketCategory> {
        if self.title.trim().is_empty() {
            return Err(WorkflowError::invalid_input("title")
                .with_reason("Ticket title must not be empty"));
        }

        self.category.parse::<TicketCategory>().map_err(|_| {
            WorkflowError::invalid_input("category").with_reason(format!(
                "Invalid category: {}. Must be 'towing', 'windshield', or 'standard'",
                self.category
            ))
        })
    }
}

/// Parameters for listing tickets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListTickets {
    /// Whether to include finalized tickets in the listing
    #[serde(default)]
    pub include_finalized: bool,
}

/// Parameters for advancing a workflow step.
///
/// Completes the named step and activates the next one. The optional payload
/// fields are stored depending on which step is involved: the insurer
/// reference when completing step 2, the manual travel estimate when the
/// activation lands on step 6, and free-text notes on the completed step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AdvanceStep {
    /// ID of the ticket whose workflow is being advanced
    pub ticket_id: u64,
    /// The step number being completed (the ticket's current step)
    pub step_number: u32,
    /// Insurer protocol reference - required when completing step 2
    pub insurer_reference: Option<String>,
    /// Operator travel estimate in minutes, used when activating step 6
    pub travel_minutes: Option<u32>,
    /// Free-text notes stored on the completed step
    pub notes: Option<String>,
}

/// Parameters for renewing the provider-wait deadline (step 3).
///
/// Each renewal extends the SLA window by a fixed 15 minutes and appends a
/// timestamped note; prior notes are never overwritten.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RenewProviderWait {
    /// ID of the ticket whose step 3 is being renewed
    pub ticket_id: u64,
    /// Status note recorded with this renewal
    pub note: String,
}

/// Parameters for updating the insurer reference mid-step-2.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateInsurerReference {
    /// ID of the ticket
    pub ticket_id: u64,
    /// New insurer protocol reference
    pub insurer_reference: String,
}

/// Parameters for setting the step-6 travel estimate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateTravelTime {
    /// ID of the ticket
    pub ticket_id: u64,
    /// Travel estimate in minutes; the step-6 deadline becomes now + minutes
    pub minutes: u32,
}

/// Parameters for finalizing a ticket once step 7 is done.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct FinalizeTicket {
    /// ID of the ticket being finalized
    pub ticket_id: u64,
    /// Closing notes stored on step 7
    pub final_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TicketCategory;

    #[test]
    fn test_open_ticket_validate_towing() {
        let params = OpenTicket {
            title: "Tow request".to_string(),
            description: None,
            category: "towing".to_string(),
            insurer_reference: None,
        };

        assert_eq!(params.validate().unwrap(), TicketCategory::Towing);
    }

    #[test]
    fn test_open_ticket_validate_empty_title() {
        let params = OpenTicket {
            title: "   ".to_string(),
            category: "towing".to_string(),
            ..Default::default()
        };

        match params.validate().unwrap_err() {
            WorkflowError::InvalidInput { field, .. } => assert_eq!(field, "title"),
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_open_ticket_validate_bad_category() {
        let params = OpenTicket {
            title: "Tow request".to_string(),
            category: "helicopter".to_string(),
            ..Default::default()
        };

        match params.validate().unwrap_err() {
            WorkflowError::InvalidInput { field, reason } => {
                assert_eq!(field, "category");
                assert!(reason.contains("Invalid category: helicopter"));
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }
}
