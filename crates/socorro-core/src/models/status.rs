//! Status and category enumerations for tickets and workflow steps.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of workflow step statuses.
///
/// `Late` is not terminal: a late step can still be advanced directly to
/// `Completed` without passing through `InProgress` again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step has not been activated yet
    Pending,

    /// Step is the ticket's current step
    InProgress,

    /// Step was completed
    Completed,

    /// Step was in progress past its deadline
    Late,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(StepStatus::Pending),
            "in_progress" | "inprogress" => Ok(StepStatus::InProgress),
            "completed" => Ok(StepStatus::Completed),
            "late" => Ok(StepStatus::Late),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl StepStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
            StepStatus::Late => "late",
        }
    }

    /// Get status with consistent icon formatting for display.
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Pending => "○ Pending",
            StepStatus::InProgress => "➤ In Progress",
            StepStatus::Completed => "✓ Completed",
            StepStatus::Late => "⚠ Late",
        }
    }
}

/// Type-safe enumeration of coarse ticket statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Ticket was opened but no step has been advanced yet
    #[default]
    Open,

    /// At least one workflow advancement has happened
    InProgress,

    /// The workflow reached its terminal step
    Finalized,
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(TicketStatus::Open),
            "in_progress" | "inprogress" => Ok(TicketStatus::InProgress),
            "finalized" => Ok(TicketStatus::Finalized),
            _ => Err(format!("Invalid ticket status: {s}")),
        }
    }
}

impl TicketStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Finalized => "finalized",
        }
    }
}

/// Service category of a ticket.
///
/// Only towing tickets get the staged workflow; the other categories are
/// tracked as plain tickets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketCategory {
    /// Towing / vehicle recovery (drives the 7-step workflow)
    Towing,

    /// Windshield repair
    Windshield,

    /// Any other roadside service
    #[default]
    Standard,
}

impl FromStr for TicketCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "towing" => Ok(TicketCategory::Towing),
            "windshield" => Ok(TicketCategory::Windshield),
            "standard" => Ok(TicketCategory::Standard),
            _ => Err(format!("Invalid ticket category: {s}")),
        }
    }
}

impl TicketCategory {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketCategory::Towing => "towing",
            TicketCategory::Windshield => "windshield",
            TicketCategory::Standard => "standard",
        }
    }

    /// Whether tickets of this category carry the staged workflow.
    pub fn has_workflow(&self) -> bool {
        matches!(self, TicketCategory::Towing)
    }
}
