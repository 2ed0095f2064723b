//! Display implementations for domain models.
//!
//! This module contains all Display trait implementations for the core domain
//! models, separated from the model definitions to maintain clean separation
//! of concerns. All output is markdown for rich terminal display.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    Advancement, StepInstance, StepStatus, Ticket, TicketCategory, TicketStatus,
};

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.title)?;
        writeln!(f)?;

        // Metadata section
        writeln!(f, "- Protocol: {}", self.protocol)?;
        writeln!(f, "- Status: {}", self.status.as_str())?;
        writeln!(f, "- Category: {}", self.category.as_str())?;
        if self.category.has_workflow() {
            writeln!(f, "- Current step: {}", self.current_step)?;
        }
        if let Some(reference) = &self.insurer_reference {
            writeln!(f, "- Insurer reference: {reference}")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        if let Some(completed) = &self.completed_at {
            writeln!(f, "- Completed: {}", LocalDateTime(completed))?;
        }

        // Description as a paragraph
        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        if !self.steps.is_empty() {
            writeln!(f, "\n## Workflow")?;
            writeln!(f)?;
            for step in &self.steps {
                write!(f, "{}", step)?;
            }
        } else {
            writeln!(f, "\nNo workflow steps for this ticket.")?;
        }

        Ok(())
    }
}

impl StepInstance {
    /// Format the step using the clean, compact display format.
    ///
    /// This uses the same format whether the step is displayed standalone
    /// or within a ticket context.
    fn fmt_step(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} ({})",
            self.step_number,
            self.name,
            self.status.with_icon()
        )?;
        writeln!(f)?;

        if let Some(started) = &self.started_at {
            writeln!(f, "- Started: {}", LocalDateTime(started))?;
        }
        if let Some(deadline) = &self.deadline_at {
            writeln!(f, "- Deadline: {}", LocalDateTime(deadline))?;
        }
        if let Some(completed) = &self.completed_at {
            writeln!(f, "- Completed: {}", LocalDateTime(completed))?;
        }
        if let Some(reference) = &self.insurer_reference {
            writeln!(f, "- Insurer reference: {reference}")?;
        }
        if let Some(minutes) = self.manual_travel_minutes {
            writeln!(f, "- Travel estimate: {minutes} min")?;
        }

        if let Some(notes) = &self.notes {
            writeln!(f)?;
            writeln!(f, "{notes}")?;
        }

        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for StepInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_step(f)
    }
}

impl fmt::Display for Advancement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Completed step {}: {}",
            self.completed.step_number, self.completed.name
        )?;

        if let Some(step) = &self.activated {
            writeln!(f)?;
            write!(f, "{step}")?;
        }

        if self.ticket_status == TicketStatus::Finalized {
            writeln!(f, "The vehicle has been delivered; finalize the ticket to close it.")?;
        }

        Ok(())
    }
}

impl fmt::Display for crate::models::TicketSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = if self.total_steps > 0 {
            format!(" ({}/{})", self.completed_steps, self.total_steps)
        } else {
            String::new()
        };

        writeln!(f, "## {} (ID: {}){progress}", self.title, self.id)?;
        writeln!(f)?;

        writeln!(f, "- **Protocol**: {}", self.protocol)?;
        writeln!(f, "- **Category**: {}", self.category.as_str())?;
        writeln!(f, "- **Status**: {}", self.status.as_str())?;
        if self.total_steps > 0 {
            writeln!(f, "- **Current step**: {}", self.current_step)?;
        }
        if self.late_steps > 0 {
            writeln!(f, "- **Late steps**: {}", self.late_steps)?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?; // Add blank line after each ticket

        Ok(())
    }
}
