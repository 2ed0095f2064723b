//! Collection wrapper types for displaying groups of domain objects.
//!
//! This module provides wrapper types that format collections of domain
//! objects with consistent structure and empty collection handling.

use std::{fmt, ops::Index};

use crate::models::{StepInstance, TicketSummary};

/// Newtype wrapper for displaying collections of ticket summaries.
///
/// Handles empty collections gracefully and formats each summary using the
/// TicketSummary Display trait, without adding any title of its own.
pub struct TicketSummaries(pub Vec<TicketSummary>);

impl TicketSummaries {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of ticket summaries in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get a reference to the ticket summary at the given index.
    pub fn get(&self, index: usize) -> Option<&TicketSummary> {
        self.0.get(index)
    }

    /// Get an iterator over the ticket summaries.
    pub fn iter(&self) -> std::slice::Iter<'_, TicketSummary> {
        self.0.iter()
    }
}

impl Index<usize> for TicketSummaries {
    type Output = TicketSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for TicketSummaries {
    type Item = TicketSummary;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TicketSummaries {
    type Item = &'a TicketSummary;
    type IntoIter = std::slice::Iter<'a, TicketSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for TicketSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No tickets found.")
        } else {
            for ticket in &self.0 {
                write!(f, "{}", ticket)?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying collections of workflow steps.
///
/// Handles empty collections gracefully and formats each step using the
/// StepInstance Display trait.
pub struct Steps(pub Vec<StepInstance>);

impl Steps {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of steps in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get a reference to the step at the given index.
    pub fn get(&self, index: usize) -> Option<&StepInstance> {
        self.0.get(index)
    }

    /// Get an iterator over the steps.
    pub fn iter(&self) -> std::slice::Iter<'_, StepInstance> {
        self.0.iter()
    }
}

impl Index<usize> for Steps {
    type Output = StepInstance;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for Steps {
    type Item = StepInstance;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Steps {
    type Item = &'a StepInstance;
    type IntoIter = std::slice::Iter<'a, StepInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No steps found.")
        } else {
            for step in &self.0 {
                write!(f, "{}", step)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{StepStatus, TicketCategory, TicketStatus};

    fn create_test_summary() -> TicketSummary {
        TicketSummary {
            id: 1,
            protocol: "CHTEST0001".to_string(),
            title: "Stalled truck".to_string(),
            category: TicketCategory::Towing,
            status: TicketStatus::InProgress,
            current_step: 3,
            created_at: Timestamp::from_second(1640995200).unwrap(),
            total_steps: 7,
            completed_steps: 2,
            late_steps: 0,
        }
    }

    fn create_test_step() -> StepInstance {
        StepInstance {
            id: 1,
            ticket_id: 1,
            step_number: 2,
            name: "Awaiting insurer ticket opening".to_string(),
            status: StepStatus::InProgress,
            started_at: Some(Timestamp::from_second(1640995200).unwrap()),
            completed_at: None,
            deadline_at: Some(Timestamp::from_second(1640996100).unwrap()),
            insurer_reference: None,
            manual_travel_minutes: None,
            notes: None,
        }
    }

    #[test]
    fn test_ticket_summaries_display() {
        let summaries = TicketSummaries(vec![create_test_summary()]);
        let output = format!("{}", summaries);
        assert!(output.contains("Stalled truck"));
        assert!(output.contains("ID: 1"));
        assert!(output.contains("(2/7)"));

        let empty = TicketSummaries(vec![]);
        assert_eq!(format!("{}", empty), "No tickets found.\n");

        let mut second = create_test_summary();
        second.id = 2;
        second.title = "Flat tire".to_string();
        let summaries = TicketSummaries(vec![create_test_summary(), second]);
        let output = format!("{}", summaries);
        assert!(output.contains("## Stalled truck"));
        assert!(output.contains("## Flat tire"));
        // No extra title header is added by the wrapper
        assert!(!output.starts_with("# "));
    }

    #[test]
    fn test_steps_display_empty() {
        let steps = Steps(vec![]);
        assert_eq!(format!("{}", steps), "No steps found.\n");
    }

    #[test]
    fn test_steps_display_multiple_steps() {
        let step1 = create_test_step();
        let mut step2 = create_test_step();
        step2.id = 2;
        step2.step_number = 3;
        step2.name = "Ticket opened - awaiting provider".to_string();
        step2.status = StepStatus::Pending;
        step2.started_at = None;
        step2.deadline_at = None;

        let steps = Steps(vec![step1, step2]);
        let output = format!("{}", steps);

        assert!(output.contains("Awaiting insurer ticket opening"));
        assert!(output.contains("Ticket opened - awaiting provider"));
        assert!(output.contains("➤ In Progress"));
        assert!(output.contains("○ Pending"));
    }
}
