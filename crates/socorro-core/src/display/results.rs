//! Result wrapper types for displaying operation outcomes.
//!
//! This module provides wrapper types that format the results of ticket
//! lifecycle operations with consistent messaging and resource display.

use std::fmt;

use crate::models::Ticket;

/// Wrapper type for displaying the result of create operations.
///
/// Formats creation results with a success message naming the resource and
/// its ID, followed by the full details of the created resource.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Ticket> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Opened ticket {} with ID: {}",
            self.resource.protocol, self.resource.id
        )?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of finalizing a ticket.
pub struct FinalizeResult {
    pub ticket: Ticket,
}

impl FinalizeResult {
    /// Create a new FinalizeResult wrapper.
    pub fn new(ticket: Ticket) -> Self {
        Self { ticket }
    }
}

impl fmt::Display for FinalizeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Finalized ticket '{}' (ID: {})",
            self.ticket.title, self.ticket.id
        )?;
        writeln!(f)?;
        write!(f, "{}", self.ticket)
    }
}
