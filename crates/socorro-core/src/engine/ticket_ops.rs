//! Ticket operations for the WorkflowEngine.

use tokio::task;

use super::WorkflowEngine;
use crate::{
    db::Database,
    error::{Result, WorkflowError},
    models::Ticket,
    params::{Id, ListTickets, OpenTicket},
};

impl WorkflowEngine {
    /// Opens a new service ticket.
    ///
    /// Towing tickets have their workflow seeded as part of the same
    /// transaction, so the returned ticket already sits on step 2.
    pub async fn open_ticket(&self, params: &OpenTicket) -> Result<Ticket> {
        let category = params.validate()?;

        let db_path = self.db_path.clone();
        let steps = self.steps.clone();
        let title = params.title.clone();
        let description = params.description.clone();
        let insurer_reference = params.insurer_reference.clone();

        task::spawn_blocking(move || {
            let mut db = Database::with_step_table(&db_path, steps)?;
            db.create_ticket(
                &title,
                description.as_deref(),
                category,
                insurer_reference.as_deref(),
            )
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a ticket by its ID, with workflow steps eagerly loaded.
    pub async fn get_ticket(&self, params: &Id) -> Result<Option<Ticket>> {
        let db_path = self.db_path.clone();
        let steps = self.steps.clone();
        let ticket_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::with_step_table(&db_path, steps)?;
            db.get_ticket(ticket_id)
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists ticket summaries, newest first.
    pub async fn list_tickets(&self, params: &ListTickets) -> Result<crate::display::TicketSummaries> {
        let db_path = self.db_path.clone();
        let steps = self.steps.clone();
        let include_finalized = params.include_finalized;

        let summaries = task::spawn_blocking(move || {
            let db = Database::with_step_table(&db_path, steps)?;
            db.list_tickets(include_finalized)
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(crate::display::TicketSummaries(summaries))
    }
}
