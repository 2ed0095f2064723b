//! Workflow step operations for the WorkflowEngine.

use tokio::task;

use super::WorkflowEngine;
use crate::{
    db::Database,
    error::{Result, WorkflowError},
    models::{Advancement, StepInstance, Ticket},
    params::{
        AdvanceStep, FinalizeTicket, Id, RenewProviderWait, UpdateInsurerReference,
        UpdateTravelTime,
    },
};

impl WorkflowEngine {
    /// Retrieves all workflow steps for a ticket, in step order.
    pub async fn get_steps(&self, params: &Id) -> Result<crate::display::Steps> {
        let db_path = self.db_path.clone();
        let steps = self.steps.clone();
        let ticket_id = params.id;

        let instances = task::spawn_blocking(move || {
            let db = Database::with_step_table(&db_path, steps)?;
            db.get_steps(ticket_id)
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(crate::display::Steps(instances))
    }

    /// Initializes the workflow for a ticket that has no steps yet.
    pub async fn initialize_workflow(&self, params: &Id) -> Result<crate::display::Steps> {
        let db_path = self.db_path.clone();
        let steps = self.steps.clone();
        let ticket_id = params.id;

        let instances = task::spawn_blocking(move || {
            let mut db = Database::with_step_table(&db_path, steps)?;
            db.initialize_workflow(ticket_id)
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(crate::display::Steps(instances))
    }

    /// Completes the given step and activates its successor.
    pub async fn advance_step(&self, params: &AdvanceStep) -> Result<Advancement> {
        let db_path = self.db_path.clone();
        let steps = self.steps.clone();
        let ticket_id = params.ticket_id;
        let step_number = params.step_number;
        let insurer_reference = params.insurer_reference.clone();
        let travel_minutes = params.travel_minutes;
        let notes = params.notes.clone();

        task::spawn_blocking(move || {
            let mut db = Database::with_step_table(&db_path, steps)?;
            db.advance_step(
                ticket_id,
                step_number,
                insurer_reference.as_deref(),
                travel_minutes,
                notes.as_deref(),
            )
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Renews the provider-wait deadline (step 3) and appends the renewal
    /// note.
    pub async fn renew_provider_wait(&self, params: &RenewProviderWait) -> Result<StepInstance> {
        let db_path = self.db_path.clone();
        let steps = self.steps.clone();
        let ticket_id = params.ticket_id;
        let note = params.note.clone();

        task::spawn_blocking(move || {
            let mut db = Database::with_step_table(&db_path, steps)?;
            db.renew_provider_wait(ticket_id, &note)
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Records or corrects the insurer reference without advancing the
    /// workflow.
    pub async fn update_insurer_reference(
        &self,
        params: &UpdateInsurerReference,
    ) -> Result<StepInstance> {
        let db_path = self.db_path.clone();
        let steps = self.steps.clone();
        let ticket_id = params.ticket_id;
        let insurer_reference = params.insurer_reference.clone();

        task::spawn_blocking(move || {
            let mut db = Database::with_step_table(&db_path, steps)?;
            db.update_insurer_reference(ticket_id, &insurer_reference)
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Sets the operator's travel estimate on step 6.
    pub async fn update_travel_time(&self, params: &UpdateTravelTime) -> Result<StepInstance> {
        let db_path = self.db_path.clone();
        let steps = self.steps.clone();
        let ticket_id = params.ticket_id;
        let minutes = params.minutes;

        task::spawn_blocking(move || {
            let mut db = Database::with_step_table(&db_path, steps)?;
            db.update_travel_time(ticket_id, minutes)
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Completes the final delivery step and closes the ticket.
    pub async fn finalize_ticket(&self, params: &FinalizeTicket) -> Result<Ticket> {
        let db_path = self.db_path.clone();
        let steps = self.steps.clone();
        let ticket_id = params.ticket_id;
        let final_notes = params.final_notes.clone();

        task::spawn_blocking(move || {
            let mut db = Database::with_step_table(&db_path, steps)?;
            db.finalize_ticket(ticket_id, final_notes.as_deref())
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Marks every in-progress step whose deadline has passed as late and
    /// returns them.
    pub async fn sweep_late_steps(&self) -> Result<crate::display::Steps> {
        let db_path = self.db_path.clone();
        let steps = self.steps.clone();

        let late = task::spawn_blocking(move || {
            let mut db = Database::with_step_table(&db_path, steps)?;
            db.sweep_late_steps()
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(crate::display::Steps(late))
    }
}
