//! Workflow step operations and queries.
//!
//! All state transitions of the towing workflow live here: seeding the seven
//! steps when a towing ticket is opened, advancing through them, renewing the
//! provider-wait deadline, finalizing, and the deadline sweep.

use jiff::{tz::TimeZone, SignedDuration, Timestamp};
use rusqlite::{params, types::Type, OptionalExtension, Transaction};

use crate::{
    error::{DatabaseResultExt, Result, WorkflowError},
    models::{Advancement, StepInstance, StepStatus, TicketStatus},
    workflow::{StepTable, PROVIDER_WAIT_STEP, RENEWAL_MINUTES, STEP_COUNT, TRAVEL_STEP},
};

// Optimized SQL queries as const strings for compile-time optimization
const INSERT_STEP_SQL: &str = "INSERT INTO workflow_steps (ticket_id, step_number, name, status, started_at, completed_at, deadline_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const SELECT_STEPS_BY_TICKET_SQL: &str = "SELECT id, ticket_id, step_number, name, status, started_at, completed_at, deadline_at, insurer_reference, manual_travel_minutes, notes FROM workflow_steps WHERE ticket_id = ?1 ORDER BY step_number";
const SELECT_STEP_SQL: &str = "SELECT id, ticket_id, step_number, name, status, started_at, completed_at, deadline_at, insurer_reference, manual_travel_minutes, notes FROM workflow_steps WHERE ticket_id = ?1 AND step_number = ?2";
const CHECK_TICKET_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM tickets WHERE id = ?1)";
const COUNT_STEPS_SQL: &str = "SELECT COUNT(*) FROM workflow_steps WHERE ticket_id = ?1";
const COMPLETE_STEP_SQL: &str = "UPDATE workflow_steps SET status = ?1, completed_at = ?2, notes = COALESCE(?3, notes), insurer_reference = COALESCE(?4, insurer_reference) WHERE ticket_id = ?5 AND step_number = ?6";
const ACTIVATE_STEP_SQL: &str = "UPDATE workflow_steps SET status = ?1, started_at = ?2, deadline_at = ?3, manual_travel_minutes = COALESCE(?4, manual_travel_minutes) WHERE ticket_id = ?5 AND step_number = ?6";
const RENEW_STEP_SQL: &str = "UPDATE workflow_steps SET status = ?1, deadline_at = ?2, notes = CASE WHEN notes IS NULL OR notes = '' THEN ?3 ELSE notes || char(10) || ?3 END WHERE ticket_id = ?4 AND step_number = ?5";
const UPDATE_STEP_INSURER_SQL: &str = "UPDATE workflow_steps SET insurer_reference = ?1 WHERE ticket_id = ?2 AND step_number = ?3";
const UPDATE_STEP_TRAVEL_SQL: &str = "UPDATE workflow_steps SET manual_travel_minutes = ?1, deadline_at = ?2 WHERE ticket_id = ?3 AND step_number = ?4";
const MARK_STEP_LATE_SQL: &str = "UPDATE workflow_steps SET status = ?1 WHERE id = ?2";
const SELECT_ACTIVE_DEADLINE_STEPS_SQL: &str = "SELECT id, ticket_id, step_number, name, status, started_at, completed_at, deadline_at, insurer_reference, manual_travel_minutes, notes FROM workflow_steps WHERE status = 'in_progress' AND deadline_at IS NOT NULL";
const UPDATE_TICKET_PROGRESS_SQL: &str =
    "UPDATE tickets SET status = ?1, current_step = ?2 WHERE id = ?3";
const UPDATE_TICKET_INSURER_SQL: &str = "UPDATE tickets SET insurer_reference = ?1 WHERE id = ?2";
const FINALIZE_TICKET_SQL: &str =
    "UPDATE tickets SET status = ?1, current_step = ?2, completed_at = ?3 WHERE id = ?4";

/// Deadline for a step activated at `now`, or None when the step has no SLA.
fn deadline_after(now: Timestamp, minutes: u32) -> Option<Timestamp> {
    (minutes > 0).then(|| now + SignedDuration::from_mins(i64::from(minutes)))
}

/// Parses an optional timestamp column stored as RFC 3339 text.
fn parse_timestamp_column(
    index: usize,
    value: Option<String>,
) -> rusqlite::Result<Option<Timestamp>> {
    value
        .map(|s| s.parse::<Timestamp>())
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

impl super::Database {
    /// Helper function to construct a StepInstance from a database row.
    ///
    /// Expects the column order of `SELECT_STEP_SQL`.
    pub(super) fn build_step_from_row(row: &rusqlite::Row) -> rusqlite::Result<StepInstance> {
        let status_str: String = row.get(4)?;
        let status = status_str.parse::<StepStatus>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                Type::Text,
                format!("Invalid status: {status_str}").into(),
            )
        })?;

        Ok(StepInstance {
            id: row.get::<_, i64>(0)? as u64,
            ticket_id: row.get::<_, i64>(1)? as u64,
            step_number: row.get::<_, i64>(2)? as u32,
            name: row.get(3)?,
            status,
            started_at: parse_timestamp_column(5, row.get(5)?)?,
            completed_at: parse_timestamp_column(6, row.get(6)?)?,
            deadline_at: parse_timestamp_column(7, row.get(7)?)?,
            insurer_reference: row.get(8)?,
            manual_travel_minutes: row
                .get::<_, Option<i64>>(9)?
                .map(|minutes| minutes as u32),
            notes: row.get(10)?,
        })
    }

    /// Seeds the workflow steps for a freshly created towing ticket.
    ///
    /// All rows are inserted as pending, then step 1 is completed (intake
    /// happened when the ticket was opened) and step 2 activated with its SLA
    /// deadline. The ticket's current_step is moved to 2; its coarse status
    /// stays open until the workflow is first advanced.
    pub(super) fn seed_workflow_steps(
        tx: &Transaction<'_>,
        steps: &StepTable,
        ticket_id: u64,
        now: Timestamp,
    ) -> Result<Vec<StepInstance>> {
        let mut instances = Vec::with_capacity(steps.len());

        for definition in steps {
            let (status, started_at, completed_at, deadline_at) = match definition.step_number {
                1 => (StepStatus::Completed, Some(now), Some(now), None),
                2 => (
                    StepStatus::InProgress,
                    Some(now),
                    None,
                    deadline_after(now, definition.default_deadline_minutes),
                ),
                _ => (StepStatus::Pending, None, None, None),
            };

            tx.execute(
                INSERT_STEP_SQL,
                params![
                    ticket_id as i64,
                    i64::from(definition.step_number),
                    &definition.name,
                    status.as_str(),
                    started_at.map(|t| t.to_string()),
                    completed_at.map(|t| t.to_string()),
                    deadline_at.map(|t| t.to_string()),
                ],
            )
            .map_err(|e| WorkflowError::database_error("Failed to insert workflow step", e))?;

            instances.push(StepInstance {
                id: tx.last_insert_rowid() as u64,
                ticket_id,
                step_number: definition.step_number,
                name: definition.name.clone(),
                status,
                started_at,
                completed_at,
                deadline_at,
                insurer_reference: None,
                manual_travel_minutes: None,
                notes: None,
            });
        }

        tx.execute(
            UPDATE_TICKET_PROGRESS_SQL,
            params![TicketStatus::Open.as_str(), 2i64, ticket_id as i64],
        )
        .map_err(|e| WorkflowError::database_error("Failed to update ticket progress", e))?;

        Ok(instances)
    }

    /// Initializes the workflow for an existing ticket that has no steps yet.
    ///
    /// Used to retrofit the workflow onto a ticket opened before it was
    /// reclassified as towing.
    pub fn initialize_workflow(&mut self, ticket_id: u64) -> Result<Vec<StepInstance>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_TICKET_EXISTS_SQL, params![ticket_id as i64], |row| {
                row.get(0)
            })
            .map_err(|e| WorkflowError::database_error("Failed to check ticket existence", e))?;

        if !exists {
            return Err(WorkflowError::TicketNotFound { id: ticket_id });
        }

        let step_count: i64 = tx
            .query_row(COUNT_STEPS_SQL, params![ticket_id as i64], |row| row.get(0))
            .map_err(|e| WorkflowError::database_error("Failed to count workflow steps", e))?;

        if step_count > 0 {
            return Err(WorkflowError::invalid_input("ticket_id")
                .with_reason(format!("Ticket {ticket_id} already has a workflow")));
        }

        let instances = Self::seed_workflow_steps(&tx, &self.steps, ticket_id, Timestamp::now())?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(instances)
    }

    /// Retrieves all workflow steps for a ticket, in step order.
    pub fn get_steps(&self, ticket_id: u64) -> Result<Vec<StepInstance>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_STEPS_BY_TICKET_SQL)
            .map_err(|e| WorkflowError::database_error("Failed to prepare query", e))?;

        let steps = stmt
            .query_map(params![ticket_id as i64], Self::build_step_from_row)
            .map_err(|e| WorkflowError::database_error("Failed to query steps", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| WorkflowError::database_error("Failed to fetch steps", e))?;

        Ok(steps)
    }

    /// Retrieves a single workflow step by ticket and step number.
    pub fn get_step(&self, ticket_id: u64, step_number: u32) -> Result<Option<StepInstance>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_STEP_SQL)
            .map_err(|e| WorkflowError::database_error("Failed to prepare query", e))?;

        let step = stmt
            .query_row(
                params![ticket_id as i64, i64::from(step_number)],
                Self::build_step_from_row,
            )
            .optional()
            .map_err(|e| WorkflowError::database_error("Failed to get step", e))?;

        Ok(step)
    }

    /// Completes the given step and activates its successor.
    ///
    /// The step must currently be in progress or late; completing a late step
    /// is allowed and leaves no trace of the lateness on the completed row.
    /// Completing step 2 requires an insurer reference (either passed here or
    /// already recorded on the step) and mirrors it onto the ticket.
    /// Activating step 6 uses the operator's travel estimate for the deadline
    /// when one is supplied. Activating the final step marks the whole ticket
    /// finalized; all earlier advancements mark it in progress.
    pub fn advance_step(
        &mut self,
        ticket_id: u64,
        step_number: u32,
        insurer_reference: Option<&str>,
        travel_minutes: Option<u32>,
        notes: Option<&str>,
    ) -> Result<Advancement> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let current = tx
            .query_row(
                SELECT_STEP_SQL,
                params![ticket_id as i64, i64::from(step_number)],
                Self::build_step_from_row,
            )
            .optional()
            .map_err(|e| WorkflowError::database_error("Failed to query step", e))?
            .ok_or(WorkflowError::StepNotFound {
                ticket_id,
                step_number,
            })?;

        if !current.is_active() {
            return Err(WorkflowError::invalid_input("step_number").with_reason(format!(
                "Step {step_number} of ticket {ticket_id} is {} and cannot be advanced",
                current.status.as_str()
            )));
        }

        if step_number >= STEP_COUNT {
            return Err(WorkflowError::invalid_input("step_number")
                .with_reason("The final step is closed by finalizing the ticket"));
        }

        if step_number == 2 && insurer_reference.is_none() && current.insurer_reference.is_none() {
            return Err(WorkflowError::invalid_input("insurer_reference")
                .with_reason("An insurer reference is required to complete step 2"));
        }

        let now = Timestamp::now();
        let now_str = now.to_string();

        let step_insurer = if step_number == 2 {
            insurer_reference
        } else {
            None
        };

        tx.execute(
            COMPLETE_STEP_SQL,
            params![
                StepStatus::Completed.as_str(),
                &now_str,
                notes,
                step_insurer,
                ticket_id as i64,
                i64::from(step_number)
            ],
        )
        .map_err(|e| WorkflowError::database_error("Failed to complete step", e))?;

        if let Some(reference) = step_insurer {
            tx.execute(
                UPDATE_TICKET_INSURER_SQL,
                params![reference, ticket_id as i64],
            )
            .map_err(|e| {
                WorkflowError::database_error("Failed to update ticket insurer reference", e)
            })?;
        }

        let next_number = step_number + 1;
        let default_minutes = self
            .steps
            .get(next_number)
            .map(|d| d.default_deadline_minutes)
            .unwrap_or(0);

        // The operator's travel estimate replaces the table default on step 6.
        // An estimate recorded ahead of time is used when none is passed here.
        let stored_travel = tx
            .query_row(
                SELECT_STEP_SQL,
                params![ticket_id as i64, i64::from(next_number)],
                Self::build_step_from_row,
            )
            .optional()
            .map_err(|e| WorkflowError::database_error("Failed to query next step", e))?
            .and_then(|s| s.manual_travel_minutes);
        let travel = (next_number == TRAVEL_STEP)
            .then(|| travel_minutes.or(stored_travel))
            .flatten();
        let deadline = deadline_after(now, travel.unwrap_or(default_minutes));

        tx.execute(
            ACTIVATE_STEP_SQL,
            params![
                StepStatus::InProgress.as_str(),
                &now_str,
                deadline.map(|t| t.to_string()),
                travel.map(i64::from),
                ticket_id as i64,
                i64::from(next_number)
            ],
        )
        .map_err(|e| WorkflowError::database_error("Failed to activate next step", e))?;

        let ticket_status = if next_number == STEP_COUNT {
            TicketStatus::Finalized
        } else {
            TicketStatus::InProgress
        };

        tx.execute(
            UPDATE_TICKET_PROGRESS_SQL,
            params![
                ticket_status.as_str(),
                i64::from(next_number),
                ticket_id as i64
            ],
        )
        .map_err(|e| WorkflowError::database_error("Failed to update ticket progress", e))?;

        let completed = tx
            .query_row(
                SELECT_STEP_SQL,
                params![ticket_id as i64, i64::from(step_number)],
                Self::build_step_from_row,
            )
            .map_err(|e| WorkflowError::database_error("Failed to query completed step", e))?;

        let activated = tx
            .query_row(
                SELECT_STEP_SQL,
                params![ticket_id as i64, i64::from(next_number)],
                Self::build_step_from_row,
            )
            .optional()
            .map_err(|e| WorkflowError::database_error("Failed to query activated step", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Advancement {
            completed,
            activated,
            ticket_status,
        })
    }

    /// Renews the provider-wait deadline (step 3).
    ///
    /// The new deadline is a fresh window from now, not an extension of the
    /// old one, and the renewal note is appended to the step's notes with a
    /// local timestamp prefix. A late step is restored to in progress.
    pub fn renew_provider_wait(&mut self, ticket_id: u64, note: &str) -> Result<StepInstance> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let current = tx
            .query_row(
                SELECT_STEP_SQL,
                params![ticket_id as i64, i64::from(PROVIDER_WAIT_STEP)],
                Self::build_step_from_row,
            )
            .optional()
            .map_err(|e| WorkflowError::database_error("Failed to query step", e))?
            .ok_or(WorkflowError::StepNotFound {
                ticket_id,
                step_number: PROVIDER_WAIT_STEP,
            })?;

        if !current.is_active() {
            return Err(WorkflowError::invalid_input("ticket_id").with_reason(format!(
                "Step {PROVIDER_WAIT_STEP} of ticket {ticket_id} is {} and its deadline cannot be renewed",
                current.status.as_str()
            )));
        }

        let now = Timestamp::now();
        let deadline = now + SignedDuration::from_mins(i64::from(RENEWAL_MINUTES));
        let local = now.to_zoned(TimeZone::system());
        let stamped_note = format!("[{}] {note}", local.strftime("%Y-%m-%d %H:%M"));

        tx.execute(
            RENEW_STEP_SQL,
            params![
                StepStatus::InProgress.as_str(),
                deadline.to_string(),
                &stamped_note,
                ticket_id as i64,
                i64::from(PROVIDER_WAIT_STEP)
            ],
        )
        .map_err(|e| WorkflowError::database_error("Failed to renew step deadline", e))?;

        let step = tx
            .query_row(
                SELECT_STEP_SQL,
                params![ticket_id as i64, i64::from(PROVIDER_WAIT_STEP)],
                Self::build_step_from_row,
            )
            .map_err(|e| WorkflowError::database_error("Failed to query renewed step", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(step)
    }

    /// Records or corrects the insurer reference on step 2 and mirrors it
    /// onto the ticket without advancing the workflow.
    pub fn update_insurer_reference(
        &mut self,
        ticket_id: u64,
        insurer_reference: &str,
    ) -> Result<StepInstance> {
        if insurer_reference.trim().is_empty() {
            return Err(WorkflowError::invalid_input("insurer_reference")
                .with_reason("Insurer reference must not be empty"));
        }

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let updated = tx
            .execute(
                UPDATE_STEP_INSURER_SQL,
                params![insurer_reference, ticket_id as i64, 2i64],
            )
            .map_err(|e| {
                WorkflowError::database_error("Failed to update step insurer reference", e)
            })?;

        if updated == 0 {
            return Err(WorkflowError::StepNotFound {
                ticket_id,
                step_number: 2,
            });
        }

        tx.execute(
            UPDATE_TICKET_INSURER_SQL,
            params![insurer_reference, ticket_id as i64],
        )
        .map_err(|e| {
            WorkflowError::database_error("Failed to update ticket insurer reference", e)
        })?;

        let step = tx
            .query_row(
                SELECT_STEP_SQL,
                params![ticket_id as i64, 2i64],
                Self::build_step_from_row,
            )
            .map_err(|e| WorkflowError::database_error("Failed to query updated step", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(step)
    }

    /// Sets the operator's travel estimate on step 6.
    ///
    /// When step 6 is already active the deadline is recomputed as a fresh
    /// window from now; otherwise the estimate is stored for use when the
    /// step activates.
    pub fn update_travel_time(&mut self, ticket_id: u64, minutes: u32) -> Result<StepInstance> {
        if minutes == 0 {
            return Err(WorkflowError::invalid_input("minutes")
                .with_reason("Travel estimate must be at least one minute"));
        }

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let current = tx
            .query_row(
                SELECT_STEP_SQL,
                params![ticket_id as i64, i64::from(TRAVEL_STEP)],
                Self::build_step_from_row,
            )
            .optional()
            .map_err(|e| WorkflowError::database_error("Failed to query step", e))?
            .ok_or(WorkflowError::StepNotFound {
                ticket_id,
                step_number: TRAVEL_STEP,
            })?;

        let deadline = if current.is_active() {
            deadline_after(Timestamp::now(), minutes)
        } else {
            current.deadline_at
        };

        tx.execute(
            UPDATE_STEP_TRAVEL_SQL,
            params![
                i64::from(minutes),
                deadline.map(|t| t.to_string()),
                ticket_id as i64,
                i64::from(TRAVEL_STEP)
            ],
        )
        .map_err(|e| WorkflowError::database_error("Failed to update travel estimate", e))?;

        let step = tx
            .query_row(
                SELECT_STEP_SQL,
                params![ticket_id as i64, i64::from(TRAVEL_STEP)],
                Self::build_step_from_row,
            )
            .map_err(|e| WorkflowError::database_error("Failed to query updated step", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(step)
    }

    /// Completes the final delivery step and closes the ticket.
    ///
    /// Finalizing an already finalized ticket overwrites the closing notes
    /// and timestamps rather than failing.
    pub fn finalize_ticket(
        &mut self,
        ticket_id: u64,
        final_notes: Option<&str>,
    ) -> Result<crate::models::Ticket> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let updated = tx
            .execute(
                COMPLETE_STEP_SQL,
                params![
                    StepStatus::Completed.as_str(),
                    Timestamp::now().to_string(),
                    final_notes,
                    None::<String>,
                    ticket_id as i64,
                    i64::from(STEP_COUNT)
                ],
            )
            .map_err(|e| WorkflowError::database_error("Failed to complete final step", e))?;

        if updated == 0 {
            return Err(WorkflowError::StepNotFound {
                ticket_id,
                step_number: STEP_COUNT,
            });
        }

        let now_str = Timestamp::now().to_string();
        tx.execute(
            FINALIZE_TICKET_SQL,
            params![
                TicketStatus::Finalized.as_str(),
                i64::from(STEP_COUNT),
                &now_str,
                ticket_id as i64
            ],
        )
        .map_err(|e| WorkflowError::database_error("Failed to finalize ticket", e))?;

        let mut ticket = tx
            .query_row(
                super::ticket_queries::SELECT_TICKET_SQL,
                params![ticket_id as i64],
                Self::build_ticket_from_row,
            )
            .optional()
            .map_err(|e| WorkflowError::database_error("Failed to query finalized ticket", e))?
            .ok_or(WorkflowError::TicketNotFound { id: ticket_id })?;

        tx.commit().db_context("Failed to commit transaction")?;

        ticket.steps = self.get_steps(ticket_id)?;

        Ok(ticket)
    }

    /// Marks every in-progress step whose deadline has passed as late.
    ///
    /// Deadlines are compared in Rust after parsing rather than as SQL text;
    /// RFC 3339 strings with varying fractional precision do not collate
    /// chronologically. Returns the steps that were newly marked late.
    pub fn sweep_late_steps(&mut self) -> Result<Vec<StepInstance>> {
        let now = Timestamp::now();

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let mut stmt = tx
            .prepare(SELECT_ACTIVE_DEADLINE_STEPS_SQL)
            .map_err(|e| WorkflowError::database_error("Failed to prepare query", e))?;

        let candidates = stmt
            .query_map([], Self::build_step_from_row)
            .map_err(|e| WorkflowError::database_error("Failed to query active steps", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| WorkflowError::database_error("Failed to fetch active steps", e))?;
        drop(stmt);

        let mut late = Vec::new();
        for mut step in candidates {
            let Some(deadline) = step.deadline_at else {
                continue;
            };
            if deadline >= now {
                continue;
            }

            tx.execute(
                MARK_STEP_LATE_SQL,
                params![StepStatus::Late.as_str(), step.id as i64],
            )
            .map_err(|e| WorkflowError::database_error("Failed to mark step late", e))?;

            step.status = StepStatus::Late;
            late.push(step);
        }

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(late)
    }
}
